//! Project deposit entity.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sterling_core::{DepositId, DepositStatus, ProjectId, UserId};

/// A deposit payment against a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deposit {
    pub id: DepositId,
    pub project_id: Option<ProjectId>,
    pub user_id: Option<UserId>,
    pub amount: Decimal,
    pub status: DepositStatus,
    pub payment_method: Option<String>,
    pub payment_intent_id: Option<String>,
    /// Provider reference for mobile-money payments.
    pub mobile_money_reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert shape for a deposit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDeposit {
    #[serde(default)]
    pub project_id: Option<ProjectId>,
    #[serde(skip)]
    pub user_id: Option<UserId>,
    pub amount: Decimal,
    #[serde(default)]
    pub status: DepositStatus,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub payment_intent_id: Option<String>,
    #[serde(default)]
    pub mobile_money_reference: Option<String>,
}

impl NewDeposit {
    /// Structural validation of client-supplied fields.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message when a field is unacceptable.
    pub fn validate(&self) -> Result<(), String> {
        if self.amount <= Decimal::ZERO {
            return Err("amount must be positive".to_owned());
        }
        Ok(())
    }
}

/// Partial-update shape: only supplied fields are merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositPatch {
    #[serde(default)]
    pub status: Option<DepositStatus>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub payment_intent_id: Option<String>,
    #[serde(default)]
    pub mobile_money_reference: Option<String>,
}

impl DepositPatch {
    /// Merge this patch onto an existing record, bumping `updated_at`.
    pub fn apply_to(self, deposit: &mut Deposit, now: DateTime<Utc>) {
        if let Some(status) = self.status {
            deposit.status = status;
        }
        if let Some(payment_method) = self.payment_method {
            deposit.payment_method = Some(payment_method);
        }
        if let Some(payment_intent_id) = self.payment_intent_id {
            deposit.payment_intent_id = Some(payment_intent_id);
        }
        if let Some(mobile_money_reference) = self.mobile_money_reference {
            deposit.mobile_money_reference = Some(mobile_money_reference);
        }
        deposit.updated_at = now;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_required_positive() {
        let new: NewDeposit = serde_json::from_str(r#"{"amount":"0"}"#).unwrap();
        assert!(new.validate().is_err());
        let new: NewDeposit = serde_json::from_str(r#"{"amount":"1500.00"}"#).unwrap();
        assert!(new.validate().is_ok());
    }

    #[test]
    fn test_status_defaults_to_pending() {
        let new: NewDeposit =
            serde_json::from_str(r#"{"amount":"250.00","projectId":1}"#).unwrap();
        assert_eq!(new.status, DepositStatus::Pending);
        assert_eq!(new.project_id, Some(ProjectId::new(1)));
    }
}
