//! Status enums for orders, deposits, and inquiries.
//!
//! Orders and deposits share the same payment-driven lifecycle: they are
//! created as `pending` and move to `completed` or `failed` only via the
//! update primitive (driven by gateway webhooks or manual updates - the
//! transition logic itself lives outside this system). Project status remains
//! a free-form string and has no enum here.
//!
//! Statuses are persisted as lowercase text, so each enum carries `Display`
//! and `FromStr` in addition to serde.

use serde::{Deserialize, Serialize};

/// Order payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

impl OrderStatus {
    /// Returns the lowercase text form stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Deposit payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DepositStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

impl DepositStatus {
    /// Returns the lowercase text form stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for DepositStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DepositStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("invalid deposit status: {s}")),
        }
    }
}

/// Inquiry triage status.
///
/// Contact-form inquiries start as `new`; triage moves them forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InquiryStatus {
    #[default]
    New,
    InProgress,
    Resolved,
}

impl InquiryStatus {
    /// Returns the lowercase text form stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
        }
    }
}

impl std::fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InquiryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "in_progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            _ => Err(format!("invalid inquiry status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_initial_states() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
        assert_eq!(DepositStatus::default(), DepositStatus::Pending);
        assert_eq!(InquiryStatus::default(), InquiryStatus::New);
    }

    #[test]
    fn test_text_roundtrip() {
        for status in [OrderStatus::Pending, OrderStatus::Completed, OrderStatus::Failed] {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        for status in [InquiryStatus::New, InquiryStatus::InProgress, InquiryStatus::Resolved] {
            assert_eq!(status.as_str().parse::<InquiryStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_invalid_text_rejected() {
        assert!("shipped".parse::<OrderStatus>().is_err());
        assert!("".parse::<DepositStatus>().is_err());
    }

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&InquiryStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        let parsed: OrderStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, OrderStatus::Completed);
    }
}
