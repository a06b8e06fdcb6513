//! Contact-form inquiry entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sterling_core::{Email, InquiryId, InquiryStatus, UserId};

/// A contact-form inquiry awaiting triage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    pub id: InquiryId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub project_type: Option<String>,
    pub message: String,
    pub status: InquiryStatus,
    /// Set when the inquiry was submitted by a signed-in user.
    pub user_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert shape for an inquiry.
///
/// The public contact form requires every field, so `phone` and
/// `project_type` are plain strings here even though the stored record
/// keeps them nullable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInquiry {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: String,
    pub project_type: String,
    pub message: String,
    #[serde(skip)]
    pub user_id: Option<UserId>,
}

impl NewInquiry {
    /// Structural validation of client-supplied fields.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message when a field is unacceptable.
    pub fn validate(&self) -> Result<(), String> {
        if self.first_name.trim().is_empty() {
            return Err("firstName is required".to_owned());
        }
        if self.last_name.trim().is_empty() {
            return Err("lastName is required".to_owned());
        }
        if self.phone.trim().len() < 7 {
            return Err("phone must be at least 7 characters".to_owned());
        }
        if self.project_type.trim().is_empty() {
            return Err("projectType is required".to_owned());
        }
        if self.message.trim().len() < 10 {
            return Err("message must be at least 10 characters".to_owned());
        }
        Ok(())
    }
}

/// Partial-update shape for triage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryPatch {
    #[serde(default)]
    pub status: Option<InquiryStatus>,
}

impl InquiryPatch {
    /// Merge this patch onto an existing record, bumping `updated_at`.
    pub fn apply_to(self, inquiry: &mut Inquiry, now: DateTime<Utc>) {
        if let Some(status) = self.status {
            inquiry.status = status;
        }
        inquiry.updated_at = now;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid() -> NewInquiry {
        serde_json::from_str(
            r#"{
                "firstName": "Grace",
                "lastName": "Okello",
                "email": "grace@example.com",
                "phone": "+256700123456",
                "projectType": "residential",
                "message": "We need a quote for a three-bedroom build."
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_valid_inquiry_accepted() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_short_message_rejected() {
        let mut inquiry = valid();
        inquiry.message = "too short".to_owned();
        assert!(inquiry.validate().is_err());
    }

    #[test]
    fn test_short_phone_rejected() {
        let mut inquiry = valid();
        inquiry.phone = "12345".to_owned();
        assert!(inquiry.validate().is_err());
    }

    #[test]
    fn test_malformed_email_rejected_at_deserialization() {
        let result = serde_json::from_str::<NewInquiry>(
            r#"{
                "firstName": "Grace",
                "lastName": "Okello",
                "email": "not-an-email",
                "phone": "+256700123456",
                "projectType": "residential",
                "message": "We need a quote for a three-bedroom build."
            }"#,
        );
        assert!(result.is_err());
    }
}
