//! Construction project entity.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sterling_core::{ProjectId, UserId};

/// A construction project in the portfolio.
///
/// Status is a free-form string (`planning`, `in_progress`, ...); the
/// lifecycle is driven by back-office staff rather than the system, so it is
/// deliberately not a closed enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: String,
    pub budget: Option<Decimal>,
    pub deposit_amount: Option<Decimal>,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
    pub featured: bool,
    /// Owning user, when the project was created through the public API.
    pub user_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert shape for a project.
///
/// `user_id` is never taken from the body; the handler fills it in from the
/// session before this reaches storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_project_status")]
    pub status: String,
    #[serde(default)]
    pub budget: Option<Decimal>,
    #[serde(default)]
    pub deposit_amount: Option<Decimal>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub client_email: Option<String>,
    #[serde(default)]
    pub client_phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(skip)]
    pub user_id: Option<UserId>,
}

fn default_project_status() -> String {
    "planning".to_owned()
}

impl NewProject {
    /// Structural validation of client-supplied fields.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message when a field is unacceptable.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title is required".to_owned());
        }
        if self.status.trim().is_empty() {
            return Err("status cannot be blank".to_owned());
        }
        if let Some(budget) = self.budget {
            if budget.is_sign_negative() {
                return Err("budget cannot be negative".to_owned());
            }
        }
        Ok(())
    }
}

/// Partial-update shape: only supplied fields are merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub budget: Option<Decimal>,
    #[serde(default)]
    pub deposit_amount: Option<Decimal>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub client_email: Option<String>,
    #[serde(default)]
    pub client_phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub featured: Option<bool>,
}

impl ProjectPatch {
    /// Merge this patch onto an existing record, bumping `updated_at`.
    pub fn apply_to(self, project: &mut Project, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            project.title = title;
        }
        if let Some(description) = self.description {
            project.description = Some(description);
        }
        if let Some(category) = self.category {
            project.category = Some(category);
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(budget) = self.budget {
            project.budget = Some(budget);
        }
        if let Some(deposit_amount) = self.deposit_amount {
            project.deposit_amount = Some(deposit_amount);
        }
        if let Some(client_name) = self.client_name {
            project.client_name = Some(client_name);
        }
        if let Some(client_email) = self.client_email {
            project.client_email = Some(client_email);
        }
        if let Some(client_phone) = self.client_phone {
            project.client_phone = Some(client_phone);
        }
        if let Some(location) = self.location {
            project.location = Some(location);
        }
        if let Some(start_date) = self.start_date {
            project.start_date = Some(start_date);
        }
        if let Some(end_date) = self.end_date {
            project.end_date = Some(end_date);
        }
        if let Some(image_url) = self.image_url {
            project.image_url = Some(image_url);
        }
        if let Some(featured) = self.featured {
            project.featured = featured;
        }
        project.updated_at = now;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_project_defaults() {
        let new: NewProject = serde_json::from_str(r#"{"title":"Warehouse Extension"}"#).unwrap();
        assert_eq!(new.status, "planning");
        assert!(!new.featured);
        assert!(new.validate().is_ok());
    }

    #[test]
    fn test_blank_title_rejected() {
        let new: NewProject = serde_json::from_str(r#"{"title":"  "}"#).unwrap();
        assert!(new.validate().is_err());
    }

    #[test]
    fn test_user_id_not_deserialized_from_body() {
        let new: NewProject =
            serde_json::from_str(r#"{"title":"Depot","userId":"attacker"}"#).unwrap();
        assert!(new.user_id.is_none());
    }

    #[test]
    fn test_patch_merges_only_supplied_fields() {
        let now = Utc::now();
        let mut project = Project {
            id: ProjectId::new(1),
            title: "Old".to_owned(),
            description: Some("desc".to_owned()),
            category: None,
            status: "planning".to_owned(),
            budget: None,
            deposit_amount: None,
            client_name: None,
            client_email: None,
            client_phone: None,
            location: None,
            start_date: None,
            end_date: None,
            image_url: None,
            featured: false,
            user_id: None,
            created_at: now,
            updated_at: now,
        };
        let patch: ProjectPatch =
            serde_json::from_str(r#"{"status":"in_progress","featured":true}"#).unwrap();
        let later = now + chrono::Duration::seconds(5);
        patch.apply_to(&mut project, later);
        assert_eq!(project.status, "in_progress");
        assert!(project.featured);
        assert_eq!(project.title, "Old");
        assert_eq!(project.description.as_deref(), Some("desc"));
        assert_eq!(project.updated_at, later);
    }
}
