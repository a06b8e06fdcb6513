//! User entity.
//!
//! Users are created on first sign-in with upsert semantics, keyed by the
//! identity provider's subject id. They are never hard-deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sterling_core::{Email, UserId};

/// A signed-in user, as synced from the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: Option<Email>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
    /// Payment-provider customer reference, set on first payment linkage.
    pub stripe_customer_id: Option<String>,
    /// Payment-provider subscription reference.
    pub stripe_subscription_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert-or-update shape for the auth sync path.
///
/// Keyed by the stable identity-provider subject id; an existing row keeps
/// its `created_at` and payment references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertUser {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<Email>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
}
