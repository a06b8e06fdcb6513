//! Chat transcript entity.
//!
//! One row per exchange: the visitor's message and the assistant's reply,
//! grouped by a client-generated session id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sterling_core::{ChatEntryId, UserId};

/// A stored chat exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatEntry {
    pub id: ChatEntryId,
    pub user_id: Option<UserId>,
    pub session_id: String,
    pub message: String,
    pub response: String,
    pub message_type: String,
    pub created_at: DateTime<Utc>,
}

/// Insert shape for a chat exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChatEntry {
    #[serde(skip)]
    pub user_id: Option<UserId>,
    pub session_id: String,
    pub message: String,
    pub response: String,
    #[serde(default = "default_message_type")]
    pub message_type: String,
}

fn default_message_type() -> String {
    "general".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_defaults_to_general() {
        let entry: NewChatEntry = serde_json::from_str(
            r#"{"sessionId":"abc","message":"hi","response":"hello"}"#,
        )
        .unwrap();
        assert_eq!(entry.message_type, "general");
    }
}
