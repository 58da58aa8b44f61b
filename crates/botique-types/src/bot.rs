use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::identity::UserId;

/// Unique identifier for a bot, wrapping a UUID v7 (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BotId(pub Uuid);

impl BotId {
    /// Create a new BotId using UUID v7 (time-sortable, guaranteed ordering).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create a BotId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for BotId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BotId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A bot in the Botique marketplace.
///
/// A bot is a configured persona plus an ordered list of knowledge-file
/// keys. It is owned by its creator and referenced (never owned) by chat
/// sessions and subscriptions. Once read into a chat session the record is
/// treated as immutable; `training_data` only grows during creation as
/// knowledge files are uploaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bot {
    pub id: BotId,
    /// Freeform display name.
    pub name: String,
    /// Free-text persona description (may be empty).
    pub description: String,
    /// The user who created and owns this bot.
    pub creator_id: UserId,
    /// Public URL of the profile picture (empty until one is uploaded).
    pub profile_pic_url: String,
    /// Ordered blob-store keys of the uploaded knowledge files.
    /// Concatenation order for the prompt = this order.
    pub training_data: Vec<String>,
    /// Optional pricing identifier at the payment processor.
    pub price_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request to create a new bot. Only `name` is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBotRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_id_display_roundtrip() {
        let id = BotId::new();
        let s = id.to_string();
        let parsed: BotId = s.parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_bot_ids_are_time_sortable() {
        let a = BotId::new();
        let b = BotId::new();
        assert!(a.0 <= b.0);
    }

    #[test]
    fn test_bot_serialize() {
        let bot = Bot {
            id: BotId::new(),
            name: "Helper".to_string(),
            description: String::new(),
            creator_id: UserId::new(),
            profile_pic_url: String::new(),
            training_data: vec!["notes.txt".to_string()],
            price_id: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&bot).unwrap();
        assert_eq!(json["name"], "Helper");
        assert_eq!(json["training_data"][0], "notes.txt");
    }

    #[test]
    fn test_create_bot_request_minimal() {
        let req: CreateBotRequest = serde_json::from_str(r#"{"name":"Luna"}"#).unwrap();
        assert_eq!(req.name, "Luna");
        assert!(req.description.is_none());
        assert!(req.price_id.is_none());
    }
}
