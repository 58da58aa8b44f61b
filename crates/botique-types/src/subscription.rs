//! Subscription types for Botique.
//!
//! A subscription gates a user's access to another creator's bot. The chat
//! pipeline only ever reads the `active` flag; the write path belongs to the
//! billing webhook and checkout flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bot::BotId;
use crate::identity::UserId;

/// A user's subscription to a bot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: UserId,
    pub bot_id: BotId,
    /// Subscription identifier at the payment processor, when one exists.
    pub processor_sub_id: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    /// Create a new active subscription.
    pub fn new(user_id: UserId, bot_id: BotId, processor_sub_id: Option<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            bot_id,
            processor_sub_id,
            active: true,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_subscription_is_active() {
        let sub = Subscription::new(UserId::new(), BotId::new(), Some("sub_123".to_string()));
        assert!(sub.active);
        assert_eq!(sub.processor_sub_id.as_deref(), Some("sub_123"));
    }

    #[test]
    fn test_subscription_serde_roundtrip() {
        let sub = Subscription::new(UserId::new(), BotId::new(), None);
        let json = serde_json::to_string(&sub).unwrap();
        let parsed: Subscription = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, sub.id);
        assert_eq!(parsed.user_id, sub.user_id);
        assert!(parsed.active);
    }
}
