//! Subscription service.
//!
//! Owns the read path the chat pipeline depends on (`access_granted`) and
//! the write path driven by the billing integration: activation after a
//! completed checkout and status flips from processor webhook events.

use botique_types::bot::{Bot, BotId};
use botique_types::error::RepositoryError;
use botique_types::identity::UserId;
use botique_types::subscription::Subscription;

use crate::repository::subscription::SubscriptionRepository;

/// Service over subscription records.
pub struct SubscriptionService<S: SubscriptionRepository> {
    subscription_repo: S,
}

impl<S: SubscriptionRepository> SubscriptionService<S> {
    /// Create a new subscription service.
    pub fn new(subscription_repo: S) -> Self {
        Self { subscription_repo }
    }

    /// Whether `user_id` may chat with `bot`.
    ///
    /// A bot's creator always has access to their own bot; everyone else
    /// needs an active subscription. Evaluated once when a chat session
    /// opens -- the result is captured in the session context.
    pub async fn access_granted(
        &self,
        user_id: &UserId,
        bot: &Bot,
    ) -> Result<bool, RepositoryError> {
        if &bot.creator_id == user_id {
            return Ok(true);
        }

        let active = self
            .subscription_repo
            .get_active(user_id, &bot.id)
            .await?;
        Ok(active.is_some())
    }

    /// All active subscriptions for a user.
    pub async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Subscription>, RepositoryError> {
        self.subscription_repo.list_active_for_user(user_id).await
    }

    /// Record a new active subscription after a completed checkout.
    pub async fn activate_from_checkout(
        &self,
        user_id: UserId,
        bot_id: BotId,
        processor_sub_id: Option<String>,
    ) -> Result<Subscription, RepositoryError> {
        let subscription = Subscription::new(user_id, bot_id, processor_sub_id);
        let subscription = self.subscription_repo.create(&subscription).await?;
        tracing::info!(
            subscription_id = %subscription.id,
            bot_id = %subscription.bot_id,
            "subscription activated from checkout"
        );
        Ok(subscription)
    }

    /// Flip a subscription's active flag based on a processor event.
    ///
    /// Returns false when no subscription matches the processor id; the
    /// webhook treats that as a no-op rather than an error.
    pub async fn set_status_by_processor_id(
        &self,
        processor_sub_id: &str,
        active: bool,
    ) -> Result<bool, RepositoryError> {
        match self
            .subscription_repo
            .get_by_processor_sub_id(processor_sub_id)
            .await?
        {
            Some(subscription) => {
                self.subscription_repo
                    .set_active(&subscription.id, active)
                    .await?;
                tracing::info!(
                    subscription_id = %subscription.id,
                    active,
                    "subscription status updated from processor event"
                );
                Ok(true)
            }
            None => {
                tracing::warn!(
                    processor_sub_id,
                    "processor event for unknown subscription ignored"
                );
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    struct MemSubscriptionRepository {
        subs: Mutex<HashMap<Uuid, Subscription>>,
    }

    impl SubscriptionRepository for MemSubscriptionRepository {
        async fn create(&self, subscription: &Subscription) -> Result<Subscription, RepositoryError> {
            self.subs
                .lock()
                .unwrap()
                .insert(subscription.id, subscription.clone());
            Ok(subscription.clone())
        }

        async fn get_active(
            &self,
            user_id: &UserId,
            bot_id: &BotId,
        ) -> Result<Option<Subscription>, RepositoryError> {
            Ok(self
                .subs
                .lock()
                .unwrap()
                .values()
                .find(|s| s.active && &s.user_id == user_id && &s.bot_id == bot_id)
                .cloned())
        }

        async fn list_active_for_user(
            &self,
            user_id: &UserId,
        ) -> Result<Vec<Subscription>, RepositoryError> {
            Ok(self
                .subs
                .lock()
                .unwrap()
                .values()
                .filter(|s| s.active && &s.user_id == user_id)
                .cloned()
                .collect())
        }

        async fn get_by_processor_sub_id(
            &self,
            processor_sub_id: &str,
        ) -> Result<Option<Subscription>, RepositoryError> {
            Ok(self
                .subs
                .lock()
                .unwrap()
                .values()
                .find(|s| s.processor_sub_id.as_deref() == Some(processor_sub_id))
                .cloned())
        }

        async fn set_active(&self, id: &Uuid, active: bool) -> Result<(), RepositoryError> {
            let mut subs = self.subs.lock().unwrap();
            let sub = subs.get_mut(id).ok_or(RepositoryError::NotFound)?;
            sub.active = active;
            Ok(())
        }
    }

    fn test_bot(creator: UserId) -> Bot {
        Bot {
            id: BotId::new(),
            name: "Luna".to_string(),
            description: String::new(),
            creator_id: creator,
            profile_pic_url: String::new(),
            training_data: vec![],
            price_id: None,
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_creator_always_has_access() {
        let svc = SubscriptionService::new(MemSubscriptionRepository::default());
        let creator = UserId::new();
        let bot = test_bot(creator.clone());

        assert!(svc.access_granted(&creator, &bot).await.unwrap());
    }

    #[tokio::test]
    async fn test_stranger_denied_without_subscription() {
        let svc = SubscriptionService::new(MemSubscriptionRepository::default());
        let bot = test_bot(UserId::new());

        assert!(!svc.access_granted(&UserId::new(), &bot).await.unwrap());
    }

    #[tokio::test]
    async fn test_active_subscription_grants_access() {
        let svc = SubscriptionService::new(MemSubscriptionRepository::default());
        let bot = test_bot(UserId::new());
        let subscriber = UserId::new();

        svc.activate_from_checkout(subscriber.clone(), bot.id.clone(), Some("sub_1".to_string()))
            .await
            .unwrap();

        assert!(svc.access_granted(&subscriber, &bot).await.unwrap());
    }

    #[tokio::test]
    async fn test_deactivated_subscription_revokes_access() {
        let svc = SubscriptionService::new(MemSubscriptionRepository::default());
        let bot = test_bot(UserId::new());
        let subscriber = UserId::new();

        svc.activate_from_checkout(subscriber.clone(), bot.id.clone(), Some("sub_2".to_string()))
            .await
            .unwrap();
        let updated = svc
            .set_status_by_processor_id("sub_2", false)
            .await
            .unwrap();
        assert!(updated);

        assert!(!svc.access_granted(&subscriber, &bot).await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_processor_id_is_noop() {
        let svc = SubscriptionService::new(MemSubscriptionRepository::default());
        let updated = svc
            .set_status_by_processor_id("sub_missing", false)
            .await
            .unwrap();
        assert!(!updated);
    }

    #[tokio::test]
    async fn test_list_for_user_only_active() {
        let svc = SubscriptionService::new(MemSubscriptionRepository::default());
        let user = UserId::new();

        svc.activate_from_checkout(user.clone(), BotId::new(), Some("sub_a".to_string()))
            .await
            .unwrap();
        svc.activate_from_checkout(user.clone(), BotId::new(), Some("sub_b".to_string()))
            .await
            .unwrap();
        svc.set_status_by_processor_id("sub_b", false).await.unwrap();

        let subs = svc.list_for_user(&user).await.unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].processor_sub_id.as_deref(), Some("sub_a"));
    }
}
