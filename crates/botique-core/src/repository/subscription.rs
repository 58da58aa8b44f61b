//! Subscription repository trait definition.
//!
//! The chat pipeline only reads through `get_active`; the write operations
//! serve the checkout flow and the billing webhook.

use botique_types::bot::BotId;
use botique_types::error::RepositoryError;
use botique_types::identity::UserId;
use botique_types::subscription::Subscription;

/// Repository trait for subscription persistence.
///
/// Implementations live in botique-infra (e.g., SqliteSubscriptionRepository).
pub trait SubscriptionRepository: Send + Sync {
    /// Create a new subscription record.
    fn create(
        &self,
        subscription: &Subscription,
    ) -> impl std::future::Future<Output = Result<Subscription, RepositoryError>> + Send;

    /// Get the active subscription for a (user, bot) pair, if any.
    fn get_active(
        &self,
        user_id: &UserId,
        bot_id: &BotId,
    ) -> impl std::future::Future<Output = Result<Option<Subscription>, RepositoryError>> + Send;

    /// List all active subscriptions for a user.
    fn list_active_for_user(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<Vec<Subscription>, RepositoryError>> + Send;

    /// Find a subscription by its processor-side identifier.
    fn get_by_processor_sub_id(
        &self,
        processor_sub_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Subscription>, RepositoryError>> + Send;

    /// Flip the active flag on an existing subscription.
    fn set_active(
        &self,
        id: &uuid::Uuid,
        active: bool,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
