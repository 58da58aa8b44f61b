//! SQLite subscription repository implementation.
//!
//! Implements `SubscriptionRepository` from `botique-core`. The `active`
//! flag is stored as an INTEGER column; everything else mirrors the bot
//! repository's TEXT conventions.

use botique_core::repository::subscription::SubscriptionRepository;
use botique_types::bot::BotId;
use botique_types::error::RepositoryError;
use botique_types::identity::UserId;
use botique_types::subscription::Subscription;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `SubscriptionRepository`.
pub struct SqliteSubscriptionRepository {
    pool: DatabasePool,
}

impl SqliteSubscriptionRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn row_to_subscription(row: &sqlx::sqlite::SqliteRow) -> Result<Subscription, RepositoryError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let user_id: String = row
        .try_get("user_id")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let bot_id: String = row
        .try_get("bot_id")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let processor_sub_id: Option<String> = row
        .try_get("processor_sub_id")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let active: i64 = row
        .try_get("active")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let created_at: String = row
        .try_get("created_at")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

    Ok(Subscription {
        id: Uuid::parse_str(&id)
            .map_err(|e| RepositoryError::Query(format!("invalid subscription id: {e}")))?,
        user_id: user_id
            .parse::<UserId>()
            .map_err(|e| RepositoryError::Query(format!("invalid user id: {e}")))?,
        bot_id: bot_id
            .parse::<BotId>()
            .map_err(|e| RepositoryError::Query(format!("invalid bot id: {e}")))?,
        processor_sub_id,
        active: active != 0,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))?,
    })
}

impl SubscriptionRepository for SqliteSubscriptionRepository {
    async fn create(&self, subscription: &Subscription) -> Result<Subscription, RepositoryError> {
        sqlx::query(
            "INSERT INTO subscriptions (id, user_id, bot_id, processor_sub_id, active, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(subscription.id.to_string())
        .bind(subscription.user_id.to_string())
        .bind(subscription.bot_id.to_string())
        .bind(&subscription.processor_sub_id)
        .bind(subscription.active as i64)
        .bind(subscription.created_at.to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(subscription.clone())
    }

    async fn get_active(
        &self,
        user_id: &UserId,
        bot_id: &BotId,
    ) -> Result<Option<Subscription>, RepositoryError> {
        let row = sqlx::query(
            "SELECT * FROM subscriptions WHERE user_id = ? AND bot_id = ? AND active = 1 LIMIT 1",
        )
        .bind(user_id.to_string())
        .bind(bot_id.to_string())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.as_ref().map(row_to_subscription).transpose()
    }

    async fn list_active_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Subscription>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM subscriptions WHERE user_id = ? AND active = 1 ORDER BY created_at DESC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter().map(row_to_subscription).collect()
    }

    async fn get_by_processor_sub_id(
        &self,
        processor_sub_id: &str,
    ) -> Result<Option<Subscription>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM subscriptions WHERE processor_sub_id = ? LIMIT 1")
            .bind(processor_sub_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.as_ref().map(row_to_subscription).transpose()
    }

    async fn set_active(&self, id: &Uuid, active: bool) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE subscriptions SET active = ? WHERE id = ?")
            .bind(active as i64)
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
