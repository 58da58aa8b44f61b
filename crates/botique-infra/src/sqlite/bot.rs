//! SQLite bot repository implementation.
//!
//! Implements `BotRepository` from `botique-core` using sqlx with split
//! read/write pools. The ordered knowledge-file list is stored as a JSON
//! array in a TEXT column; order in = order out.

use botique_core::repository::SortOrder;
use botique_core::repository::bot::{BotFilter, BotRepository};
use botique_types::bot::{Bot, BotId};
use botique_types::error::RepositoryError;
use botique_types::identity::UserId;
use chrono::{DateTime, Utc};
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `BotRepository`.
pub struct SqliteBotRepository {
    pool: DatabasePool,
}

impl SqliteBotRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to the domain Bot.
struct BotRow {
    id: String,
    name: String,
    description: String,
    creator_id: String,
    profile_pic_url: String,
    training_data: String,
    price_id: Option<String>,
    created_at: String,
}

impl BotRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            creator_id: row.try_get("creator_id")?,
            profile_pic_url: row.try_get("profile_pic_url")?,
            training_data: row.try_get("training_data")?,
            price_id: row.try_get("price_id")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_bot(self) -> Result<Bot, RepositoryError> {
        let id = self
            .id
            .parse::<BotId>()
            .map_err(|e| RepositoryError::Query(format!("invalid bot id: {e}")))?;

        let creator_id = self
            .creator_id
            .parse::<UserId>()
            .map_err(|e| RepositoryError::Query(format!("invalid creator id: {e}")))?;

        let training_data: Vec<String> = serde_json::from_str(&self.training_data)
            .map_err(|e| RepositoryError::Query(format!("invalid training_data JSON: {e}")))?;

        let created_at = parse_datetime(&self.created_at)?;

        Ok(Bot {
            id,
            name: self.name,
            description: self.description,
            creator_id,
            profile_pic_url: self.profile_pic_url,
            training_data,
            price_id: self.price_id,
            created_at,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

impl BotRepository for SqliteBotRepository {
    async fn create(&self, bot: &Bot) -> Result<Bot, RepositoryError> {
        let training_json = serde_json::to_string(&bot.training_data)
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let result = sqlx::query(
            "INSERT INTO bots (id, name, description, creator_id, profile_pic_url, training_data, price_id, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(bot.id.to_string())
        .bind(&bot.name)
        .bind(&bot.description)
        .bind(bot.creator_id.to_string())
        .bind(&bot.profile_pic_url)
        .bind(&training_json)
        .bind(&bot.price_id)
        .bind(format_datetime(&bot.created_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(bot.clone()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => Err(
                RepositoryError::Conflict(format!("bot '{}' already exists", bot.id)),
            ),
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn get_by_id(&self, id: &BotId) -> Result<Option<Bot>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM bots WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let bot_row =
                    BotRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(bot_row.into_bot()?))
            }
            None => Ok(None),
        }
    }

    async fn list(&self, filter: Option<BotFilter>) -> Result<Vec<Bot>, RepositoryError> {
        let filter = filter.unwrap_or_default();

        let order = match filter.sort_order.unwrap_or_default() {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };

        let mut sql = String::from("SELECT * FROM bots");
        if filter.creator_id.is_some() {
            sql.push_str(" WHERE creator_id = ?");
        }
        sql.push_str(&format!(" ORDER BY created_at {order}"));
        if filter.limit.is_some() {
            sql.push_str(" LIMIT ?");
        }
        if filter.offset.is_some() {
            sql.push_str(" OFFSET ?");
        }

        let mut query = sqlx::query(&sql);
        if let Some(ref creator) = filter.creator_id {
            query = query.bind(creator.to_string());
        }
        if let Some(limit) = filter.limit {
            query = query.bind(limit);
        }
        if let Some(offset) = filter.offset {
            query = query.bind(offset);
        }

        let rows = query
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                BotRow::from_row(row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_bot()
            })
            .collect()
    }

    async fn update(&self, bot: &Bot) -> Result<Bot, RepositoryError> {
        let training_json = serde_json::to_string(&bot.training_data)
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let result = sqlx::query(
            "UPDATE bots SET name = ?, description = ?, profile_pic_url = ?, training_data = ?, price_id = ?
             WHERE id = ?",
        )
        .bind(&bot.name)
        .bind(&bot.description)
        .bind(&bot.profile_pic_url)
        .bind(&training_json)
        .bind(&bot.price_id)
        .bind(bot.id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(bot.clone())
    }

    async fn delete(&self, id: &BotId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM bots WHERE id = ?")
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

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    fn make_bot(name: &str) -> Bot {
        Bot {
            id: BotId::new(),
            name: name.to_string(),
            description: "a test bot".to_string(),
            creator_id: UserId::new(),
            profile_pic_url: String::new(),
            training_data: vec!["a.txt".to_string(), "b.txt".to_string()],
            price_id: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_roundtrip() {
        let repo = SqliteBotRepository::new(test_pool().await);
        let bot = make_bot("Luna");

        repo.create(&bot).await.unwrap();
        let fetched = repo.get_by_id(&bot.id).await.unwrap().unwrap();

        assert_eq!(fetched.id, bot.id);
        assert_eq!(fetched.name, "Luna");
        assert_eq!(fetched.creator_id, bot.creator_id);
        // JSON round-trip preserves knowledge-file order.
        assert_eq!(fetched.training_data, vec!["a.txt", "b.txt"]);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let repo = SqliteBotRepository::new(test_pool().await);
        assert!(repo.get_by_id(&BotId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_id_is_conflict() {
        let repo = SqliteBotRepository::new(test_pool().await);
        let bot = make_bot("Luna");

        repo.create(&bot).await.unwrap();
        let result = repo.create(&bot).await;
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_list_filters_by_creator() {
        let repo = SqliteBotRepository::new(test_pool().await);
        let mine = make_bot("Mine");
        let theirs = make_bot("Theirs");
        repo.create(&mine).await.unwrap();
        repo.create(&theirs).await.unwrap();

        let filter = BotFilter {
            creator_id: Some(mine.creator_id.clone()),
            ..Default::default()
        };
        let bots = repo.list(Some(filter)).await.unwrap();
        assert_eq!(bots.len(), 1);
        assert_eq!(bots[0].name, "Mine");

        let all = repo.list(None).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_update_grows_training_data() {
        let repo = SqliteBotRepository::new(test_pool().await);
        let mut bot = make_bot("Luna");
        repo.create(&bot).await.unwrap();

        bot.training_data.push("c.txt".to_string());
        bot.profile_pic_url = "/files/pic.png".to_string();
        repo.update(&bot).await.unwrap();

        let fetched = repo.get_by_id(&bot.id).await.unwrap().unwrap();
        assert_eq!(fetched.training_data, vec!["a.txt", "b.txt", "c.txt"]);
        assert_eq!(fetched.profile_pic_url, "/files/pic.png");
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = SqliteBotRepository::new(test_pool().await);
        let bot = make_bot("Ghost");
        assert!(matches!(
            repo.update(&bot).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = SqliteBotRepository::new(test_pool().await);
        let bot = make_bot("Luna");
        repo.create(&bot).await.unwrap();

        repo.delete(&bot.id).await.unwrap();
        assert!(repo.get_by_id(&bot.id).await.unwrap().is_none());

        assert!(matches!(
            repo.delete(&bot.id).await,
            Err(RepositoryError::NotFound)
        ));
    }
}
