//! Bot management service.
//!
//! Orchestrates bot creation, lookup, deletion, and the upload flow that
//! grows a bot's knowledge-file list during creation. Uploaded objects get
//! flat keys of the form `{bot_id}-{millis}.{ext}` so repeated uploads never
//! collide.

use botique_types::bot::{Bot, BotId, CreateBotRequest};
use botique_types::error::BotError;
use botique_types::identity::UserId;

use crate::repository::bot::{BotFilter, BotRepository};
use crate::storage::{BlobStore, KNOWLEDGE_BUCKET, PICTURE_BUCKET};

/// Service orchestrating the bot lifecycle.
///
/// Generic over the repository and blob-store traits to maintain clean
/// architecture -- botique-core never depends on botique-infra.
pub struct BotService<R: BotRepository, B: BlobStore> {
    bot_repo: R,
    blob_store: B,
}

impl<R: BotRepository, B: BlobStore> BotService<R, B> {
    /// Create a new BotService.
    pub fn new(bot_repo: R, blob_store: B) -> Self {
        Self {
            bot_repo,
            blob_store,
        }
    }

    /// Create a new bot owned by `creator_id`.
    ///
    /// The bot starts with no picture and no knowledge files; both are
    /// attached by the upload operations below.
    pub async fn create_bot(
        &self,
        request: CreateBotRequest,
        creator_id: UserId,
    ) -> Result<Bot, BotError> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(BotError::InvalidName("name cannot be empty".to_string()));
        }

        let bot = Bot {
            id: BotId::new(),
            name,
            description: request.description.unwrap_or_default(),
            creator_id,
            profile_pic_url: String::new(),
            training_data: Vec::new(),
            price_id: request.price_id,
            created_at: chrono::Utc::now(),
        };

        let bot = self
            .bot_repo
            .create(&bot)
            .await
            .map_err(|e| BotError::StorageError(e.to_string()))?;

        tracing::info!(bot_id = %bot.id, creator = %bot.creator_id, "bot created");
        Ok(bot)
    }

    /// Get a bot by ID, or `BotError::NotFound`.
    pub async fn get_bot(&self, id: &BotId) -> Result<Bot, BotError> {
        self.bot_repo
            .get_by_id(id)
            .await
            .map_err(|e| BotError::StorageError(e.to_string()))?
            .ok_or(BotError::NotFound)
    }

    /// List bots, optionally filtered.
    pub async fn list_bots(&self, filter: Option<BotFilter>) -> Result<Vec<Bot>, BotError> {
        self.bot_repo
            .list(filter)
            .await
            .map_err(|e| BotError::StorageError(e.to_string()))
    }

    /// Delete a bot. Only the creator may delete their bot.
    pub async fn delete_bot(&self, id: &BotId, requester: &UserId) -> Result<(), BotError> {
        let bot = self.get_bot(id).await?;
        if &bot.creator_id != requester {
            return Err(BotError::NotCreator);
        }

        self.bot_repo
            .delete(id)
            .await
            .map_err(|e| BotError::StorageError(e.to_string()))?;

        tracing::info!(bot_id = %id, "bot deleted");
        Ok(())
    }

    /// Upload a profile picture and record its public URL on the bot.
    ///
    /// Pictures land in the public bucket and are served at `/files/{key}`.
    pub async fn upload_picture(
        &self,
        id: &BotId,
        requester: &UserId,
        filename: &str,
        data: &[u8],
    ) -> Result<Bot, BotError> {
        let mut bot = self.get_bot(id).await?;
        if &bot.creator_id != requester {
            return Err(BotError::NotCreator);
        }

        let key = object_key(id, filename);
        self.blob_store
            .put_object(PICTURE_BUCKET, &key, data)
            .await
            .map_err(|e| BotError::StorageError(e.to_string()))?;

        bot.profile_pic_url = format!("/files/{key}");
        self.bot_repo
            .update(&bot)
            .await
            .map_err(|e| BotError::StorageError(e.to_string()))
    }

    /// Upload a knowledge file and append its key to the bot's file list.
    ///
    /// Appending preserves upload order, which is the concatenation order
    /// the knowledge loader uses at chat time.
    pub async fn upload_knowledge(
        &self,
        id: &BotId,
        requester: &UserId,
        filename: &str,
        data: &[u8],
    ) -> Result<Bot, BotError> {
        let mut bot = self.get_bot(id).await?;
        if &bot.creator_id != requester {
            return Err(BotError::NotCreator);
        }

        let key = object_key(id, filename);
        self.blob_store
            .put_object(KNOWLEDGE_BUCKET, &key, data)
            .await
            .map_err(|e| BotError::StorageError(e.to_string()))?;

        bot.training_data.push(key);
        self.bot_repo
            .update(&bot)
            .await
            .map_err(|e| BotError::StorageError(e.to_string()))
    }
}

/// Flat object key for an upload: `{bot_id}-{millis}` plus the original
/// file extension when there is one.
fn object_key(bot_id: &BotId, filename: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    match filename.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => format!("{bot_id}-{millis}.{ext}"),
        _ => format!("{bot_id}-{millis}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use botique_types::error::{BlobError, RepositoryError};
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemBotRepository {
        bots: Mutex<HashMap<BotId, Bot>>,
    }

    impl BotRepository for MemBotRepository {
        async fn create(&self, bot: &Bot) -> Result<Bot, RepositoryError> {
            self.bots.lock().unwrap().insert(bot.id.clone(), bot.clone());
            Ok(bot.clone())
        }

        async fn get_by_id(&self, id: &BotId) -> Result<Option<Bot>, RepositoryError> {
            Ok(self.bots.lock().unwrap().get(id).cloned())
        }

        async fn list(&self, filter: Option<BotFilter>) -> Result<Vec<Bot>, RepositoryError> {
            let bots = self.bots.lock().unwrap();
            let creator = filter.and_then(|f| f.creator_id);
            Ok(bots
                .values()
                .filter(|b| creator.as_ref().is_none_or(|c| &b.creator_id == c))
                .cloned()
                .collect())
        }

        async fn update(&self, bot: &Bot) -> Result<Bot, RepositoryError> {
            self.bots.lock().unwrap().insert(bot.id.clone(), bot.clone());
            Ok(bot.clone())
        }

        async fn delete(&self, id: &BotId) -> Result<(), RepositoryError> {
            self.bots.lock().unwrap().remove(id);
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemBlobStore {
        objects: Mutex<HashMap<(String, String), Vec<u8>>>,
    }

    impl BlobStore for MemBlobStore {
        async fn put_object(&self, bucket: &str, key: &str, data: &[u8]) -> Result<(), BlobError> {
            self.objects
                .lock()
                .unwrap()
                .insert((bucket.to_string(), key.to_string()), data.to_vec());
            Ok(())
        }

        async fn fetch_text(&self, bucket: &str, key: &str) -> Result<String, BlobError> {
            let objects = self.objects.lock().unwrap();
            let data = objects
                .get(&(bucket.to_string(), key.to_string()))
                .ok_or(BlobError::NotFound)?;
            String::from_utf8(data.clone()).map_err(|e| BlobError::Decode(e.to_string()))
        }
    }

    fn service() -> BotService<MemBotRepository, MemBlobStore> {
        BotService::new(MemBotRepository::default(), MemBlobStore::default())
    }

    #[tokio::test]
    async fn test_create_bot_defaults() {
        let svc = service();
        let creator = UserId::new();
        let bot = svc
            .create_bot(
                CreateBotRequest {
                    name: "  Luna  ".to_string(),
                    description: None,
                    price_id: None,
                },
                creator.clone(),
            )
            .await
            .unwrap();

        assert_eq!(bot.name, "Luna");
        assert_eq!(bot.description, "");
        assert_eq!(bot.creator_id, creator);
        assert!(bot.training_data.is_empty());
        assert!(bot.profile_pic_url.is_empty());
    }

    #[tokio::test]
    async fn test_create_bot_rejects_empty_name() {
        let svc = service();
        let result = svc
            .create_bot(
                CreateBotRequest {
                    name: "   ".to_string(),
                    description: None,
                    price_id: None,
                },
                UserId::new(),
            )
            .await;
        assert!(matches!(result, Err(BotError::InvalidName(_))));
    }

    #[tokio::test]
    async fn test_delete_requires_creator() {
        let svc = service();
        let creator = UserId::new();
        let bot = svc
            .create_bot(
                CreateBotRequest {
                    name: "Luna".to_string(),
                    description: None,
                    price_id: None,
                },
                creator.clone(),
            )
            .await
            .unwrap();

        let stranger = UserId::new();
        assert!(matches!(
            svc.delete_bot(&bot.id, &stranger).await,
            Err(BotError::NotCreator)
        ));

        svc.delete_bot(&bot.id, &creator).await.unwrap();
        assert!(matches!(svc.get_bot(&bot.id).await, Err(BotError::NotFound)));
    }

    #[tokio::test]
    async fn test_upload_knowledge_appends_in_order() {
        let svc = service();
        let creator = UserId::new();
        let bot = svc
            .create_bot(
                CreateBotRequest {
                    name: "Luna".to_string(),
                    description: None,
                    price_id: None,
                },
                creator.clone(),
            )
            .await
            .unwrap();

        let bot = svc
            .upload_knowledge(&bot.id, &creator, "first.txt", b"one")
            .await
            .unwrap();
        let bot = svc
            .upload_knowledge(&bot.id, &creator, "second.txt", b"two")
            .await
            .unwrap();

        // Upload order is preserved.
        assert_eq!(bot.training_data.len(), 2);
        assert!(bot.training_data[0].ends_with(".txt"));
        assert!(bot.training_data[1].ends_with(".txt"));
    }

    #[tokio::test]
    async fn test_upload_picture_sets_public_url() {
        let svc = service();
        let creator = UserId::new();
        let bot = svc
            .create_bot(
                CreateBotRequest {
                    name: "Luna".to_string(),
                    description: None,
                    price_id: None,
                },
                creator.clone(),
            )
            .await
            .unwrap();

        let bot = svc
            .upload_picture(&bot.id, &creator, "face.png", b"\x89PNG")
            .await
            .unwrap();

        assert!(bot.profile_pic_url.starts_with("/files/"));
        assert!(bot.profile_pic_url.ends_with(".png"));
    }

    #[tokio::test]
    async fn test_upload_rejected_for_non_creator() {
        let svc = service();
        let creator = UserId::new();
        let bot = svc
            .create_bot(
                CreateBotRequest {
                    name: "Luna".to_string(),
                    description: None,
                    price_id: None,
                },
                creator,
            )
            .await
            .unwrap();

        let result = svc
            .upload_knowledge(&bot.id, &UserId::new(), "x.txt", b"data")
            .await;
        assert!(matches!(result, Err(BotError::NotCreator)));
    }

    #[test]
    fn test_object_key_keeps_extension() {
        let id = BotId::new();
        let key = object_key(&id, "notes.txt");
        assert!(key.starts_with(&id.to_string()));
        assert!(key.ends_with(".txt"));

        let bare = object_key(&id, "README");
        assert!(!bare.contains('.'));
    }
}
