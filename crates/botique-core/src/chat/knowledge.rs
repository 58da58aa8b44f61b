//! Knowledge loader: resolves a bot's file keys to one concatenated blob.
//!
//! Each key is fetched from the knowledge bucket and appended with a
//! separating blank line, in list order (the order files were uploaded at
//! bot creation). Keys that fail to fetch -- missing object, undecodable
//! content -- are skipped with a warning; partial knowledge is accepted and
//! no fetch failure aborts the load.

use crate::storage::{BlobStore, KNOWLEDGE_BUCKET};

/// Loads and concatenates a bot's knowledge files from the blob store.
pub struct KnowledgeLoader<B: BlobStore> {
    store: B,
}

impl<B: BlobStore> KnowledgeLoader<B> {
    /// Create a loader reading from the given blob store.
    pub fn new(store: B) -> Self {
        Self { store }
    }

    /// Fetch every key and concatenate the successful results in list order.
    ///
    /// Returns the empty string when `file_keys` is empty or every fetch
    /// fails. Never returns an error.
    pub async fn load(&self, file_keys: &[String]) -> String {
        let mut blob = String::new();

        for key in file_keys {
            match self.store.fetch_text(KNOWLEDGE_BUCKET, key).await {
                Ok(text) => {
                    blob.push_str(&text);
                    blob.push_str("\n\n");
                }
                Err(err) => {
                    tracing::warn!(key = %key, error = %err, "skipping unreadable knowledge file");
                }
            }
        }

        blob
    }
}
