//! Local filesystem blob store.
//!
//! Implements the `BlobStore` trait from `botique-core` with objects stored
//! at `{base_dir}/{bucket}/{key}`. Keys are flat names; anything that could
//! traverse outside the bucket directory is rejected before touching disk.
//!
//! Directory layout:
//! ```text
//! {base_dir}/
//!   bot-pics/
//!     0192...-1730000000000.png
//!   bot-data/
//!     0192...-1730000000001.txt
//! ```

use std::path::PathBuf;

use botique_core::storage::BlobStore;
use botique_types::error::BlobError;

/// Filesystem-backed implementation of `BlobStore`.
#[derive(Clone)]
pub struct LocalBlobStore {
    base_dir: PathBuf,
}

impl LocalBlobStore {
    /// Create a blob store rooted at `base_dir`.
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Root directory of a bucket (used by the static file router).
    pub fn bucket_dir(&self, bucket: &str) -> PathBuf {
        self.base_dir.join(bucket)
    }

    /// Validate a bucket or key component: flat names only.
    fn validate_component(value: &str) -> Result<(), BlobError> {
        if value.is_empty()
            || value.contains("..")
            || value.contains('/')
            || value.contains('\\')
        {
            return Err(BlobError::InvalidKey(value.to_string()));
        }
        Ok(())
    }

    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, BlobError> {
        Self::validate_component(bucket)?;
        Self::validate_component(key)?;
        Ok(self.base_dir.join(bucket).join(key))
    }
}

impl BlobStore for LocalBlobStore {
    async fn put_object(&self, bucket: &str, key: &str, data: &[u8]) -> Result<(), BlobError> {
        let path = self.object_path(bucket, key)?;

        tokio::fs::create_dir_all(self.bucket_dir(bucket))
            .await
            .map_err(|e| BlobError::Io(format!("failed to create bucket dir: {e}")))?;

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| BlobError::Io(format!("failed to write object: {e}")))
    }

    async fn fetch_text(&self, bucket: &str, key: &str) -> Result<String, BlobError> {
        let path = self.object_path(bucket, key)?;

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(BlobError::NotFound);
            }
            Err(e) => return Err(BlobError::Io(e.to_string())),
        };

        String::from_utf8(bytes).map_err(|e| BlobError::Decode(e.to_string()))
    }
}
