//! Blob store trait.
//!
//! Defines the interface for the external object store holding bot profile
//! pictures and knowledge files. Implementations live in botique-infra.

use botique_types::error::BlobError;

/// Bucket holding bot profile pictures, served publicly.
pub const PICTURE_BUCKET: &str = "bot-pics";

/// Bucket holding uploaded knowledge files, read by the knowledge loader.
pub const KNOWLEDGE_BUCKET: &str = "bot-data";

/// Trait for bucketed object storage.
///
/// Keys are flat names within a bucket; implementations must reject keys
/// containing path separators or `..`.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait BlobStore: Send + Sync {
    /// Write an object, replacing any existing object at the same key.
    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<(), BlobError>> + Send;

    /// Read an object and decode it as UTF-8 text.
    ///
    /// Returns `BlobError::NotFound` for a missing object and
    /// `BlobError::Decode` for content that is not valid UTF-8.
    fn fetch_text(
        &self,
        bucket: &str,
        key: &str,
    ) -> impl std::future::Future<Output = Result<String, BlobError>> + Send;
}
