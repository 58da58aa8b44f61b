use thiserror::Error;

/// Errors related to bot operations.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("bot not found")]
    NotFound,

    #[error("invalid bot name: {0}")]
    InvalidName(String),

    #[error("not the bot's creator")]
    NotCreator,

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors from repository operations (used by trait definitions in botique-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from blob-store operations.
#[derive(Debug, Error)]
pub enum BlobError {
    #[error("object not found")]
    NotFound,

    #[error("invalid object key: {0}")]
    InvalidKey(String),

    #[error("object is not valid UTF-8: {0}")]
    Decode(String),

    #[error("blob store I/O error: {0}")]
    Io(String),
}
