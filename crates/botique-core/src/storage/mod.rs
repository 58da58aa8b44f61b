//! Blob storage abstractions for Botique.
//!
//! This module defines the `BlobStore` trait that the infrastructure layer
//! implements for object upload and retrieval.

pub mod blob_store;

pub use blob_store::{BlobStore, KNOWLEDGE_BUCKET, PICTURE_BUCKET};
