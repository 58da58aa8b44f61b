//! Generation endpoint abstractions for Botique.
//!
//! This module defines the `GenerationClient` trait that concrete endpoint
//! clients in botique-infra implement.

pub mod client;

pub use client::GenerationClient;
