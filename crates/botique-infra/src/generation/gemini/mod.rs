//! Gemini `generateContent` client.
//!
//! Concrete [`GenerationClient`](botique_core::generation::GenerationClient)
//! implementation over the Gemini REST API.

pub mod client;
pub mod types;

pub use client::GeminiClient;
