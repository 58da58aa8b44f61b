//! Generation endpoint clients for Botique.

pub mod gemini;

pub use gemini::GeminiClient;
