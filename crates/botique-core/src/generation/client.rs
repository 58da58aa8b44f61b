//! GenerationClient trait definition.
//!
//! The chat pipeline flattens persona, knowledge, and history into a single
//! prompt string; the client sends that text to the external endpoint and
//! returns the first candidate's reply. There is no streaming variant and no
//! retry inside the client -- each send attempt issues exactly one request.

use botique_types::generation::GenerationError;

/// Trait for external text-generation endpoints.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in botique-infra (e.g., `GeminiClient`).
pub trait GenerationClient: Send + Sync {
    /// Send the assembled prompt and return the generated reply text.
    fn generate(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<String, GenerationError>> + Send;
}
