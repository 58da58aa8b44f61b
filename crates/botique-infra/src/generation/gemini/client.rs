//! GeminiClient -- concrete [`GenerationClient`] implementation for the
//! Gemini `generateContent` API.
//!
//! Sends one non-streaming request per chat turn and extracts the first
//! candidate's text. All three failure modes -- transport error, non-success
//! status, malformed envelope -- surface as distinct [`GenerationError`]
//! variants; nothing is retried here.
//!
//! The API key is wrapped in [`secrecy::SecretString`], sent via the
//! `x-goog-api-key` header (never the URL, so request logging cannot capture
//! it), and never appears in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use botique_core::generation::GenerationClient;
use botique_types::generation::GenerationError;

use super::types::{GenerateContentRequest, GenerateContentResponse};

/// Gemini text-generation client.
///
/// Cheap to clone: the underlying `reqwest::Client` is reference-counted,
/// so one client is shared across all chat sessions.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Gemini API key wrapped in SecretString
    /// * `model` - Model identifier (e.g., "gemini-2.5-flash")
    pub fn new(api_key: SecretString, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model,
        }
    }

    /// The model this client targets.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Build the generateContent URL for the configured model.
    fn url(&self) -> String {
        format!(
            "{}/v1/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

// GeminiClient intentionally does NOT derive Debug: the SecretString field
// already refuses to print, but omitting Debug entirely keeps the whole
// client out of accidental format strings.

impl GenerationClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = GenerateContentRequest::from_prompt(prompt);

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::MalformedResponse(format!("failed to parse response: {e}")))?;

        envelope.first_candidate_text().ok_or_else(|| {
            GenerationError::MalformedResponse("response contained no candidate text".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_client() -> GeminiClient {
        GeminiClient::new(
            SecretString::from("test-key-not-real"),
            "gemini-2.5-flash".to_string(),
        )
    }

    #[test]
    fn test_default_url() {
        let client = make_client();
        assert_eq!(
            client.url(),
            "https://generativelanguage.googleapis.com/v1/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_base_url_override() {
        let client = make_client().with_base_url("http://localhost:8080".to_string());
        assert_eq!(
            client.url(),
            "http://localhost:8080/v1/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_model_accessor() {
        assert_eq!(make_client().model(), "gemini-2.5-flash");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        // Nothing listens on this port; the request fails at the transport
        // layer before any HTTP status exists.
        let client = make_client().with_base_url("http://127.0.0.1:1".to_string());
        let result = client.generate("Hi").await;
        assert!(matches!(result, Err(GenerationError::Network(_))));
    }
}
