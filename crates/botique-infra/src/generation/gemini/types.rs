//! Gemini generateContent API types.
//!
//! These are Gemini-specific request/response structures used for HTTP
//! communication with the `:generateContent` endpoint. The whole prompt
//! travels as a single text part -- history is already flattened into the
//! prompt string by the assembler, not sent as structured turns.

use serde::{Deserialize, Serialize};

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// Wrap a fully assembled prompt as the single-part request body.
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        }
    }
}

/// One content entry: an ordered list of parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

/// A single text part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

/// Response body from `:generateContent`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// One generated candidate.
#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Extract the first candidate's text, concatenating its parts.
    ///
    /// Returns `None` when there are no candidates, the first candidate has
    /// no content, or its content has no text parts.
    pub fn first_candidate_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        if content.parts.is_empty() {
            return None;
        }
        Some(
            content
                .parts
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join(""),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let req = GenerateContentRequest::from_prompt("You are Helper.\n\nUser: Hi\nAssistant:");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json["contents"][0]["parts"][0]["text"],
            "You are Helper.\n\nUser: Hi\nAssistant:"
        );
        assert_eq!(json["contents"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_response_first_candidate_text() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "Hello "}, {"text": "there!"}]}}
            ]
        }"#;
        let resp: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.first_candidate_text().as_deref(), Some("Hello there!"));
    }

    #[test]
    fn test_response_takes_first_of_many_candidates() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "first"}]}},
                {"content": {"parts": [{"text": "second"}]}}
            ]
        }"#;
        let resp: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.first_candidate_text().as_deref(), Some("first"));
    }

    #[test]
    fn test_response_empty_candidates() {
        let resp: GenerateContentResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(resp.first_candidate_text().is_none());
    }

    #[test]
    fn test_response_missing_candidates_field() {
        let resp: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.first_candidate_text().is_none());
    }

    #[test]
    fn test_response_candidate_without_content() {
        let resp: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [{}]}"#).unwrap();
        assert!(resp.first_candidate_text().is_none());
    }

    #[test]
    fn test_response_content_without_parts() {
        let resp: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [{"content": {"parts": []}}]}"#).unwrap();
        assert!(resp.first_candidate_text().is_none());
    }
}
