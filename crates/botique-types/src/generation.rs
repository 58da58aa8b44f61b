//! Generation endpoint error types for Botique.
//!
//! The generation client issues a single non-streaming request per turn.
//! Its three failure modes are kept distinct so callers can report them
//! precisely; none of them is retried by the client itself.

use thiserror::Error;

/// Errors from the external text-generation endpoint.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The HTTP request never completed (DNS, connect, timeout).
    #[error("generation request failed: {0}")]
    Network(String),

    /// The endpoint answered with a non-success status.
    #[error("generation endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response parsed but did not contain the expected candidate text.
    #[error("malformed generation response: {0}")]
    MalformedResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = GenerationError::Status {
            status: 429,
            body: "quota exceeded".to_string(),
        };
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn test_malformed_error_display() {
        let err = GenerationError::MalformedResponse("no candidates".to_string());
        assert!(err.to_string().contains("no candidates"));
    }
}
