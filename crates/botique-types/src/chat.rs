//! Conversation turn types for Botique chat sessions.
//!
//! A turn is one message exchanged in a chat session, tagged with the role
//! that produced it. Turns live only in memory for the lifetime of a
//! session; they are never persisted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use std::fmt;
use std::str::FromStr;

use crate::generation::GenerationError;

/// Role of a turn in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnRole::User => write!(f, "user"),
            TurnRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for TurnRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(TurnRole::User),
            "assistant" => Ok(TurnRole::Assistant),
            other => Err(format!("invalid turn role: '{other}'")),
        }
    }
}

/// Commit phase of a turn.
///
/// User turns append as `Pending` before the assistant reply arrives, and
/// become `Committed` once generation succeeds. When generation fails the
/// turn stays `Pending` by default; with `mark_failed_turns` enabled it is
/// marked `Failed` instead. Assistant turns are always `Committed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnPhase {
    Pending,
    Committed,
    Failed,
}

/// A single turn within a chat session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub text: String,
    pub phase: TurnPhase,
}

impl ConversationTurn {
    /// A pending user turn (awaiting the assistant reply).
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
            phase: TurnPhase::Pending,
        }
    }

    /// A committed assistant turn.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            text: text.into(),
            phase: TurnPhase::Committed,
        }
    }
}

/// Errors from a single send attempt in a chat session.
///
/// `EmptyInput` and `AccessDenied` are rejected before any I/O happens.
/// `SendInFlight` enforces the one-send-at-a-time invariant. `Generation`
/// wraps all downstream generation failures; the user turn stays appended.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyInput,

    #[error("an active subscription is required to chat with this bot")]
    AccessDenied,

    #[error("a send is already in flight for this session")]
    SendInFlight,

    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_role_roundtrip() {
        for role in [TurnRole::User, TurnRole::Assistant] {
            let s = role.to_string();
            let parsed: TurnRole = s.parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_turn_role_serde() {
        let json = serde_json::to_string(&TurnRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
        let parsed: TurnRole = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, TurnRole::Assistant);
    }

    #[test]
    fn test_user_turn_starts_pending() {
        let turn = ConversationTurn::user("Hi");
        assert_eq!(turn.role, TurnRole::User);
        assert_eq!(turn.phase, TurnPhase::Pending);
    }

    #[test]
    fn test_assistant_turn_is_committed() {
        let turn = ConversationTurn::assistant("Hello back");
        assert_eq!(turn.role, TurnRole::Assistant);
        assert_eq!(turn.phase, TurnPhase::Committed);
    }

    #[test]
    fn test_chat_error_from_generation() {
        let err: ChatError = GenerationError::Network("timed out".to_string()).into();
        assert!(matches!(err, ChatError::Generation(_)));
        assert!(err.to_string().contains("timed out"));
    }
}
