//! In-memory conversation log for a single chat session.
//!
//! The log is append-only: turns are never reordered, deduplicated, or
//! individually deleted. The only way to get rid of turns is to drop the
//! whole session. User turns go through a two-phase commit: appended as
//! pending, then committed once the assistant reply lands (or marked failed
//! when that option is enabled).

use botique_types::chat::{ConversationTurn, TurnPhase, TurnRole};

/// Ordered, append-only sequence of conversation turns.
///
/// Exclusively owned by one session's engine; there is no cross-session
/// shared state and no capacity bound within a session's lifetime.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    turns: Vec<ConversationTurn>,
}

impl ConversationLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pending user turn. Returns its index for later commit.
    pub fn append_pending(&mut self, text: String) -> usize {
        self.turns.push(ConversationTurn {
            role: TurnRole::User,
            text,
            phase: TurnPhase::Pending,
        });
        self.turns.len() - 1
    }

    /// Append a committed assistant turn.
    pub fn append_assistant(&mut self, text: String) {
        self.turns.push(ConversationTurn {
            role: TurnRole::Assistant,
            text,
            phase: TurnPhase::Committed,
        });
    }

    /// Mark the turn at `index` as committed.
    pub fn commit(&mut self, index: usize) {
        if let Some(turn) = self.turns.get_mut(index) {
            turn.phase = TurnPhase::Committed;
        }
    }

    /// Mark the turn at `index` as failed.
    pub fn mark_failed(&mut self, index: usize) {
        if let Some(turn) = self.turns.get_mut(index) {
            turn.phase = TurnPhase::Failed;
        }
    }

    /// The current ordered turn sequence, for rendering.
    pub fn snapshot(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Number of turns in the log.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether the log has no turns yet.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_increases_len_by_one() {
        let mut log = ConversationLog::new();
        assert!(log.is_empty());

        log.append_pending("Hi".to_string());
        assert_eq!(log.len(), 1);

        log.append_assistant("Hello!".to_string());
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_append_preserves_prior_order() {
        let mut log = ConversationLog::new();
        log.append_pending("first".to_string());
        log.append_assistant("second".to_string());
        log.append_pending("third".to_string());

        let texts: Vec<&str> = log.snapshot().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_user_turn_pending_then_committed() {
        let mut log = ConversationLog::new();
        let idx = log.append_pending("Hi".to_string());
        assert_eq!(log.snapshot()[idx].phase, TurnPhase::Pending);

        log.commit(idx);
        assert_eq!(log.snapshot()[idx].phase, TurnPhase::Committed);
    }

    #[test]
    fn test_mark_failed() {
        let mut log = ConversationLog::new();
        let idx = log.append_pending("Hi".to_string());
        log.mark_failed(idx);
        assert_eq!(log.snapshot()[idx].phase, TurnPhase::Failed);
        // The turn itself is still present -- no rollback.
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_commit_out_of_range_is_noop() {
        let mut log = ConversationLog::new();
        log.commit(7);
        log.mark_failed(7);
        assert!(log.is_empty());
    }

    #[test]
    fn test_assistant_turns_append_committed() {
        let mut log = ConversationLog::new();
        log.append_assistant("Hello back".to_string());
        let turn = &log.snapshot()[0];
        assert_eq!(turn.role, TurnRole::Assistant);
        assert_eq!(turn.phase, TurnPhase::Committed);
    }
}
