//! Prompt assembler for bot chat turns.
//!
//! Flattens persona, knowledge, and conversation history into a single text
//! payload. The generation endpoint takes one message containing the full
//! prompt; history is rendered as alternating "User:"/"Assistant:" lines
//! rather than sent as structured turns.
//!
//! Layout (sections joined by blank lines, empty sections omitted):
//! ```text
//! You are {name}. {description}
//!
//! Use this knowledge to answer questions:
//! {knowledge}
//!
//! Respond to the user's message in a helpful and engaging way.
//!
//! Previous conversation:
//! User: ...
//! Assistant: ...
//!
//! User: {new message}
//! Assistant:
//! ```

use botique_types::chat::{ConversationTurn, TurnRole};

/// Builds the single-string generation prompt for one chat turn.
pub struct PromptAssembler;

impl PromptAssembler {
    /// Assemble the full prompt.
    ///
    /// `prior_turns` is the history *before* the new user message -- the new
    /// message is rendered separately as the final "User:" line, never
    /// duplicated into the history section. `history_char_limit` optionally
    /// caps the rendered history by dropping the oldest turns; `None` passes
    /// arbitrarily long histories through unchanged.
    pub fn build(
        bot_name: &str,
        bot_description: &str,
        knowledge_blob: &str,
        prior_turns: &[ConversationTurn],
        new_user_text: &str,
        history_char_limit: Option<usize>,
    ) -> String {
        let mut sections = Vec::with_capacity(5);

        // Persona preamble -- description only when the bot has one
        if bot_description.trim().is_empty() {
            sections.push(format!("You are {bot_name}."));
        } else {
            sections.push(format!("You are {bot_name}. {}", bot_description.trim()));
        }

        // Knowledge section -- introduced only when there is knowledge
        if !knowledge_blob.trim().is_empty() {
            sections.push(format!(
                "Use this knowledge to answer questions:\n{}",
                knowledge_blob.trim_end()
            ));
        }

        sections.push("Respond to the user's message in a helpful and engaging way.".to_string());

        // History section -- only when there are prior turns
        let history = Self::render_history(prior_turns, history_char_limit);
        if !history.is_empty() {
            sections.push(format!("Previous conversation:\n{history}"));
        }

        // The new user line and the cue marking where generation continues
        sections.push(format!("User: {new_user_text}\nAssistant:"));

        sections.join("\n\n")
    }

    /// Render prior turns as "User:"/"Assistant:" lines.
    ///
    /// When `char_limit` is set, the oldest turns are dropped until the
    /// rendered text fits. A single over-limit turn renders anyway rather
    /// than producing an empty history for a non-empty log.
    fn render_history(turns: &[ConversationTurn], char_limit: Option<usize>) -> String {
        let lines: Vec<String> = turns
            .iter()
            .map(|t| match t.role {
                TurnRole::User => format!("User: {}", t.text),
                TurnRole::Assistant => format!("Assistant: {}", t.text),
            })
            .collect();

        let Some(limit) = char_limit else {
            return lines.join("\n");
        };

        // Keep the longest suffix of lines that fits within the limit.
        let mut start = lines.len();
        let mut used = 0;
        while start > 0 {
            let candidate = lines[start - 1].len() + if start < lines.len() { 1 } else { 0 };
            if used + candidate > limit && start < lines.len() {
                break;
            }
            used += candidate;
            start -= 1;
            if used > limit {
                break;
            }
        }

        lines[start..].join("\n")
    }
}
