//! Turn orchestrator: drives one send-receive cycle per user message.
//!
//! The engine is a small state machine (`Idle -> Sending -> Idle`) owning a
//! session's conversation log exclusively. Preconditions are checked before
//! any I/O: empty input and missing access are rejected synchronously, and a
//! second send while one is in flight is refused. The user turn is appended
//! optimistically before the generation call; on failure it stays appended
//! with no assistant reply (at-least-once user turn, at-most-once assistant
//! turn).
//!
//! Cancellation is not supported: once a generation request is issued it
//! runs to completion or failure.

use botique_types::bot::Bot;
use botique_types::chat::{ChatError, ConversationTurn};
use botique_types::identity::UserId;

use crate::generation::GenerationClient;
use crate::storage::BlobStore;

use super::knowledge::KnowledgeLoader;
use super::log::ConversationLog;
use super::prompt::PromptAssembler;

/// Explicit per-session context, captured once at session creation.
///
/// Replaces any ambient current-user lookup: the engine never consults
/// global state to decide whether a send is allowed.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub user_id: UserId,
    /// Evaluated against the subscription store when the session opens.
    /// No generation call is permitted while this is false.
    pub access_granted: bool,
}

/// Tunable behavior for the turn pipeline.
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    /// Mark the optimistic user turn as failed when generation fails,
    /// instead of leaving it unmarked.
    pub mark_failed_turns: bool,
    /// Character cap for the rendered history section. `None` = no cap.
    pub history_char_limit: Option<usize>,
}

/// Send-cycle state. One send is in flight per session at most.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SendState {
    Idle,
    Sending,
}

/// Orchestrates chat turns for one session.
///
/// Owns the session's conversation log; all mutation happens on the logical
/// thread of control that issued the send.
pub struct ChatTurnEngine<B: BlobStore, G: GenerationClient> {
    bot: Bot,
    context: SessionContext,
    log: ConversationLog,
    loader: KnowledgeLoader<B>,
    client: G,
    options: ChatOptions,
    state: SendState,
}

impl<B: BlobStore, G: GenerationClient> ChatTurnEngine<B, G> {
    /// Create an engine for a freshly opened session.
    pub fn new(bot: Bot, context: SessionContext, store: B, client: G, options: ChatOptions) -> Self {
        Self {
            bot,
            context,
            log: ConversationLog::new(),
            loader: KnowledgeLoader::new(store),
            client,
            options,
            state: SendState::Idle,
        }
    }

    /// The bot this session is chatting with.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    /// The session context this engine was created with.
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Ordered snapshot of the conversation so far.
    pub fn turns(&self) -> &[ConversationTurn] {
        self.log.snapshot()
    }

    /// Run one send-receive cycle and return the assistant's reply text.
    ///
    /// Validation failures (`EmptyInput`, `AccessDenied`, `SendInFlight`)
    /// leave the log untouched. Once validation passes the user turn is
    /// appended immediately and survives a generation failure.
    pub async fn send(&mut self, input: &str) -> Result<String, ChatError> {
        if self.state == SendState::Sending {
            return Err(ChatError::SendInFlight);
        }
        if input.trim().is_empty() {
            return Err(ChatError::EmptyInput);
        }
        if !self.context.access_granted {
            return Err(ChatError::AccessDenied);
        }

        self.state = SendState::Sending;

        // Optimistic append: visible to callers before the reply arrives.
        let user_index = self.log.append_pending(input.to_string());

        let knowledge = self.loader.load(&self.bot.training_data).await;

        // History is everything before the turn just appended; the new
        // message is rendered separately by the assembler.
        let prior_turns = &self.log.snapshot()[..user_index];
        let prompt = PromptAssembler::build(
            &self.bot.name,
            &self.bot.description,
            &knowledge,
            prior_turns,
            input,
            self.options.history_char_limit,
        );

        match self.client.generate(&prompt).await {
            Ok(reply) => {
                self.log.commit(user_index);
                self.log.append_assistant(reply.clone());
                self.state = SendState::Idle;
                tracing::info!(
                    bot_id = %self.bot.id,
                    turns = self.log.len(),
                    "chat turn completed"
                );
                Ok(reply)
            }
            Err(err) => {
                // No rollback: the user turn stays. Marking it failed is
                // opt-in; the default leaves it unmarked.
                if self.options.mark_failed_turns {
                    self.log.mark_failed(user_index);
                }
                self.state = SendState::Idle;
                tracing::warn!(bot_id = %self.bot.id, error = %err, "chat turn failed");
                Err(ChatError::Generation(err))
            }
        }
    }
}
