//! The bot-chat turn pipeline.
//!
//! One send-receive cycle flows through this module: the engine validates
//! preconditions, appends the user turn, loads knowledge through the blob
//! store, assembles the prompt, calls the generation client, and records the
//! assistant turn. Conversation state lives only in memory for the lifetime
//! of a session.

pub mod engine;
pub mod knowledge;
pub mod log;
pub mod prompt;

pub use engine::{ChatOptions, ChatTurnEngine, SessionContext};
pub use knowledge::KnowledgeLoader;
pub use log::ConversationLog;
pub use prompt::PromptAssembler;
