//! In-memory registry of live chat sessions.
//!
//! Sessions are deliberately ephemeral: they exist only in this map, keyed
//! by a session UUID, and are gone on discard or process exit. Each engine
//! sits behind its own `tokio::Mutex`; the handler try-locks it so a second
//! send while one is in flight gets an immediate rejection instead of
//! queueing.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::state::ConcreteChatEngine;

/// Thread-safe registry mapping session ids to live chat engines.
pub struct SessionRegistry {
    sessions: DashMap<Uuid, Arc<Mutex<ConcreteChatEngine>>>,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Register a new session and return its id.
    pub fn create(&self, engine: ConcreteChatEngine) -> Uuid {
        let id = Uuid::now_v7();
        self.sessions.insert(id, Arc::new(Mutex::new(engine)));
        tracing::debug!(session_id = %id, "chat session opened");
        id
    }

    /// Look up a live session.
    pub fn get(&self, id: &Uuid) -> Option<Arc<Mutex<ConcreteChatEngine>>> {
        self.sessions.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Discard a session and its entire conversation history.
    ///
    /// Returns false when the session does not exist.
    pub fn discard(&self, id: &Uuid) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            tracing::debug!(session_id = %id, "chat session discarded");
        }
        removed
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether there are no live sessions.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
