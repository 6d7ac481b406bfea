//! The open message thread: loading, composing and sending.
//!
//! One model instance backs the thread pane. Opening a conversation
//! bumps a generation counter; a fetch that resolves after the selection
//! moved on compares its generation and throws its result away, so a slow
//! response can never paint another conversation's messages under the
//! current header.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use toolbay_gateway::Gateway;
use toolbay_shared::types::Message;

use crate::error::{ClientError, Result};

/// Where the thread pane is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadPhase {
    /// No conversation open.
    Empty,
    /// First fetch for the open conversation is in flight.
    Loading,
    /// Messages are on screen.
    Loaded,
    /// A send round-trip is in flight; messages stay on screen.
    Sending,
}

struct ThreadState {
    phase: ThreadPhase,
    conversation_id: Option<i64>,
    /// Bumped on every `open`; async results carry the value they started
    /// with and are discarded on mismatch.
    generation: u64,
    messages: Vec<Message>,
    compose: String,
}

impl Default for ThreadState {
    fn default() -> Self {
        Self {
            phase: ThreadPhase::Empty,
            conversation_id: None,
            generation: 0,
            messages: Vec::new(),
            compose: String::new(),
        }
    }
}

/// Messages and compose buffer of the currently open conversation.
#[derive(Clone)]
pub struct MessageThreadModel {
    gateway: Arc<dyn Gateway>,
    state: Arc<RwLock<ThreadState>>,
}

impl MessageThreadModel {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            state: Arc::new(RwLock::new(ThreadState::default())),
        }
    }

    /// Open a conversation and fetch its messages.
    ///
    /// Switching away from another conversation clears the held messages
    /// before the new fetch starts. The fetched list replaces the held
    /// one wholesale; a fetch overtaken by a newer `open` is discarded.
    /// A failed fetch logs and shows the empty thread.
    pub async fn open(&self, conversation_id: i64) {
        let generation = {
            let mut state = self.state.write().await;
            if state.conversation_id != Some(conversation_id) {
                state.messages.clear();
                state.compose.clear();
            }
            state.conversation_id = Some(conversation_id);
            state.phase = ThreadPhase::Loading;
            state.generation += 1;
            state.generation
        };

        let fetched = self.gateway.fetch_messages(conversation_id).await;

        let mut state = self.state.write().await;
        if state.generation != generation {
            debug!(conversation_id, "Discarding messages for superseded selection");
            return;
        }
        match fetched {
            Ok(messages) => state.messages = messages,
            Err(error) => {
                warn!(conversation_id, %error, "Failed to load messages");
                state.messages.clear();
            }
        }
        state.phase = ThreadPhase::Loaded;
    }

    /// Close the thread pane and drop its state.
    pub async fn close(&self) {
        let mut state = self.state.write().await;
        let generation = state.generation + 1;
        *state = ThreadState {
            generation,
            ..ThreadState::default()
        };
    }

    /// Replace the compose buffer with what the user typed.
    pub async fn set_compose(&self, text: impl Into<String>) {
        self.state.write().await.compose = text.into();
    }

    pub async fn compose(&self) -> String {
        self.state.read().await.compose.clone()
    }

    /// Send the compose buffer to the open conversation.
    ///
    /// A buffer that trims to nothing is a no-op. On success the buffer
    /// is cleared and the whole thread re-fetched; the authoritative
    /// list is the source of truth, there is no optimistic append. On
    /// failure the buffer is left intact so the user's text is not lost,
    /// and the error is returned for display.
    pub async fn send(&self) -> Result<()> {
        let (conversation_id, text, generation) = {
            let mut state = self.state.write().await;
            let conversation_id = state
                .conversation_id
                .ok_or(ClientError::NoConversationOpen)?;
            let text = state.compose.trim().to_string();
            if text.is_empty() {
                return Ok(());
            }
            state.phase = ThreadPhase::Sending;
            (conversation_id, text, state.generation)
        };

        if let Err(error) = self.gateway.send_message(conversation_id, &text).await {
            let mut state = self.state.write().await;
            if state.generation == generation {
                state.phase = ThreadPhase::Loaded;
            }
            return Err(error.into());
        }

        {
            let mut state = self.state.write().await;
            if state.generation == generation {
                state.compose.clear();
            }
        }

        // Authoritative refresh; also picks up server-side fields such as
        // seenByReceiver that an optimistic append could not know.
        let fetched = self.gateway.fetch_messages(conversation_id).await;

        let mut state = self.state.write().await;
        if state.generation != generation {
            return Ok(());
        }
        match fetched {
            Ok(messages) => state.messages = messages,
            Err(error) => {
                warn!(conversation_id, %error, "Failed to refresh thread after send");
            }
        }
        state.phase = ThreadPhase::Loaded;
        Ok(())
    }

    pub async fn phase(&self) -> ThreadPhase {
        self.state.read().await.phase
    }

    pub async fn conversation_id(&self) -> Option<i64> {
        self.state.read().await.conversation_id
    }

    /// Snapshot of the held messages, in server order.
    pub async fn messages(&self) -> Vec<Message> {
        self.state.read().await.messages.clone()
    }
}
