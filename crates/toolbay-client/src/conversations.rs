//! Conversation list for the messaging view.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use toolbay_gateway::Gateway;
use toolbay_shared::types::{Conversation, Tool, UserRef};

use crate::error::Result;

/// Which messaging affordance the tool page offers the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationAffordance {
    /// The viewer owns the tool; no messaging with yourself.
    Hidden,
    /// No conversation exists yet for this tool.
    Start,
    /// A conversation exists; continue it under the given id.
    Continue(i64),
}

/// Decide the messaging affordance for `viewer` on `tool`.
///
/// `existing` is whatever `load_for_tool` returned. More than one
/// conversation is not reconciled; the first one wins.
pub fn conversation_affordance(
    tool: &Tool,
    viewer: &UserRef,
    existing: &[Conversation],
) -> ConversationAffordance {
    let owns_tool = tool
        .user
        .as_ref()
        .is_some_and(|owner| owner.id == viewer.id);
    if owns_tool {
        return ConversationAffordance::Hidden;
    }

    match existing.first() {
        Some(conversation) => ConversationAffordance::Continue(conversation.id),
        None => ConversationAffordance::Start,
    }
}

#[derive(Default)]
struct ListState {
    conversations: Vec<Conversation>,
    selected: Option<i64>,
}

/// Holds the current user's conversations and the selection.
#[derive(Clone)]
pub struct ConversationListModel {
    gateway: Arc<dyn Gateway>,
    state: Arc<RwLock<ListState>>,
}

impl ConversationListModel {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            state: Arc::new(RwLock::new(ListState::default())),
        }
    }

    /// Fetch all conversations for the current user, replacing the held
    /// list. A failed fetch logs and leaves an empty list; the view
    /// renders its "no conversations" state.
    pub async fn load(&self) -> Vec<Conversation> {
        let conversations = match self.gateway.fetch_conversations().await {
            Ok(list) => list,
            Err(error) => {
                warn!(%error, "Failed to load conversations");
                Vec::new()
            }
        };

        let mut state = self.state.write().await;
        state.conversations = conversations.clone();
        conversations
    }

    /// Conversations scoped to one tool, used to decide the messaging
    /// affordance. Does not touch the held list.
    pub async fn load_for_tool(&self, tool_id: i64) -> Vec<Conversation> {
        match self.gateway.fetch_conversations_for_tool(tool_id).await {
            Ok(list) => list,
            Err(error) => {
                warn!(tool_id, %error, "Failed to load conversations for tool");
                Vec::new()
            }
        }
    }

    /// Start a conversation about a tool. The caller navigates to the
    /// returned conversation; selection is not changed here.
    ///
    /// There is no idempotency guard: racing two creates for the same
    /// tool can yield two conversations. De-duplication belongs to the
    /// backend's create-or-get contract.
    pub async fn create(&self, tool_id: i64) -> Result<Conversation> {
        let conversation = self.gateway.create_conversation(tool_id).await?;
        info!(tool_id, conversation_id = conversation.id, "Conversation created");
        Ok(conversation)
    }

    /// Select a conversation; selecting the already-selected id deselects.
    pub async fn select(&self, conversation_id: i64) {
        let mut state = self.state.write().await;
        if state.selected == Some(conversation_id) {
            state.selected = None;
        } else {
            state.selected = Some(conversation_id);
        }
    }

    pub async fn deselect(&self) {
        self.state.write().await.selected = None;
    }

    pub async fn selected(&self) -> Option<i64> {
        self.state.read().await.selected
    }

    /// Snapshot of the held list, in server order.
    pub async fn conversations(&self) -> Vec<Conversation> {
        self.state.read().await.conversations.clone()
    }
}
