//! The backend contract consumed by the client models.
//!
//! [`Gateway`] lists every REST operation the models are allowed to issue.
//! The models depend on `Arc<dyn Gateway>` only, so tests substitute a
//! scripted implementation and the HTTP wiring stays in [`crate::rest`].

use async_trait::async_trait;

use toolbay_shared::types::{
    Conversation, Message, NotificationEvent, Reservation, ReservationRequest, ReviewPatch,
    ReviewStatistics, Tool, ToolUpload, UserRef,
};

use crate::error::Result;

/// Typed surface of the marketplace backend.
///
/// All payloads are JSON shaped by the backend; this client owns no wire
/// format of its own.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Profile of the authenticated user.
    async fn fetch_profile(&self) -> Result<UserRef>;

    /// All conversations the current user participates in, server order.
    async fn fetch_conversations(&self) -> Result<Vec<Conversation>>;

    /// Conversations scoped to one tool. Zero or more; the caller treats
    /// "at least one" as "a conversation exists".
    async fn fetch_conversations_for_tool(&self, tool_id: i64) -> Result<Vec<Conversation>>;

    /// Start a conversation about a tool. Returns the created conversation
    /// including its id.
    async fn create_conversation(&self, tool_id: i64) -> Result<Conversation>;

    /// Messages of one conversation, ordered by the server (non-decreasing
    /// `sentAt`).
    async fn fetch_messages(&self, conversation_id: i64) -> Result<Vec<Message>>;

    /// Post a message. Success is the status class alone; the body, if
    /// any, is ignored.
    async fn send_message(&self, conversation_id: i64, text: &str) -> Result<()>;

    /// Reservations the current user holds as borrower.
    async fn fetch_user_reservations(&self) -> Result<Vec<Reservation>>;

    /// Reservations made against one of the current user's own tools.
    async fn fetch_reservations_for_tool(&self, tool_id: i64) -> Result<Vec<Reservation>>;

    /// Write one rating slot. Score and comment travel atomically in a
    /// single call; the updated reservation comes back.
    async fn submit_reservation_review(
        &self,
        reservation_id: i64,
        patch: &ReviewPatch,
    ) -> Result<Reservation>;

    /// Notification events for the current user. `acknowledged` narrows
    /// the listing to one acknowledgement state when given.
    async fn fetch_notifications(
        &self,
        acknowledged: Option<bool>,
    ) -> Result<Vec<NotificationEvent>>;

    /// Mark a single event acknowledged.
    async fn acknowledge_notification(&self, id: i64) -> Result<()>;

    /// Aggregate rating history for a user.
    async fn fetch_user_review_statistics(&self, user_id: i64) -> Result<ReviewStatistics>;

    /// One tool by id.
    async fn fetch_tool(&self, tool_id: i64) -> Result<Tool>;

    /// Tools listed by a user.
    async fn fetch_tools_for_user(&self, user_id: i64) -> Result<Vec<Tool>>;

    /// List a new tool.
    async fn upload_tool(&self, payload: &ToolUpload) -> Result<Tool>;

    /// Create a reservation.
    async fn create_reservation(&self, request: &ReservationRequest) -> Result<Reservation>;

    /// Open a checkout session for a reservation. The body is a JSON
    /// string holding the opaque URL the user is redirected to.
    async fn create_checkout_session(&self, reservation_id: i64) -> Result<String>;
}
