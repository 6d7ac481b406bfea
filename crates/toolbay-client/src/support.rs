//! Scripted [`Gateway`] and fixture builders shared by the model tests.
//!
//! The mock records every call it receives, can be told to fail specific
//! operations, and can hold a message fetch in flight behind a gate so
//! tests can interleave two loads deterministically.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::Notify;

use toolbay_gateway::{Gateway, GatewayError, Result};
use toolbay_shared::types::{
    Conversation, Lookup, Message, NotificationEvent, Reservation, ReservationRequest,
    ReviewPatch, ReviewStatistics, Tool, ToolUpload, UserRef,
};

// ---------------------------------------------------------------------------
// Fixture builders
// ---------------------------------------------------------------------------

pub fn user(id: i64, first: &str) -> UserRef {
    UserRef {
        id,
        first_name: first.to_string(),
        last_name: "Teszt".to_string(),
        email: format!("{}@example.com", first.to_lowercase()),
    }
}

pub fn tool(id: i64, name: &str, owner: Option<UserRef>) -> Tool {
    Tool {
        id,
        name: name.to_string(),
        description: None,
        rental_price: Some(1000.0),
        deposit_price: Some(5000.0),
        category: Some(Lookup {
            code: "POWER".to_string(),
            name: "Power tools".to_string(),
        }),
        status: Some(Lookup {
            code: "ACTIVE".to_string(),
            name: "Active".to_string(),
        }),
        image_urls: Vec::new(),
        user: owner,
    }
}

pub fn conversation(id: i64, tool_id: i64, renter: UserRef, lender: UserRef) -> Conversation {
    Conversation {
        id,
        tool: tool(tool_id, "Drill", Some(lender.clone())),
        renter,
        lender,
    }
}

pub fn message(text: &str, sent_by: UserRef, minute: u32) -> Message {
    Message {
        sent_at: at(minute),
        sent_by,
        text: text.to_string(),
        seen_by_receiver: false,
    }
}

pub fn reservation(id: i64, status_code: &str, borrower: UserRef) -> Reservation {
    Reservation {
        id,
        tool: tool(id * 10, "Drill", None),
        date_from: at(0),
        date_to: at(1),
        status: Lookup {
            code: status_code.to_string(),
            name: status_code.to_string(),
        },
        owner_score: None,
        owner_comment: None,
        borrower_score: None,
        borrower_comment: None,
        borrower,
    }
}

pub fn event(id: i64, msg: &str, reference: &str, acknowledged: bool, minute: u32) -> NotificationEvent {
    NotificationEvent {
        id,
        created_at: at(minute),
        message: msg.to_string(),
        reference: reference.to_string(),
        acknowledged,
        kind: "CONVERSATION".to_string(),
    }
}

/// A fixed date plus `minute` minutes, for stable orderable timestamps.
pub fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 7, 1, 12, 0, 0).unwrap() + chrono::Duration::minutes(minute as i64)
}

// ---------------------------------------------------------------------------
// Mock gateway
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockGateway {
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<String>>,

    profile: Mutex<Option<UserRef>>,
    conversations: Mutex<Vec<Conversation>>,
    conversations_by_tool: Mutex<HashMap<i64, Vec<Conversation>>>,
    created_conversation: Mutex<Option<Conversation>>,
    messages: Mutex<HashMap<i64, Vec<Message>>>,
    message_gates: Mutex<HashMap<i64, Arc<Notify>>>,
    reservations: Mutex<Vec<Reservation>>,
    created_reservation: Mutex<Option<Reservation>>,
    notifications: Mutex<Vec<NotificationEvent>>,
    acknowledged: Mutex<Vec<i64>>,
    failing_ack_ids: Mutex<HashSet<i64>>,
    statistics: Mutex<Option<ReviewStatistics>>,
    tools: Mutex<HashMap<i64, Tool>>,
    tools_by_user: Mutex<HashMap<i64, Vec<Tool>>>,
    checkout_url: Mutex<Option<String>>,
}

impl MockGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    // -- scripting ---------------------------------------------------------

    pub fn set_profile(&self, profile: UserRef) {
        *self.profile.lock().unwrap() = Some(profile);
    }

    pub fn set_conversations(&self, list: Vec<Conversation>) {
        *self.conversations.lock().unwrap() = list;
    }

    pub fn set_conversations_for_tool(&self, tool_id: i64, list: Vec<Conversation>) {
        self.conversations_by_tool.lock().unwrap().insert(tool_id, list);
    }

    pub fn set_created_conversation(&self, conversation: Conversation) {
        *self.created_conversation.lock().unwrap() = Some(conversation);
    }

    pub fn set_messages(&self, conversation_id: i64, list: Vec<Message>) {
        self.messages.lock().unwrap().insert(conversation_id, list);
    }

    pub fn set_reservations(&self, list: Vec<Reservation>) {
        *self.reservations.lock().unwrap() = list;
    }

    pub fn set_created_reservation(&self, reservation: Reservation) {
        *self.created_reservation.lock().unwrap() = Some(reservation);
    }

    pub fn set_notifications(&self, list: Vec<NotificationEvent>) {
        *self.notifications.lock().unwrap() = list;
    }

    pub fn set_statistics(&self, statistics: ReviewStatistics) {
        *self.statistics.lock().unwrap() = Some(statistics);
    }

    pub fn set_tool(&self, t: Tool) {
        self.tools.lock().unwrap().insert(t.id, t);
    }

    pub fn set_tools_for_user(&self, user_id: i64, list: Vec<Tool>) {
        self.tools_by_user.lock().unwrap().insert(user_id, list);
    }

    pub fn set_checkout_url(&self, url: &str) {
        *self.checkout_url.lock().unwrap() = Some(url.to_string());
    }

    /// Make every future call to `operation` fail with a 500.
    pub fn fail_on(&self, operation: &str) {
        self.failing.lock().unwrap().insert(operation.to_string());
    }

    /// Make acknowledging one specific event id fail.
    pub fn fail_acknowledge_for(&self, id: i64) {
        self.failing_ack_ids.lock().unwrap().insert(id);
    }

    /// Hold the next `fetch_messages(conversation_id)` until the returned
    /// handle is notified.
    pub fn gate_messages(&self, conversation_id: i64) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.message_gates
            .lock()
            .unwrap()
            .insert(conversation_id, gate.clone());
        gate
    }

    // -- observations ------------------------------------------------------

    /// Count of recorded calls whose name starts with `prefix`.
    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    pub fn acknowledged_ids(&self) -> Vec<i64> {
        self.acknowledged.lock().unwrap().clone()
    }

    // -- internals ---------------------------------------------------------

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_failure(&self, operation: &str) -> Result<()> {
        if self.failing.lock().unwrap().contains(operation) {
            Err(server_error())
        } else {
            Ok(())
        }
    }
}

fn server_error() -> GatewayError {
    GatewayError::Status {
        status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn missing_script(what: &str) -> GatewayError {
    GatewayError::Decode(format!("mock has no scripted response for {what}"))
}

#[async_trait]
impl Gateway for MockGateway {
    async fn fetch_profile(&self) -> Result<UserRef> {
        self.record("fetch_profile".to_string());
        self.check_failure("fetch_profile")?;
        self.profile
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| missing_script("fetch_profile"))
    }

    async fn fetch_conversations(&self) -> Result<Vec<Conversation>> {
        self.record("fetch_conversations".to_string());
        self.check_failure("fetch_conversations")?;
        Ok(self.conversations.lock().unwrap().clone())
    }

    async fn fetch_conversations_for_tool(&self, tool_id: i64) -> Result<Vec<Conversation>> {
        self.record(format!("fetch_conversations_for_tool:{tool_id}"));
        self.check_failure("fetch_conversations_for_tool")?;
        Ok(self
            .conversations_by_tool
            .lock()
            .unwrap()
            .get(&tool_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_conversation(&self, tool_id: i64) -> Result<Conversation> {
        self.record(format!("create_conversation:{tool_id}"));
        self.check_failure("create_conversation")?;
        self.created_conversation
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| missing_script("create_conversation"))
    }

    async fn fetch_messages(&self, conversation_id: i64) -> Result<Vec<Message>> {
        self.record(format!("fetch_messages:{conversation_id}"));
        let gate = self
            .message_gates
            .lock()
            .unwrap()
            .get(&conversation_id)
            .cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.check_failure("fetch_messages")?;
        Ok(self
            .messages
            .lock()
            .unwrap()
            .get(&conversation_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn send_message(&self, conversation_id: i64, text: &str) -> Result<()> {
        self.record(format!("send_message:{conversation_id}:{text}"));
        self.check_failure("send_message")
    }

    async fn fetch_user_reservations(&self) -> Result<Vec<Reservation>> {
        self.record("fetch_user_reservations".to_string());
        self.check_failure("fetch_user_reservations")?;
        Ok(self.reservations.lock().unwrap().clone())
    }

    async fn fetch_reservations_for_tool(&self, tool_id: i64) -> Result<Vec<Reservation>> {
        self.record(format!("fetch_reservations_for_tool:{tool_id}"));
        self.check_failure("fetch_reservations_for_tool")?;
        Ok(self.reservations.lock().unwrap().clone())
    }

    async fn submit_reservation_review(
        &self,
        reservation_id: i64,
        patch: &ReviewPatch,
    ) -> Result<Reservation> {
        self.record(format!("submit_reservation_review:{reservation_id}"));
        self.check_failure("submit_reservation_review")?;

        let mut held = self.reservations.lock().unwrap();
        let slot = held
            .iter_mut()
            .find(|r| r.id == reservation_id)
            .ok_or_else(|| missing_script("submit_reservation_review"))?;

        if patch.owner_score.is_some() {
            slot.owner_score = patch.owner_score;
            slot.owner_comment = patch.owner_comment.clone();
        }
        if patch.borrower_score.is_some() {
            slot.borrower_score = patch.borrower_score;
            slot.borrower_comment = patch.borrower_comment.clone();
        }
        Ok(slot.clone())
    }

    async fn fetch_notifications(
        &self,
        acknowledged: Option<bool>,
    ) -> Result<Vec<NotificationEvent>> {
        self.record(format!("fetch_notifications:{acknowledged:?}"));
        self.check_failure("fetch_notifications")?;
        let all = self.notifications.lock().unwrap().clone();
        Ok(match acknowledged {
            Some(flag) => all.into_iter().filter(|e| e.acknowledged == flag).collect(),
            None => all,
        })
    }

    async fn acknowledge_notification(&self, id: i64) -> Result<()> {
        self.record(format!("acknowledge_notification:{id}"));
        self.check_failure("acknowledge_notification")?;
        if self.failing_ack_ids.lock().unwrap().contains(&id) {
            return Err(server_error());
        }
        self.acknowledged.lock().unwrap().push(id);
        Ok(())
    }

    async fn fetch_user_review_statistics(&self, user_id: i64) -> Result<ReviewStatistics> {
        self.record(format!("fetch_user_review_statistics:{user_id}"));
        self.check_failure("fetch_user_review_statistics")?;
        self.statistics
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| missing_script("fetch_user_review_statistics"))
    }

    async fn fetch_tool(&self, tool_id: i64) -> Result<Tool> {
        self.record(format!("fetch_tool:{tool_id}"));
        self.check_failure("fetch_tool")?;
        self.tools
            .lock()
            .unwrap()
            .get(&tool_id)
            .cloned()
            .ok_or_else(|| missing_script("fetch_tool"))
    }

    async fn fetch_tools_for_user(&self, user_id: i64) -> Result<Vec<Tool>> {
        self.record(format!("fetch_tools_for_user:{user_id}"));
        self.check_failure("fetch_tools_for_user")?;
        Ok(self
            .tools_by_user
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn upload_tool(&self, payload: &ToolUpload) -> Result<Tool> {
        self.record(format!("upload_tool:{}", payload.name));
        self.check_failure("upload_tool")?;
        Ok(tool(999, &payload.name, None))
    }

    async fn create_reservation(&self, request: &ReservationRequest) -> Result<Reservation> {
        self.record(format!("create_reservation:{}", request.tool_id));
        self.check_failure("create_reservation")?;
        self.created_reservation
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| missing_script("create_reservation"))
    }

    async fn create_checkout_session(&self, reservation_id: i64) -> Result<String> {
        self.record(format!("create_checkout_session:{reservation_id}"));
        self.check_failure("create_checkout_session")?;
        self.checkout_url
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| missing_script("create_checkout_session"))
    }
}
