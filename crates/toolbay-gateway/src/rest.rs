//! HTTP implementation of the [`Gateway`] contract.
//!
//! Thin and mechanical: build the URL, issue the request, check the
//! status class, decode the canonical body shape. Retries, caching and
//! merging belong to the models or the backend, not here.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use toolbay_shared::types::{
    Conversation, Message, NotificationEvent, Reservation, ReservationRequest, ReviewPatch,
    ReviewStatistics, Tool, ToolUpload, UserRef,
};

use crate::api::Gateway;
use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};

/// Gateway talking JSON over HTTP to the marketplace backend.
pub struct RestGateway {
    client: reqwest::Client,
    base_url: String,
}

impl RestGateway {
    /// Build a gateway from configuration. One underlying connection pool
    /// is shared by every request this gateway issues.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
            return Err(GatewayError::Config(format!(
                "base URL must be http(s), got {}",
                config.base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Reject anything outside the 2xx class.
    fn check_status(response: &reqwest::Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(GatewayError::Status { status })
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.client.get(self.url(path)).send().await?;
        Self::check_status(&response)?;
        let bytes = response.bytes().await?;
        decode(&bytes)
    }

    async fn get_json_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T> {
        let response = self.client.get(self.url(path)).query(query).send().await?;
        Self::check_status(&response)?;
        let bytes = response.bytes().await?;
        decode(&bytes)
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::check_status(&response)?;
        let bytes = response.bytes().await?;
        decode(&bytes)
    }

    /// POST where only the status class matters; any body is discarded.
    async fn post_for_status<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::check_status(&response)
    }
}

/// Decode the one documented shape for this operation.
///
/// Lists are bare JSON arrays and entities bare objects; wrapper envelopes
/// like `{"content": [...]}` are a malformed response, not a shape to probe.
fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| GatewayError::Decode(e.to_string()))
}

#[async_trait]
impl Gateway for RestGateway {
    async fn fetch_profile(&self) -> Result<UserRef> {
        self.get_json("/auth/me").await
    }

    async fn fetch_conversations(&self) -> Result<Vec<Conversation>> {
        self.get_json("/conversations").await
    }

    async fn fetch_conversations_for_tool(&self, tool_id: i64) -> Result<Vec<Conversation>> {
        self.get_json_with_query("/conversations", &[("toolId", tool_id)])
            .await
    }

    async fn create_conversation(&self, tool_id: i64) -> Result<Conversation> {
        self.post_json("/conversations", &json!({ "toolId": tool_id }))
            .await
    }

    async fn fetch_messages(&self, conversation_id: i64) -> Result<Vec<Message>> {
        self.get_json(&format!("/conversations/{conversation_id}/messages"))
            .await
    }

    async fn send_message(&self, conversation_id: i64, text: &str) -> Result<()> {
        self.post_for_status(
            "/messages",
            &json!({ "conversationId": conversation_id, "text": text }),
        )
        .await
    }

    async fn fetch_user_reservations(&self) -> Result<Vec<Reservation>> {
        self.get_json("/reservation/my").await
    }

    async fn fetch_reservations_for_tool(&self, tool_id: i64) -> Result<Vec<Reservation>> {
        self.get_json(&format!("/tools/{tool_id}/reservations")).await
    }

    async fn submit_reservation_review(
        &self,
        reservation_id: i64,
        patch: &ReviewPatch,
    ) -> Result<Reservation> {
        self.post_json(&format!("/reservation/{reservation_id}/review"), patch)
            .await
    }

    async fn fetch_notifications(
        &self,
        acknowledged: Option<bool>,
    ) -> Result<Vec<NotificationEvent>> {
        match acknowledged {
            Some(flag) => {
                self.get_json_with_query("/notifications", &[("acknowledged", flag)])
                    .await
            }
            None => self.get_json("/notifications").await,
        }
    }

    async fn acknowledge_notification(&self, id: i64) -> Result<()> {
        self.post_for_status(&format!("/notifications/acknowledge/{id}"), &json!({}))
            .await
    }

    async fn fetch_user_review_statistics(&self, user_id: i64) -> Result<ReviewStatistics> {
        self.get_json(&format!("/users/{user_id}/review-statistics"))
            .await
    }

    async fn fetch_tool(&self, tool_id: i64) -> Result<Tool> {
        self.get_json(&format!("/tools/{tool_id}")).await
    }

    async fn fetch_tools_for_user(&self, user_id: i64) -> Result<Vec<Tool>> {
        self.get_json(&format!("/users/{user_id}/tools")).await
    }

    async fn upload_tool(&self, payload: &ToolUpload) -> Result<Tool> {
        self.post_json("/tools", payload).await
    }

    async fn create_reservation(&self, request: &ReservationRequest) -> Result<Reservation> {
        self.post_json("/reservation", request).await
    }

    async fn create_checkout_session(&self, reservation_id: i64) -> Result<String> {
        self.post_json("/payments", &json!({ "reservationId": reservation_id }))
            .await
    }
}
