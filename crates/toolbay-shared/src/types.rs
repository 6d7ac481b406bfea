//! Wire-level domain types exchanged with the marketplace backend.
//!
//! Every struct derives `Serialize` and `Deserialize` with camelCase field
//! names so it maps 1:1 onto the backend's JSON payloads. The client never
//! constructs `Tool`, `UserRef` or `Lookup` values of its own; they are
//! read-only projections supplied by the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status code a reservation must carry before either party may rate.
pub const STATUS_FINISHED: &str = "FINISHED";

// ---------------------------------------------------------------------------
// Backend projections
// ---------------------------------------------------------------------------

/// A user as the backend presents it to this client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl UserRef {
    /// "First Last", with missing halves dropped.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// A code/name pair used for categories and statuses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Lookup {
    pub code: String,
    pub name: String,
}

/// A tool listed for rent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Price per rental day.
    #[serde(default)]
    pub rental_price: Option<f64>,
    /// Refundable deposit charged up front.
    #[serde(default)]
    pub deposit_price: Option<f64>,
    #[serde(default)]
    pub category: Option<Lookup>,
    #[serde(default)]
    pub status: Option<Lookup>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    /// The owner listing the tool.
    #[serde(default)]
    pub user: Option<UserRef>,
}

impl Tool {
    /// First image, used as the cover everywhere a single picture is shown.
    pub fn cover_image(&self) -> Option<&str> {
        self.image_urls.first().map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Conversations and messages
// ---------------------------------------------------------------------------

/// A conversation between the renter and the lender of one tool.
///
/// Immutable from the client's point of view; there is no edit operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: i64,
    pub tool: Tool,
    pub renter: UserRef,
    pub lender: UserRef,
}

impl Conversation {
    /// The participant that is not the viewer.
    ///
    /// Falls back to the lender when the viewer is neither party (an admin
    /// reading someone else's thread).
    pub fn counterparty(&self, viewer: &UserRef) -> &UserRef {
        if viewer.id == self.renter.id {
            &self.lender
        } else {
            &self.renter
        }
    }
}

/// A single message in a conversation.
///
/// Ordered by `sent_at` ascending within a conversation; the order is
/// server-determined and the client does not re-sort.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub sent_at: DateTime<Utc>,
    pub sent_by: UserRef,
    pub text: String,
    pub seen_by_receiver: bool,
}

// ---------------------------------------------------------------------------
// Reservations and reviews
// ---------------------------------------------------------------------------

/// Which party authored (or is about to author) a rating.
///
/// The wire fields `ownerScore`/`ownerComment` and
/// `borrowerScore`/`borrowerComment` are attributes of the RATER: the owner
/// slot holds what the owner said about the borrower, and vice versa. All
/// role-to-field mapping goes through [`Reservation::score_given_by`] and
/// [`ReviewPatch::for_role`] so no call site touches the literal fields.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RaterRole {
    /// The tool owner rating the borrower.
    Owner,
    /// The borrower rating the tool owner.
    Borrower,
}

/// A reservation of one tool for a date range, with both rating slots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: i64,
    #[serde(rename = "toolDto")]
    pub tool: Tool,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    /// Server-owned lifecycle status; the client only observes it.
    pub status: Lookup,
    #[serde(default)]
    pub owner_score: Option<u8>,
    #[serde(default)]
    pub owner_comment: Option<String>,
    #[serde(default)]
    pub borrower_score: Option<u8>,
    #[serde(default)]
    pub borrower_comment: Option<String>,
    pub borrower: UserRef,
}

impl Reservation {
    /// The score the given role has submitted, if any.
    pub fn score_given_by(&self, role: RaterRole) -> Option<u8> {
        match role {
            RaterRole::Owner => self.owner_score,
            RaterRole::Borrower => self.borrower_score,
        }
    }

    /// The comment the given role has submitted, if any.
    pub fn comment_given_by(&self, role: RaterRole) -> Option<&str> {
        match role {
            RaterRole::Owner => self.owner_comment.as_deref(),
            RaterRole::Borrower => self.borrower_comment.as_deref(),
        }
    }

    /// Whether the reservation has reached its terminal status.
    pub fn is_finished(&self) -> bool {
        self.status.code == STATUS_FINISHED
    }
}

/// Payload for creating a reservation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    pub tool_id: i64,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub borrower_user_id: i64,
}

/// Write payload for one rating slot. Exactly one slot is populated;
/// score and comment travel together in a single call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borrower_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borrower_comment: Option<String>,
}

impl ReviewPatch {
    /// Build the patch writing the slot owned by `role`.
    pub fn for_role(role: RaterRole, score: u8, comment: Option<String>) -> Self {
        match role {
            RaterRole::Owner => Self {
                owner_score: Some(score),
                owner_comment: comment,
                ..Self::default()
            },
            RaterRole::Borrower => Self {
                borrower_score: Some(score),
                borrower_comment: comment,
                ..Self::default()
            },
        }
    }
}

/// One historical rating in a user's statistics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEntry {
    #[serde(default)]
    pub score: Option<u8>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Aggregate rating history for a user, split by the role they were
/// rated in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStatistics {
    #[serde(default)]
    pub as_owner: Vec<ReviewEntry>,
    #[serde(default)]
    pub as_borrower: Vec<ReviewEntry>,
    #[serde(default)]
    pub average_rating: f64,
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// A raw notification event as fetched from the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub message: String,
    /// Opaque reference to the entity the event points at (for
    /// conversation events, the conversation id as a string).
    pub reference: String,
    pub acknowledged: bool,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Payload for listing a new tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolUpload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rental_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup_status: Option<String>,
    pub lookup_category: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}
