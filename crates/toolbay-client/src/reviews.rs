//! Reservation ratings: who may rate whom, and when.
//!
//! A reservation carries two independent rating slots, one per
//! [`RaterRole`]. A slot opens when the reservation reaches FINISHED and
//! freezes permanently once a score lands in it. The guards here run
//! before any network call; the server enforces the same rules on its
//! side, so this is a fast local check, not a security boundary.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use toolbay_gateway::Gateway;
use toolbay_shared::types::{RaterRole, Reservation, ReviewPatch, ReviewStatistics};

use crate::error::{ClientError, Result};

/// Rating lifecycle of one (reservation, role) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    /// Reservation has not reached FINISHED; rating is closed.
    NotEligible,
    /// Open for a first submission.
    Unrated,
    /// A score exists; the slot is permanently read-only.
    ReadOnly,
}

/// Compute the rating state for one role on one reservation.
pub fn review_state(reservation: &Reservation, role: RaterRole) -> ReviewState {
    if !reservation.is_finished() {
        ReviewState::NotEligible
    } else if reservation.score_given_by(role).is_none() {
        ReviewState::Unrated
    } else {
        ReviewState::ReadOnly
    }
}

/// Holds a reservation list and drives rating submissions against it.
///
/// One instance backs one view: either the user's own rentals
/// ([`load_borrowed`](Self::load_borrowed)) or the reservations against
/// one of their tools ([`load_for_tool`](Self::load_for_tool)).
#[derive(Clone)]
pub struct ReservationReviewModel {
    gateway: Arc<dyn Gateway>,
    reservations: Arc<RwLock<Vec<Reservation>>>,
}

impl ReservationReviewModel {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            reservations: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Reservations the current user holds as borrower. Replaces the held
    /// list; a failed fetch logs and leaves it empty.
    pub async fn load_borrowed(&self) -> Vec<Reservation> {
        let fetched = match self.gateway.fetch_user_reservations().await {
            Ok(list) => list,
            Err(error) => {
                warn!(%error, "Failed to load reservations");
                Vec::new()
            }
        };
        let mut held = self.reservations.write().await;
        *held = fetched.clone();
        fetched
    }

    /// Reservations made against one of the current user's tools.
    pub async fn load_for_tool(&self, tool_id: i64) -> Vec<Reservation> {
        let fetched = match self.gateway.fetch_reservations_for_tool(tool_id).await {
            Ok(list) => list,
            Err(error) => {
                warn!(tool_id, %error, "Failed to load reservations for tool");
                Vec::new()
            }
        };
        let mut held = self.reservations.write().await;
        *held = fetched.clone();
        fetched
    }

    /// Snapshot of the held list.
    pub async fn reservations(&self) -> Vec<Reservation> {
        self.reservations.read().await.clone()
    }

    /// Rating state shown when the review dialog opens. The UI disables
    /// editing outside `Unrated`; [`submit`](Self::submit) refuses
    /// independently.
    pub async fn open_for(&self, reservation_id: i64, role: RaterRole) -> Result<ReviewState> {
        let held = self.reservations.read().await;
        let reservation = held
            .iter()
            .find(|r| r.id == reservation_id)
            .ok_or(ClientError::UnknownReservation(reservation_id))?;
        Ok(review_state(reservation, role))
    }

    /// Submit a rating for one role on one reservation.
    ///
    /// Valid only from `Unrated` with an integer score in 1..=5; anything
    /// else is rejected here, before any network call. Score and comment
    /// go out atomically in one patch. On success the returned
    /// reservation replaces the held entry by id, which flips the
    /// (reservation, role) pair to `ReadOnly`.
    pub async fn submit(
        &self,
        reservation_id: i64,
        role: RaterRole,
        score: u8,
        comment: Option<String>,
    ) -> Result<Reservation> {
        if !(1..=5).contains(&score) {
            return Err(ClientError::ScoreOutOfRange(score));
        }

        {
            let held = self.reservations.read().await;
            let reservation = held
                .iter()
                .find(|r| r.id == reservation_id)
                .ok_or(ClientError::UnknownReservation(reservation_id))?;
            match review_state(reservation, role) {
                ReviewState::NotEligible => return Err(ClientError::RatingNotOpen),
                ReviewState::ReadOnly => return Err(ClientError::AlreadyRated),
                ReviewState::Unrated => {}
            }
        }

        let patch = ReviewPatch::for_role(role, score, comment);
        let updated = self
            .gateway
            .submit_reservation_review(reservation_id, &patch)
            .await?;

        let mut held = self.reservations.write().await;
        if let Some(slot) = held.iter_mut().find(|r| r.id == updated.id) {
            *slot = updated.clone();
        }
        info!(reservation_id, ?role, score, "Rating submitted");
        Ok(updated)
    }

    /// Aggregate rating history for a user, shown on the tool page.
    /// Read path: a failure logs and yields nothing.
    pub async fn statistics_for(&self, user_id: i64) -> Option<ReviewStatistics> {
        match self.gateway.fetch_user_review_statistics(user_id).await {
            Ok(statistics) => Some(statistics),
            Err(error) => {
                warn!(user_id, %error, "Failed to load review statistics");
                None
            }
        }
    }
}
