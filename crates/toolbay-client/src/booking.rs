//! Booking flow: create a reservation, then hand off to payment.

use std::sync::Arc;

use tracing::info;

use toolbay_gateway::Gateway;
use toolbay_shared::types::{Reservation, ReservationRequest};

use crate::error::Result;

/// Drives the reservation + checkout hand-off. Stateless: the view keeps
/// the date range and quote, this model only performs the writes.
#[derive(Clone)]
pub struct BookingModel {
    gateway: Arc<dyn Gateway>,
}

impl BookingModel {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    /// Create a reservation. Write path: failures propagate untouched.
    pub async fn reserve(&self, request: &ReservationRequest) -> Result<Reservation> {
        let reservation = self.gateway.create_reservation(request).await?;
        info!(
            reservation_id = reservation.id,
            tool_id = request.tool_id,
            "Reservation created"
        );
        Ok(reservation)
    }

    /// Open a checkout session and return the opaque URL the user is
    /// redirected to. The payment flow beyond the URL is the backend's.
    pub async fn begin_checkout(&self, reservation_id: i64) -> Result<String> {
        let url = self.gateway.create_checkout_session(reservation_id).await?;
        info!(reservation_id, "Checkout session opened");
        Ok(url)
    }
}
