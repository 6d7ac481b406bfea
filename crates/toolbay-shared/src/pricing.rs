//! Rental price math for the booking flow.
//!
//! Day counts are inclusive: renting from Monday to Wednesday is three
//! billable days. Both endpoints are normalised to midnight before the
//! span is computed, so the time-of-day components never shift the count.

use chrono::{DateTime, Utc};

use crate::types::Tool;

/// Number of billable days in `[from, to]`, both ends included.
///
/// Returns 0 when the range is reversed.
pub fn days_inclusive(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    let span = to.date_naive().signed_duration_since(from.date_naive());
    let days = span.num_days();
    if days >= 0 {
        days + 1
    } else {
        0
    }
}

/// Price breakdown shown before a reservation is paid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RentalQuote {
    pub days: i64,
    /// Per-day price times the day count.
    pub rental_total: f64,
    /// Refundable deposit, charged up front.
    pub deposit: f64,
    /// Deposit plus rental total.
    pub payable_total: f64,
}

/// Quote a rental of `tool` over `[from, to]`.
///
/// Missing or negative prices count as 0 so a partially filled-in listing
/// still quotes instead of failing.
pub fn quote(tool: &Tool, from: DateTime<Utc>, to: DateTime<Utc>) -> RentalQuote {
    let days = days_inclusive(from, to);
    let per_day = tool.rental_price.unwrap_or(0.0).max(0.0);
    let deposit = tool.deposit_price.unwrap_or(0.0).max(0.0);
    let rental_total = per_day * days as f64;

    RentalQuote {
        days,
        rental_total,
        deposit,
        payable_total: deposit + rental_total,
    }
}
