use thiserror::Error;

use toolbay_gateway::GatewayError;

/// Errors surfaced by write operations on the models.
///
/// Read operations never return these: per the error-handling policy a
/// failed load is logged and resolves to an empty result, because every
/// view has a sensible "no data" rendering. Writes propagate so the UI
/// can show the failure, and local state is not advanced.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The backend call itself failed.
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// A thread operation was invoked with no conversation open.
    #[error("No conversation is open")]
    NoConversationOpen,

    /// The reservation id is not in the held list.
    #[error("Unknown reservation {0}")]
    UnknownReservation(i64),

    /// Rating attempted before the reservation reached FINISHED.
    #[error("Reservation is not finished; rating is not open yet")]
    RatingNotOpen,

    /// Rating attempted on a slot that already holds a score. Rejected
    /// before any network call; the server enforces the same rule
    /// independently.
    #[error("This rating was already submitted and is read-only")]
    AlreadyRated,

    /// Score outside the accepted 1..=5 range.
    #[error("Score must be between 1 and 5, got {0}")]
    ScoreOutOfRange(u8),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClientError>;
