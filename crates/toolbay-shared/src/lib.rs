// Domain types shared by the gateway and the client models.

pub mod pricing;
pub mod types;

pub use pricing::{days_inclusive, quote, RentalQuote};
pub use types::{
    Conversation, Lookup, Message, NotificationEvent, RaterRole, Reservation, ReservationRequest,
    ReviewEntry, ReviewPatch, ReviewStatistics, Tool, ToolUpload, UserRef, STATUS_FINISHED,
};
