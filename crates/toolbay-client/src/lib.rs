// Client-side models for the ToolBay marketplace.
//
// Each model wraps one slice of UI state (conversations, the open message
// thread, reservations and their ratings, notifications, the browse list)
// behind `Arc<RwLock<...>>` and talks to the backend through the
// `Gateway` trait. A fetch always replaces its slice of state wholesale;
// nothing is patched in place.

pub mod booking;
pub mod conversations;
pub mod error;
pub mod listing;
pub mod logging;
pub mod notifications;
pub mod reviews;
pub mod session;
pub mod thread;
pub mod tools;

#[cfg(test)]
pub(crate) mod support;

pub use booking::BookingModel;
pub use conversations::{conversation_affordance, ConversationAffordance, ConversationListModel};
pub use error::{ClientError, Result};
pub use listing::{
    paginate, ListEntry, ListingFilter, ListingFilterModel, Page, SortDirection, SortKey,
};
pub use notifications::{group_events, NotificationGroup, NotificationGroupingModel};
pub use reviews::{review_state, ReservationReviewModel, ReviewState};
pub use session::SessionModel;
pub use thread::{MessageThreadModel, ThreadPhase};
pub use tools::ToolCatalogModel;
