//! View state for the two page flows
//!
//! A view owns its state exclusively. The listing view accumulates pages of
//! summaries; the reading view derives display values for a single post.

pub mod listing;
pub mod reading;

pub use listing::{ListedPost, ListingError, ListingState, ListingView, LoadOutcome, LoadTicket};
pub use reading::{ReadingPage, ReadingView};
