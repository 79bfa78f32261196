//! Helper functions for formatting posts
//!
//! Publication dates and reading-time estimates, shared by the listing
//! and reading views.

mod date;
mod reading_time;

pub use date::*;
pub use reading_time::*;
