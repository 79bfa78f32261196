//! Content module - post models and the data sources that fill them

pub mod listing;
mod post;
pub mod reading;

pub use listing::{load_listing, ListingPage};
pub use post::{BodyEntry, PostDetail, PostSummary, Section};
pub use reading::{load_post, static_paths, StaticPaths};
