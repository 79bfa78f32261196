//! Prismic content repository
//!
//! [`ContentRepository`] is the seam between the blog and the CMS. The
//! production implementation is [`PrismicClient`]; tests swap in an
//! in-memory repository.

mod client;
mod document;
mod predicate;
#[cfg(test)]
pub(crate) mod testing;

pub use client::PrismicClient;
pub use document::{ApiResponse, RawDocument};
pub use predicate::{Predicate, QueryOptions};

use async_trait::async_trait;

/// Errors raised while talking to the content repository
#[derive(Debug, thiserror::Error)]
pub enum PrismicError {
    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("decode: {0}")]
    Decode(String),

    #[error("no {doc_type} document with uid {uid:?}")]
    NotFound { doc_type: String, uid: String },

    #[error("repository did not advertise a master ref")]
    NoMasterRef,

    #[error("cursor {0:?} does not belong to the configured repository")]
    ForeignCursor(String),

    #[error("invalid endpoint {0:?}")]
    InvalidEndpoint(String),
}

impl PrismicError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PrismicError::NotFound { .. })
    }
}

/// A headless content API
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Run a predicate query, returning the first page of matches
    async fn query(
        &self,
        predicate: &Predicate,
        options: &QueryOptions,
    ) -> Result<ApiResponse, PrismicError>;

    /// Fetch the single document of `doc_type` whose uid is exactly `uid`
    async fn get_by_uid(&self, doc_type: &str, uid: &str) -> Result<RawDocument, PrismicError>;

    /// Follow a `next_page` cursor returned by an earlier response
    async fn fetch_page(&self, cursor: &str) -> Result<ApiResponse, PrismicError>;
}
