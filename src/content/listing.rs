//! Listing data source - the first page of post summaries

use serde::Serialize;

use super::PostSummary;
use crate::config::PrismicConfig;
use crate::prismic::{ApiResponse, ContentRepository, Predicate, PrismicError, QueryOptions};

/// A batch of summaries plus the cursor to the batch after it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingPage {
    pub cursor: Option<String>,
    pub posts: Vec<PostSummary>,
}

impl ListingPage {
    /// Project a search response into summaries
    pub fn from_response(response: ApiResponse) -> Result<Self, PrismicError> {
        let posts = response
            .results
            .iter()
            .map(PostSummary::from_document)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            cursor: response.next_page,
            posts,
        })
    }
}

/// Fetch the first listing page. Failures propagate to the caller.
pub async fn load_listing(
    repo: &dyn ContentRepository,
    config: &PrismicConfig,
) -> Result<ListingPage, PrismicError> {
    let predicate = Predicate::document_type(&config.document_type);
    let options = QueryOptions::new()
        .fetch([
            config.field("title"),
            config.field("subtitle"),
            config.field("author"),
        ])
        .page_size(config.page_size);

    let response = repo.query(&predicate, &options).await?;
    let page = ListingPage::from_response(response)?;
    tracing::debug!(
        "Listing seeded with {} posts (more: {})",
        page.posts.len(),
        page.cursor.is_some()
    );
    Ok(page)
}
