//! Listing view - an accumulating sequence of post summaries
//!
//! The view is seeded with the first page and grows one page per
//! "load more". Loading is split into [`ListingView::begin_load_more`] and
//! [`ListingView::complete_load_more`] so that a driver running the fetch on
//! another task cannot race a second load, and so that completions arriving
//! after the view was unmounted or re-seeded are dropped.

use serde::Serialize;

use crate::content::{ListingPage, PostSummary};
use crate::helpers::PostDateFormatter;
use crate::prismic::{ApiResponse, ContentRepository, PrismicError};

/// A summary together with its display date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListedPost {
    #[serde(flatten)]
    pub summary: PostSummary,
    pub display_date: String,
}

impl ListedPost {
    /// The one place a post's display date is computed
    pub fn new(summary: PostSummary, formatter: &PostDateFormatter) -> Self {
        let display_date = formatter.format(summary.first_publication_date.as_deref());
        Self {
            summary,
            display_date,
        }
    }
}

/// Posts in arrival order plus the cursor to the next page
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListingState {
    pub posts: Vec<ListedPost>,
    pub cursor: Option<String>,
}

impl ListingState {
    pub fn has_more(&self) -> bool {
        self.cursor.is_some()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error("a page is already being loaded")]
    InFlight,

    #[error("the listing view is not mounted")]
    Unmounted,

    #[error("failed to load more posts: {0}")]
    Fetch(#[from] PrismicError),
}

/// Permission to complete one load, bound to the mount it started in
#[derive(Debug, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    cursor: String,
}

impl LoadTicket {
    pub fn cursor(&self) -> &str {
        &self.cursor
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No cursor, nothing was fetched
    Exhausted,
    /// This many posts were appended
    Appended(usize),
    /// The view was unmounted or re-seeded while the page was in flight
    Discarded,
}

/// Client-side state of the listing page
#[derive(Debug)]
pub struct ListingView {
    state: ListingState,
    formatter: PostDateFormatter,
    generation: u64,
    mounted: bool,
    in_flight: bool,
    last_error: Option<String>,
}

impl ListingView {
    /// An unmounted, empty view
    pub fn new(formatter: PostDateFormatter) -> Self {
        Self {
            state: ListingState::default(),
            formatter,
            generation: 0,
            mounted: false,
            in_flight: false,
            last_error: None,
        }
    }

    /// Create a view and seed it with the first page
    pub fn mount(formatter: PostDateFormatter, page: ListingPage) -> Self {
        let mut view = Self::new(formatter);
        view.seed(page);
        view
    }

    /// Replace the state with a freshly fetched first page. Any load still
    /// in flight belongs to the previous seed and will be discarded.
    pub fn seed(&mut self, page: ListingPage) {
        self.generation += 1;
        self.mounted = true;
        self.in_flight = false;
        self.last_error = None;

        let posts = page.posts.into_iter().map(|p| self.admit(p)).collect();
        self.state = ListingState {
            posts,
            cursor: page.cursor,
        };
    }

    /// Drop the state; late completions will be discarded
    pub fn unmount(&mut self) {
        self.generation += 1;
        self.mounted = false;
        self.in_flight = false;
        self.last_error = None;
        self.state = ListingState::default();
    }

    pub fn state(&self) -> &ListingState {
        &self.state
    }

    pub fn posts(&self) -> &[ListedPost] {
        &self.state.posts
    }

    pub fn cursor(&self) -> Option<&str> {
        self.state.cursor.as_deref()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    /// Whether the "load more" control should be rendered
    pub fn show_load_more(&self) -> bool {
        self.mounted && self.state.has_more()
    }

    /// Message from the last failed load, cleared by the next success
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Claim the in-flight slot. Returns `None` when the listing is
    /// exhausted; the caller then has nothing to fetch.
    pub fn begin_load_more(&mut self) -> Result<Option<LoadTicket>, ListingError> {
        if !self.mounted {
            return Err(ListingError::Unmounted);
        }
        if self.in_flight {
            return Err(ListingError::InFlight);
        }
        let Some(cursor) = self.state.cursor.clone() else {
            return Ok(None);
        };

        self.in_flight = true;
        Ok(Some(LoadTicket {
            generation: self.generation,
            cursor,
        }))
    }

    /// Apply the result of the fetch started by `ticket`. On failure the
    /// posts and cursor stay as they were so the load can be retried.
    pub fn complete_load_more(
        &mut self,
        ticket: LoadTicket,
        result: Result<ApiResponse, PrismicError>,
    ) -> Result<LoadOutcome, ListingError> {
        if ticket.generation != self.generation {
            tracing::debug!("Discarding page for {} from a previous mount", ticket.cursor);
            return Ok(LoadOutcome::Discarded);
        }
        if !self.in_flight {
            tracing::debug!("Discarding page for {}, no load in flight", ticket.cursor);
            return Ok(LoadOutcome::Discarded);
        }
        self.in_flight = false;

        let page = match result.and_then(ListingPage::from_response) {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Loading more posts failed: {}", e);
                self.last_error = Some(e.to_string());
                return Err(ListingError::Fetch(e));
            }
        };

        let appended = page.posts.len();
        let admitted: Vec<ListedPost> = page.posts.into_iter().map(|p| self.admit(p)).collect();
        self.state.posts.extend(admitted);
        self.state.cursor = page.cursor;
        self.last_error = None;

        Ok(LoadOutcome::Appended(appended))
    }

    /// Fetch the page behind the cursor and append it
    pub async fn load_more(
        &mut self,
        repo: &dyn ContentRepository,
    ) -> Result<LoadOutcome, ListingError> {
        let Some(ticket) = self.begin_load_more()? else {
            return Ok(LoadOutcome::Exhausted);
        };
        let result = repo.fetch_page(ticket.cursor()).await;
        self.complete_load_more(ticket, result)
    }

    fn admit(&self, summary: PostSummary) -> ListedPost {
        ListedPost::new(summary, &self.formatter)
    }
}
