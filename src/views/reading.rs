//! Reading view - a single post with its derived display values

use serde::Serialize;

use crate::content::PostDetail;
use crate::helpers::{estimate_reading_time, PostDateFormatter};

/// A post plus the values derived from it when it was received
#[derive(Debug, Clone, Serialize)]
pub struct ReadingView {
    post: PostDetail,
    display_date: String,
    /// Estimated minutes
    reading_time: usize,
    #[serde(skip)]
    words_per_minute: usize,
}

impl ReadingView {
    pub fn mount(post: PostDetail, formatter: &PostDateFormatter, words_per_minute: usize) -> Self {
        let display_date = formatter.format(post.first_publication_date.as_deref());
        let reading_time = estimate_reading_time(&post.content, words_per_minute);
        Self {
            post,
            display_date,
            reading_time,
            words_per_minute,
        }
    }

    /// Hand the view a (possibly revalidated) post. Derived values are only
    /// recomputed when the post differs from the one already held; returns
    /// whether they were.
    pub fn receive(&mut self, post: PostDetail, formatter: &PostDateFormatter) -> bool {
        if post == self.post {
            return false;
        }
        *self = Self::mount(post, formatter, self.words_per_minute);
        true
    }

    pub fn post(&self) -> &PostDetail {
        &self.post
    }

    pub fn display_date(&self) -> &str {
        &self.display_date
    }

    pub fn reading_time(&self) -> usize {
        self.reading_time
    }
}

/// What the reading route shows
#[derive(Debug, Clone)]
pub enum ReadingPage {
    /// The slug was not enumerated ahead of time and is still resolving
    Fallback,
    Ready(ReadingView),
}
