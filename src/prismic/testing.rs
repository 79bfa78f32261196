//! In-memory repository for tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use super::{ApiResponse, ContentRepository, Predicate, PrismicError, QueryOptions, RawDocument};

/// Serves a fixed set of documents, paging with `mem://page/<n>` cursors
pub(crate) struct InMemoryRepository {
    documents: Vec<RawDocument>,
    failures: Mutex<Vec<PrismicError>>,
    pub queries: Mutex<Vec<(Predicate, QueryOptions)>>,
    pub page_fetches: AtomicUsize,
    page_size: Mutex<usize>,
}

impl InMemoryRepository {
    pub fn new(documents: Vec<RawDocument>) -> Self {
        Self {
            documents,
            failures: Mutex::new(Vec::new()),
            queries: Mutex::new(Vec::new()),
            page_fetches: AtomicUsize::new(0),
            page_size: Mutex::new(1),
        }
    }

    /// Make the next request fail with `error`
    pub fn fail_next(&self, error: PrismicError) {
        self.failures.lock().unwrap().push(error);
    }

    fn take_failure(&self) -> Option<PrismicError> {
        self.failures.lock().unwrap().pop()
    }

    fn page(&self, index: usize) -> ApiResponse {
        let size = *self.page_size.lock().unwrap();
        let start = index * size;
        let results: Vec<RawDocument> = self.documents.iter().skip(start).take(size).cloned().collect();
        let next_page = if start + size < self.documents.len() {
            Some(format!("mem://page/{}", index + 1))
        } else {
            None
        };
        ApiResponse { results, next_page }
    }
}

#[async_trait]
impl ContentRepository for InMemoryRepository {
    async fn query(
        &self,
        predicate: &Predicate,
        options: &QueryOptions,
    ) -> Result<ApiResponse, PrismicError> {
        if let Some(error) = self.take_failure() {
            return Err(error);
        }
        self.queries
            .lock()
            .unwrap()
            .push((predicate.clone(), options.clone()));
        *self.page_size.lock().unwrap() = options.page_size.unwrap_or(20).max(1) as usize;
        Ok(self.page(0))
    }

    async fn get_by_uid(&self, doc_type: &str, uid: &str) -> Result<RawDocument, PrismicError> {
        if let Some(error) = self.take_failure() {
            return Err(error);
        }
        self.documents
            .iter()
            .find(|d| d.doc_type == doc_type && d.uid.as_deref() == Some(uid))
            .cloned()
            .ok_or_else(|| PrismicError::NotFound {
                doc_type: doc_type.to_string(),
                uid: uid.to_string(),
            })
    }

    async fn fetch_page(&self, cursor: &str) -> Result<ApiResponse, PrismicError> {
        self.page_fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.take_failure() {
            return Err(error);
        }
        let index = cursor
            .strip_prefix("mem://page/")
            .and_then(|n| n.parse::<usize>().ok())
            .ok_or_else(|| PrismicError::ForeignCursor(cursor.to_string()))?;
        Ok(self.page(index))
    }
}

/// A "posts" document with summary and detail fields
pub(crate) fn post_document(uid: &str, title: &str, published: Option<&str>) -> RawDocument {
    RawDocument {
        id: format!("id-{}", uid),
        uid: Some(uid.to_string()),
        doc_type: "posts".to_string(),
        first_publication_date: published.map(str::to_string),
        data: json!({
            "title": title,
            "subtitle": format!("{} subtitle", title),
            "author": "Joseph Oliveira",
            "banner": { "url": format!("https://images.prismic.io/{}.png", uid) },
            "content": [
                {
                    "heading": "Proin et varius",
                    "body": [
                        {
                            "type": "paragraph",
                            "text": "Nullam dolor sapien",
                            "spans": [{ "start": 0, "end": 6, "type": "strong" }]
                        }
                    ]
                }
            ]
        }),
    }
}
