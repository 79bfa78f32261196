//! Post data source - single posts and the set of known slugs

use std::collections::HashSet;

use serde::Serialize;

use super::PostDetail;
use crate::config::PrismicConfig;
use crate::prismic::{ContentRepository, Predicate, PrismicError, QueryOptions};

/// Slugs known ahead of time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaticPaths {
    pub slugs: Vec<String>,
    /// Unknown slugs render a loading placeholder and are resolved on
    /// demand instead of failing right away
    pub fallback: bool,
}

impl StaticPaths {
    pub fn contains(&self, slug: &str) -> bool {
        self.slugs.iter().any(|s| s == slug)
    }
}

/// Fetch and project the post with uid `slug`. An unknown slug yields
/// [`PrismicError::NotFound`].
pub async fn load_post(
    repo: &dyn ContentRepository,
    config: &PrismicConfig,
    slug: &str,
) -> Result<PostDetail, PrismicError> {
    let doc = repo.get_by_uid(&config.document_type, slug).await?;
    PostDetail::from_document(&doc)
}

/// Enumerate every post slug, following continuation cursors until the
/// repository reports no further pages.
pub async fn static_paths(
    repo: &dyn ContentRepository,
    config: &PrismicConfig,
) -> Result<StaticPaths, PrismicError> {
    let predicate = Predicate::document_type(&config.document_type);
    let options = QueryOptions::new()
        .fetch([config.field("title")])
        .page_size(config.page_size);

    let mut response = repo.query(&predicate, &options).await?;
    let mut slugs = Vec::new();
    let mut seen_cursors = HashSet::new();

    loop {
        slugs.extend(response.results.iter().map(|doc| doc.slug().to_string()));

        let Some(cursor) = response.next_page.take() else {
            break;
        };
        if !seen_cursors.insert(cursor.clone()) {
            tracing::warn!("Cursor {} repeated, stopping path enumeration", cursor);
            break;
        }
        response = repo.fetch_page(&cursor).await?;
    }

    tracing::debug!("Enumerated {} post paths", slugs.len());
    Ok(StaticPaths {
        slugs,
        fallback: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prismic::testing::{post_document, InMemoryRepository};
    use std::sync::atomic::Ordering;

    fn repo() -> InMemoryRepository {
        InMemoryRepository::new(vec![
            post_document("primeiro", "Primeiro", None),
            post_document("segundo", "Segundo", None),
            post_document("terceiro", "Terceiro", None),
        ])
    }

    #[tokio::test]
    async fn test_load_post_by_slug() {
        let post = load_post(&repo(), &PrismicConfig::default(), "segundo")
            .await
            .unwrap();
        assert_eq!(post.id, "segundo");
        assert_eq!(post.title, "Segundo");
    }

    #[tokio::test]
    async fn test_unknown_slug_is_not_found() {
        let err = load_post(&repo(), &PrismicConfig::default(), "quarto")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_slug_match_is_case_sensitive() {
        let err = load_post(&repo(), &PrismicConfig::default(), "Segundo")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_static_paths_follow_every_page() {
        let repo = repo();
        let paths = static_paths(&repo, &PrismicConfig::default()).await.unwrap();

        assert_eq!(paths.slugs, vec!["primeiro", "segundo", "terceiro"]);
        assert!(paths.fallback);
        assert!(paths.contains("terceiro"));
        assert!(!paths.contains("quarto"));
        assert_eq!(repo.page_fetches.load(Ordering::SeqCst), 2);

        let queries = repo.queries.lock().unwrap();
        assert_eq!(queries[0].1.fetch, vec!["posts.title"]);
        assert_eq!(queries[0].1.page_size, Some(1));
    }

    #[tokio::test]
    async fn test_static_paths_propagate_failures() {
        let repo = repo();
        repo.fail_next(PrismicError::Decode("boom".to_string()));
        let result = static_paths(&repo, &PrismicConfig::default()).await;
        assert!(matches!(result, Err(PrismicError::Decode(_))));
    }
}
