//! Blog server: renders pages from the repository on request

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::{load_listing, load_post, ListingPage};
use crate::helpers::PostDateFormatter;
use crate::prismic::{ContentRepository, PrismicError};
use crate::templates::{MorePosts, TemplateRenderer, STYLESHEET};
use crate::views::{ListedPost, ListingView, ReadingView};
use crate::Blog;

/// Server state
pub struct AppState {
    blog: Blog,
    repo: Arc<dyn ContentRepository>,
    renderer: TemplateRenderer,
    formatter: PostDateFormatter,
}

impl AppState {
    pub fn new(blog: &Blog, repo: Arc<dyn ContentRepository>) -> Result<Self> {
        Ok(Self {
            blog: blog.clone(),
            repo,
            renderer: TemplateRenderer::new(&blog.config)?,
            formatter: blog.date_formatter()?,
        })
    }

    fn error_page(&self, status: StatusCode) -> Response {
        match self.renderer.render_error() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                tracing::error!("Failed to render error page: {}", e);
                (status, "Error").into_response()
            }
        }
    }

    fn page(&self, rendered: Result<String>) -> Response {
        match rendered {
            Ok(html) => Html(html).into_response(),
            Err(e) => {
                tracing::error!("Render failed: {}", e);
                self.error_page(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

/// Build the router
pub fn router(state: Arc<AppState>) -> Router {
    let assets = ServeDir::new(&state.blog.public_dir);

    Router::new()
        .route("/", get(index_handler))
        .route("/post/:slug", get(post_handler))
        .route("/api/posts", get(more_posts_handler))
        .route("/style.css", get(stylesheet_handler))
        .fallback_service(assets)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::new(blog, blog.repository()?)?);
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn index_handler(State(state): State<Arc<AppState>>) -> Response {
    let page = match load_listing(state.repo.as_ref(), &state.blog.config.prismic).await {
        Ok(page) => page,
        Err(e) => {
            tracing::error!("Failed to load listing: {}", e);
            return state.error_page(StatusCode::BAD_GATEWAY);
        }
    };

    let view = ListingView::mount(state.formatter.clone(), page);
    state.page(state.renderer.render_listing(&view))
}

async fn post_handler(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    let config = &state.blog.config;
    let post = match load_post(state.repo.as_ref(), &config.prismic, &slug).await {
        Ok(post) => post,
        Err(e) if e.is_not_found() => {
            tracing::debug!("No post {:?}", slug);
            return match state.renderer.render_not_found(&slug) {
                Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
                Err(_) => state.error_page(StatusCode::NOT_FOUND),
            };
        }
        Err(e) => {
            tracing::error!("Failed to load post {:?}: {}", slug, e);
            return state.error_page(StatusCode::BAD_GATEWAY);
        }
    };

    let view = ReadingView::mount(post, &state.formatter, config.words_per_minute);
    let cache_control = format!(
        "public, s-maxage={}, stale-while-revalidate",
        config.revalidate_secs
    );

    match state.renderer.render_post(&view) {
        Ok(html) => ([(header::CACHE_CONTROL, cache_control)], Html(html)).into_response(),
        Err(e) => state.page(Err(e)),
    }
}

#[derive(Debug, Deserialize)]
struct MoreParams {
    #[serde(default)]
    cursor: Option<String>,
}

/// Continuation endpoint for the listing's "load more" button
async fn more_posts_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MoreParams>,
) -> Response {
    let Some(cursor) = params.cursor.filter(|c| !c.is_empty()) else {
        return Json(MorePosts::new(Vec::new(), None)).into_response();
    };

    let page = match state
        .repo
        .fetch_page(&cursor)
        .await
        .and_then(ListingPage::from_response)
    {
        Ok(page) => page,
        Err(PrismicError::ForeignCursor(_)) => {
            return (StatusCode::BAD_REQUEST, "Invalid cursor").into_response();
        }
        Err(e) => {
            tracing::warn!("Failed to load more posts: {}", e);
            return (StatusCode::BAD_GATEWAY, "Failed to load more posts").into_response();
        }
    };

    let results = page
        .posts
        .into_iter()
        .map(|summary| ListedPost::new(summary, &state.formatter))
        .collect();
    Json(MorePosts::new(results, page.cursor)).into_response()
}

async fn stylesheet_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLESHEET)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::prismic::testing::{post_document, InMemoryRepository};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app(repo: InMemoryRepository) -> Router {
        let dir = std::env::temp_dir();
        let blog = Blog::with_config(dir, SiteConfig::default());
        let state = AppState::new(&blog, Arc::new(repo)).unwrap();
        router(Arc::new(state))
    }

    fn repo() -> InMemoryRepository {
        InMemoryRepository::new(vec![
            post_document("a", "Post A", Some("2021-03-15T19:25:28+0000")),
            post_document("b", "Post B", None),
        ])
    }

    async fn request(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let cache = response
            .headers()
            .get(header::CACHE_CONTROL)
            .map(|v| v.to_str().unwrap().to_string());
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, cache, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_index_renders_first_page() {
        let (status, _, body) = request(app(repo()), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Post A"));
        assert!(!body.contains("Post B"));
        assert!(body.contains("/api/posts?cursor=mem%3A%2F%2Fpage%2F1"));
    }

    #[tokio::test]
    async fn test_post_page_carries_revalidation() {
        let (status, cache, body) = request(app(repo()), "/post/a").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Post A"));
        assert!(body.contains("15 mar 2021"));
        assert_eq!(
            cache.as_deref(),
            Some("public, s-maxage=1800, stale-while-revalidate")
        );
    }

    #[tokio::test]
    async fn test_unknown_slug_is_404() {
        let (status, _, body) = request(app(repo()), "/post/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Post não encontrado"));
    }

    #[tokio::test]
    async fn test_repository_failure_is_502() {
        let repo = repo();
        repo.fail_next(PrismicError::NoMasterRef);
        let (status, _, body) = request(app(repo), "/").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.contains("Algo deu errado"));
    }

    #[tokio::test]
    async fn test_more_posts_returns_formatted_batch() {
        let (status, _, body) = request(app(repo()), "/api/posts?cursor=mem%3A%2F%2Fpage%2F1").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["results"][0]["id"], "b");
        assert_eq!(json["results"][0]["display_date"], "Sem data");
        assert!(json["next_page"].is_null());
        assert!(json["next_href"].is_null());
    }

    #[tokio::test]
    async fn test_more_posts_without_cursor_is_empty() {
        let (status, _, body) = request(app(repo()), "/api/posts").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["results"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_foreign_cursor_is_rejected() {
        let (status, _, _) = request(app(repo()), "/api/posts?cursor=https%3A%2F%2Fevil.example").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_stylesheet() {
        let (status, _, body) = request(app(repo()), "/style.css").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(".load-more"));
    }
}
