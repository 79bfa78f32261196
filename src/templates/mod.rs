//! Built-in blog templates using Tera template engine
//!
//! Templates are embedded directly in the binary. Autoescaping stays on:
//! everything rendered comes from the CMS as plain text.

use anyhow::Result;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::views::{ListedPost, ListingView, ReadingPage, ReadingView};

/// Stylesheet served next to the pages
pub const STYLESHEET: &str = include_str!("blog/style.css");

/// Template renderer with the embedded blog theme
pub struct TemplateRenderer {
    tera: Tera,
    site: SiteData,
}

#[derive(Debug, Clone, Serialize)]
struct SiteData {
    title: String,
}

/// Body of the "load more" endpoint
#[derive(Debug, Clone, Serialize)]
pub struct MorePosts {
    pub results: Vec<ListedPost>,
    pub next_page: Option<String>,
    /// Where the listing script fetches the page after this one
    pub next_href: Option<String>,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("blog/layout.html")),
            ("index.html", include_str!("blog/index.html")),
            ("post.html", include_str!("blog/post.html")),
            ("fallback.html", include_str!("blog/fallback.html")),
            ("not_found.html", include_str!("blog/not_found.html")),
            ("error.html", include_str!("blog/error.html")),
        ])?;

        Ok(Self {
            tera,
            site: SiteData {
                title: config.title.clone(),
            },
        })
    }

    fn context(&self) -> Context {
        let mut context = Context::new();
        context.insert("site", &self.site);
        context
    }

    /// Render the listing; the "load more" button appears iff a cursor remains
    pub fn render_listing(&self, view: &ListingView) -> Result<String> {
        let mut context = self.context();
        context.insert("posts", view.posts());
        let href = if view.show_load_more() {
            view.cursor().map(load_more_href)
        } else {
            None
        };
        context.insert("load_more_href", &href);
        Ok(self.tera.render("index.html", &context)?)
    }

    pub fn render_post(&self, view: &ReadingView) -> Result<String> {
        let mut context = self.context();
        context.insert("post", view.post());
        context.insert("display_date", view.display_date());
        context.insert("reading_time", &view.reading_time());
        Ok(self.tera.render("post.html", &context)?)
    }

    pub fn render_reading_page(&self, page: &ReadingPage) -> Result<String> {
        match page {
            ReadingPage::Fallback => self.render_fallback(),
            ReadingPage::Ready(view) => self.render_post(view),
        }
    }

    /// Placeholder shown while an unlisted slug is resolved
    pub fn render_fallback(&self) -> Result<String> {
        Ok(self.tera.render("fallback.html", &self.context())?)
    }

    pub fn render_not_found(&self, slug: &str) -> Result<String> {
        let mut context = self.context();
        context.insert("slug", slug);
        Ok(self.tera.render("not_found.html", &context)?)
    }

    pub fn render_error(&self) -> Result<String> {
        Ok(self.tera.render("error.html", &self.context())?)
    }
}

/// Route of the "load more" endpoint for `cursor`
pub fn load_more_href(cursor: &str) -> String {
    format!(
        "/api/posts?cursor={}",
        utf8_percent_encode(cursor, NON_ALPHANUMERIC)
    )
}

impl MorePosts {
    pub fn new(results: Vec<ListedPost>, next_page: Option<String>) -> Self {
        let next_href = next_page.as_deref().map(load_more_href);
        Self {
            results,
            next_page,
            next_href,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{BodyEntry, ListingPage, PostDetail, PostSummary, Section};
    use crate::helpers::{PostDateFormatter, WORDS_PER_MINUTE};

    fn renderer() -> TemplateRenderer {
        TemplateRenderer::new(&SiteConfig::default()).unwrap()
    }

    fn listing(cursor: Option<&str>) -> ListingView {
        ListingView::mount(
            PostDateFormatter::default(),
            ListingPage {
                cursor: cursor.map(str::to_string),
                posts: vec![PostSummary {
                    id: "como-utilizar-hooks".to_string(),
                    first_publication_date: Some("2021-03-15T19:25:28+0000".to_string()),
                    title: "Como utilizar <Hooks>".to_string(),
                    subtitle: "Pensando em sincronização".to_string(),
                    author: "Joseph Oliveira".to_string(),
                }],
            },
        )
    }

    #[test]
    fn test_listing_links_each_post() {
        let html = renderer().render_listing(&listing(None)).unwrap();
        assert!(html.contains(r#"href="/post/como-utilizar-hooks""#));
        assert!(html.contains("15 mar 2021"));
        assert!(html.contains("Como utilizar &lt;Hooks&gt;"));
        assert!(!html.contains("Carregar mais posts"));
    }

    #[test]
    fn test_listing_offers_load_more_with_cursor() {
        let html = renderer()
            .render_listing(&listing(Some("https://x.cdn.prismic.io/api/v2/documents/search?page=2")))
            .unwrap();
        assert!(html.contains("Carregar mais posts"));
        assert!(html.contains("/api/posts?cursor=https%3A%2F%2Fx"));
    }

    #[test]
    fn test_post_shows_reading_time() {
        let post = PostDetail {
            id: "cra".to_string(),
            first_publication_date: None,
            title: "Criando um app CRA do zero".to_string(),
            subtitle: String::new(),
            banner_url: "https://images.prismic.io/banner.png".to_string(),
            author: "Danilo Vieira".to_string(),
            content: vec![Section {
                heading: "Proin et varius".to_string(),
                body: vec![BodyEntry::paragraph("Nullam dolor sapien")],
            }],
        };
        let view = ReadingView::mount(post, &PostDateFormatter::default(), WORDS_PER_MINUTE);
        let html = renderer().render_post(&view).unwrap();

        assert!(html.contains("<h2>Proin et varius</h2>"));
        assert!(html.contains("<p>Nullam dolor sapien</p>"));
        assert!(html.contains("1 min"));
        assert!(html.contains("Sem data"));
        assert!(html.contains("banner.png"));
    }

    #[test]
    fn test_fallback_and_not_found() {
        let renderer = renderer();
        assert!(renderer
            .render_reading_page(&ReadingPage::Fallback)
            .unwrap()
            .contains("Carregando..."));
        assert!(renderer
            .render_not_found("nada")
            .unwrap()
            .contains("<code>nada</code>"));
    }

    #[test]
    fn test_more_posts_links_next_page() {
        let more = MorePosts::new(Vec::new(), Some("mem://page/2".to_string()));
        assert_eq!(
            more.next_href.as_deref(),
            Some("/api/posts?cursor=mem%3A%2F%2Fpage%2F2")
        );
        assert!(MorePosts::new(Vec::new(), None).next_href.is_none());
    }
}
