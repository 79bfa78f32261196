//! Generator module - writes the listing and every post as static HTML

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::content::{load_listing, load_post, static_paths};
use crate::helpers::PostDateFormatter;
use crate::prismic::ContentRepository;
use crate::templates::{TemplateRenderer, STYLESHEET};
use crate::views::{ListingView, ReadingPage, ReadingView};
use crate::Blog;

/// What a generation run produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    pub posts_written: usize,
    /// Slugs that vanished before they could be fetched, or cannot be
    /// written as a directory name
    pub posts_skipped: Vec<String>,
}

/// Static site generator using Tera templates
pub struct Generator {
    blog: Blog,
    renderer: TemplateRenderer,
    formatter: PostDateFormatter,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        let renderer = TemplateRenderer::new(&blog.config)?;
        let formatter = blog.date_formatter()?;

        Ok(Self {
            blog: blog.clone(),
            renderer,
            formatter,
        })
    }

    /// Generate the entire site
    pub async fn generate(&self, repo: &dyn ContentRepository) -> Result<GenerateReport> {
        let public_dir = &self.blog.public_dir;
        fs::create_dir_all(public_dir)?;
        fs::write(public_dir.join("style.css"), STYLESHEET)?;

        // Listing: the first page only, later pages load from the browser
        let prismic = &self.blog.config.prismic;
        let first_page = load_listing(repo, prismic).await?;
        let listing = ListingView::mount(self.formatter.clone(), first_page);
        write_file(
            &public_dir.join("index.html"),
            &self.renderer.render_listing(&listing)?,
        )?;

        let paths = static_paths(repo, prismic).await?;
        let post_dir = public_dir.join("post");

        // Placeholder for slugs published after this run
        if paths.fallback {
            write_file(
                &post_dir.join("fallback.html"),
                &self.renderer.render_reading_page(&ReadingPage::Fallback)?,
            )?;
        }

        let mut report = GenerateReport::default();

        for slug in &paths.slugs {
            if !is_path_segment(slug) {
                tracing::warn!("Slug {:?} is not a usable file name, skipping", slug);
                report.posts_skipped.push(slug.clone());
                continue;
            }

            let post = match load_post(repo, prismic, slug).await {
                Ok(post) => post,
                Err(e) if e.is_not_found() => {
                    tracing::warn!("Post {} disappeared during generation, skipping", slug);
                    report.posts_skipped.push(slug.clone());
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let view = ReadingView::mount(post, &self.formatter, self.blog.config.words_per_minute);
            let html = self
                .renderer
                .render_reading_page(&ReadingPage::Ready(view))?;
            write_file(&post_dir.join(slug).join("index.html"), &html)?;
            report.posts_written += 1;
        }

        Ok(report)
    }
}

fn is_path_segment(slug: &str) -> bool {
    !slug.is_empty() && slug != "." && slug != ".." && !slug.contains(['/', '\\'])
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    tracing::debug!("Wrote {:?}", path);
    Ok(())
}
