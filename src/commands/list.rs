//! List site content

use anyhow::Result;

use crate::content::{load_listing, static_paths};
use crate::prismic::ContentRepository;
use crate::views::ListingView;
use crate::Blog;

/// List site content by type
pub async fn run(blog: &Blog, content_type: &str, all: bool) -> Result<()> {
    let repo = blog.repository()?;

    match content_type {
        "post" | "posts" => {
            let view = list_posts(blog, repo.as_ref(), all).await?;
            println!("Posts ({}):", view.posts().len());
            for post in view.posts() {
                println!(
                    "  {} - {} [{}]",
                    post.display_date, post.summary.title, post.summary.id
                );
            }
            if view.show_load_more() {
                println!("  ... more available (use --all)");
            }
        }
        "path" | "paths" => {
            let paths = static_paths(repo.as_ref(), &blog.config.prismic).await?;
            println!("Paths ({}):", paths.slugs.len());
            for slug in &paths.slugs {
                println!("  /post/{}", slug);
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, path", content_type);
        }
    }

    Ok(())
}

/// Seed a listing view and, with `all`, page through it until exhausted
pub async fn list_posts(
    blog: &Blog,
    repo: &dyn ContentRepository,
    all: bool,
) -> Result<ListingView> {
    let first_page = load_listing(repo, &blog.config.prismic).await?;
    let mut view = ListingView::mount(blog.date_formatter()?, first_page);

    if all {
        while view.show_load_more() {
            view.load_more(repo).await?;
        }
    }

    Ok(view)
}
