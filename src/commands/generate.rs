//! Generate static files

use anyhow::Result;

use crate::generator::Generator;
use crate::Blog;

/// Fetch everything from the repository and write the static site
pub async fn run(blog: &Blog) -> Result<()> {
    let start = std::time::Instant::now();

    let repo = blog.repository()?;
    let generator = Generator::new(blog)?;
    let report = generator.generate(repo.as_ref()).await?;

    tracing::info!(
        "Generated {} posts in {:.2}s",
        report.posts_written,
        start.elapsed().as_secs_f64()
    );
    if !report.posts_skipped.is_empty() {
        tracing::warn!("Skipped: {}", report.posts_skipped.join(", "));
    }

    Ok(())
}
