//! prismic-blog: a blog rendered from a Prismic repository
//!
//! A paginated post listing and a per-post reading view, fetched from the
//! Prismic REST API and rendered with embedded Tera templates. Pages can be
//! served live or generated ahead of time.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod prismic;
pub mod server;
pub mod templates;
pub mod views;

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::helpers::PostDateFormatter;
use crate::prismic::{ContentRepository, PrismicClient};

/// The blog application
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let public_dir = base_dir.join(&config.public_dir);
        Self {
            config,
            base_dir,
            public_dir,
        }
    }

    /// HTTP client for the configured repository
    pub fn repository(&self) -> Result<Arc<dyn ContentRepository>> {
        Ok(Arc::new(PrismicClient::new(&self.config.prismic)?))
    }

    pub fn date_formatter(&self) -> Result<PostDateFormatter> {
        Ok(PostDateFormatter::from_config(&self.config)?)
    }

    /// Initialize a new site
    pub fn init(&self) -> Result<()> {
        commands::init::init_site(&self.base_dir)
    }

    /// Generate the static site
    pub async fn generate(&self) -> Result<()> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
