//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub public_dir: String,

    // Date / Time
    pub locale: String,
    pub timezone: String,
    pub date_format: String,
    /// Shown in place of a publication date the CMS did not provide
    pub missing_date_label: String,

    // Reading
    pub words_per_minute: usize,
    /// Seconds a rendered post page stays fresh for shared caches
    pub revalidate_secs: u64,

    // Content repository
    pub prismic: PrismicConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "spacetraveling".to_string(),
            public_dir: "public".to_string(),

            locale: "pt_BR".to_string(),
            timezone: "America/Sao_Paulo".to_string(),
            date_format: "d MMM yyyy".to_string(),
            missing_date_label: "Sem data".to_string(),

            words_per_minute: 200,
            revalidate_secs: 60 * 30,

            prismic: PrismicConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would break pagination or the reading estimate
    pub fn validate(&self) -> Result<()> {
        if self.words_per_minute == 0 {
            anyhow::bail!("words_per_minute must be greater than zero");
        }
        if self.prismic.page_size == 0 {
            anyhow::bail!("prismic.page_size must be greater than zero");
        }
        if self.prismic.document_type.is_empty() {
            anyhow::bail!("prismic.document_type must not be empty");
        }
        Ok(())
    }
}

/// Prismic repository configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrismicConfig {
    /// API root, e.g. `https://my-repo.cdn.prismic.io/api/v2`
    pub endpoint: String,
    pub access_token: Option<String>,
    pub document_type: String,
    pub page_size: u32,
    pub timeout_secs: u64,
}

impl Default for PrismicConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://spacetraveling.cdn.prismic.io/api/v2".to_string(),
            access_token: None,
            document_type: "posts".to_string(),
            page_size: 1,
            timeout_secs: 10,
        }
    }
}

impl PrismicConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Qualified field name as the `fetch` option expects it, e.g. `posts.title`
    pub fn field(&self, name: &str) -> String {
        format!("{}.{}", self.document_type, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.locale, "pt_BR");
        assert_eq!(config.words_per_minute, 200);
        assert_eq!(config.revalidate_secs, 1800);
        assert_eq!(config.prismic.page_size, 1);
        assert_eq!(config.prismic.document_type, "posts");
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
timezone: UTC
prismic:
  endpoint: https://example.cdn.prismic.io/api/v2
  access_token: secret
  page_size: 5
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.timezone, "UTC");
        assert_eq!(config.prismic.access_token.as_deref(), Some("secret"));
        assert_eq!(config.prismic.page_size, 5);
        assert_eq!(config.prismic.document_type, "posts");
        assert_eq!(config.date_format, "d MMM yyyy");
    }

    #[test]
    fn test_field_is_qualified_by_document_type() {
        let config = PrismicConfig::default();
        assert_eq!(config.field("subtitle"), "posts.subtitle");
    }

    #[test]
    fn test_load_rejects_zero_page_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_config.yml");
        fs::write(&path, "prismic:\n  page_size: 0\n").unwrap();
        assert!(SiteConfig::load(&path).is_err());
    }
}
