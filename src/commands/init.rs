//! Initialize a new blog site

use anyhow::Result;
use std::fs;
use std::path::Path;

const CONFIG_TEMPLATE: &str = r#"# Blog configuration

# Site
title: spacetraveling
public_dir: public

# Dates are shown as "15 mar 2021"
locale: pt_BR
timezone: America/Sao_Paulo
date_format: d MMM yyyy
missing_date_label: Sem data

# Reading
words_per_minute: 200
revalidate_secs: 1800

# Prismic repository
prismic:
  endpoint: https://your-repository.cdn.prismic.io/api/v2
  access_token: ''
  document_type: posts
  page_size: 1
  timeout_secs: 10
"#;

/// Write a starter `_config.yml` into `target_dir`
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;

    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("{:?} already exists", config_path);
    }
    fs::write(&config_path, CONFIG_TEMPLATE)?;
    tracing::info!("Created {:?}", config_path);

    Ok(())
}
