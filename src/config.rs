//! Site configuration module.
//!
//! Loads and validates `config.toml` from the content root. Every key is
//! optional: the file is merged over stock defaults, so it only needs the
//! values that differ.
//!
//! ## Configuration Options
//!
//! ```toml
//! [site]
//! url = "https://example.com/blog"   # Absolute base URL, no trailing slash needed
//! name = "My Blog"                   # Channel title for rss.xml
//! description = "Engineering notes." # Channel description for rss.xml
//!
//! [feeds]
//! rss_locale = "en"                  # The one locale published in rss.xml
//! related_limit = 3                  # Related posts shown per article
//! ```
//!
//! Unknown keys are rejected to catch typos early. The site URL can also be
//! supplied at run time (`--site-url` or `SITE_URL`), which wins over the file.

use crate::locale::Locale;
use crate::query::DEFAULT_RELATED_LIMIT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the content root.
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Identity of the published site.
    pub site: SiteSection,
    /// Feed and listing settings.
    pub feeds: FeedConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    /// Absolute base URL every generated link starts with.
    pub url: String,
    pub name: String,
    pub description: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            url: "https://example.com".to_string(),
            name: "My Blog".to_string(),
            description: "Engineering deep dives, architecture notes, and backend lessons."
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    /// Locale whose posts are published in `rss.xml`.
    pub rss_locale: Locale,
    /// Maximum number of related posts per article.
    pub related_limit: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            rss_locale: Locale::En,
            related_limit: DEFAULT_RELATED_LIMIT,
        }
    }
}

impl SiteConfig {
    /// Validate values and normalise the site URL (trailing `/` removed).
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        let url = self.site.url.trim().trim_end_matches('/');
        let parsed = url::Url::parse(url).map_err(|e| {
            ConfigError::Validation(format!("site.url '{}' is not a valid URL: {e}", self.site.url))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "site.url must start with http:// or https://, got '{}'",
                self.site.url
            )));
        }
        self.site.url = url.to_string();

        if self.site.name.trim().is_empty() {
            return Err(ConfigError::Validation("site.name must not be empty".into()));
        }
        if self.feeds.related_limit == 0 {
            return Err(ConfigError::Validation(
                "feeds.related_limit must be at least 1".into(),
            ));
        }
        Ok(self)
    }

    /// Override `site.url` (from the CLI or environment) and re-validate.
    pub fn with_site_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.site.url = url.to_string();
        self.validate()
    }
}

// =============================================================================
// Loading and merging
// =============================================================================

/// Stock defaults as a TOML table, the base layer for user overrides.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Merge `overlay` onto `base`: tables merge key by key, anything else is
/// replaced by the overlay value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut table), toml::Value::Table(overrides)) => {
            for (key, value) in overrides {
                let merged = match table.remove(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => value,
                };
                table.insert(key, merged);
            }
            toml::Value::Table(table)
        }
        (_, overlay) => overlay,
    }
}

/// Read `config.toml` from `dir` as a raw TOML value, `None` if absent.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)?;
    Ok(Some(toml::from_str(&content)?))
}

/// Merge an optional overlay onto `base`, deserialize, and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(overlay) => merge_toml(base, overlay),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()
}

/// Load the site config for a content root.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(root)?)
}

/// A fully commented `config.toml` holding every key at its default value.
///
/// Printed by the `gen-config` command.
pub fn stock_config_toml() -> &'static str {
    r##"# Postfolio Configuration
# =======================
# Place this file at the content root (next to posts/).
# All settings are optional; values below are the defaults.
# Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
# Absolute base URL. Post links are <url>/<locale>/posts/<slug>.
# Overridden by --site-url or the SITE_URL environment variable.
url = "https://example.com"

# Channel title in rss.xml.
name = "My Blog"

# Channel description in rss.xml.
description = "Engineering deep dives, architecture notes, and backend lessons."

# ---------------------------------------------------------------------------
# Feeds and listings
# ---------------------------------------------------------------------------
[feeds]
# The single locale published in rss.xml ("en" or "fr").
rss_locale = "en"

# Maximum related posts listed under an article.
related_limit = 3
"##
}
