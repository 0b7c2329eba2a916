//! SEO artifact generation.
//!
//! Writes the three site-wide files search engines and feed readers look for,
//! all derived from the non-draft posts of a built [`Manifest`]:
//!
//! ```text
//! public/
//! ├── sitemap.xml   # Every post, every locale
//! ├── rss.xml       # Posts of one canonical locale, newest first
//! └── robots.txt    # Allow all, point at the sitemap
//! ```
//!
//! Post URLs follow `<site.url>/<locale>/posts/<slug>`.
//!
//! ## Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/en/posts/joining-rockfi</loc>
//!     <lastmod>2026-01-26</lastmod>
//!   </url>
//! </urlset>
//! ```

use crate::config::SiteConfig;
use crate::locale::Locale;
use crate::manifest::{Manifest, PostDocument};
use crate::routing::post_path;
use chrono::NaiveDate;
use rss::validation::Validate;
use rss::{ChannelBuilder, GuidBuilder, ItemBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SITEMAP_FILE: &str = "sitemap.xml";
pub const RSS_FILE: &str = "rss.xml";
pub const ROBOTS_FILE: &str = "robots.txt";

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RSS validation failed: {0}")]
    Rss(String),
}

/// What [`write_artifacts`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactReport {
    /// Written files, in write order.
    pub files: Vec<PathBuf>,
    pub sitemap_urls: usize,
    pub rss_items: usize,
}

/// Absolute URL of a post.
pub fn permalink(site_url: &str, locale: Locale, slug: &str) -> String {
    format!("{site_url}{}", post_path(locale, slug))
}

// ============================================================================
// sitemap.xml
// ============================================================================

/// One `<url>` per non-draft post, locales in `en, fr` order.
pub fn build_sitemap<B>(manifest: &Manifest<B>, site_url: &str) -> String {
    let mut xml = String::with_capacity(4096);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
    xml.push('\n');

    for locale in Locale::ALL {
        for post in manifest.published(locale) {
            let loc = permalink(site_url, locale, &post.slug);
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&loc)));
            xml.push_str(&format!(
                "    <lastmod>{}</lastmod>\n",
                post.frontmatter.last_modified().format("%Y-%m-%d")
            ));
            xml.push_str("  </url>\n");
        }
    }

    xml.push_str("</urlset>\n");
    xml
}

// ============================================================================
// rss.xml
// ============================================================================

/// RSS 2.0 channel for the configured feed locale.
pub fn build_rss<B>(manifest: &Manifest<B>, config: &SiteConfig) -> Result<String, ArtifactError> {
    let locale = config.feeds.rss_locale;
    let items: Vec<rss::Item> = manifest
        .published(locale)
        .map(|post| post_to_item(post, &config.site.url))
        .collect();

    let channel = ChannelBuilder::default()
        .title(config.site.name.clone())
        .link(config.site.url.clone())
        .description(config.site.description.clone())
        .language(locale.as_str().to_string())
        .generator("postfolio".to_string())
        .items(items)
        .build();

    channel
        .validate()
        .map_err(|e| ArtifactError::Rss(e.to_string()))?;
    Ok(channel.to_string())
}

fn post_to_item<B>(post: &PostDocument<B>, site_url: &str) -> rss::Item {
    let link = permalink(site_url, post.locale, &post.slug);
    ItemBuilder::default()
        .title(post.frontmatter.title.clone())
        .link(link.clone())
        .guid(GuidBuilder::default().permalink(true).value(link).build())
        .description(post.frontmatter.summary.clone())
        .pub_date(rfc2822_midnight(post.frontmatter.published_at))
        .categories(
            post.frontmatter
                .tags
                .iter()
                .map(|tag| rss::CategoryBuilder::default().name(tag.clone()).build())
                .collect::<Vec<_>>(),
        )
        .build()
}

/// `Mon, 12 Jan 2026 00:00:00 GMT`
fn rfc2822_midnight(date: NaiveDate) -> String {
    date.format("%a, %d %b %Y 00:00:00 GMT").to_string()
}

// ============================================================================
// robots.txt
// ============================================================================

pub fn build_robots(site_url: &str) -> String {
    format!("User-agent: *\nAllow: /\n\nSitemap: {site_url}/{SITEMAP_FILE}\n")
}

// ============================================================================
// Writing
// ============================================================================

/// Build all three artifacts and write them into `out_dir`.
///
/// Everything is rendered before the first write, so a feed validation error
/// leaves the output directory untouched.
pub fn write_artifacts<B>(
    manifest: &Manifest<B>,
    config: &SiteConfig,
    out_dir: &Path,
) -> Result<ArtifactReport, ArtifactError> {
    let sitemap = build_sitemap(manifest, &config.site.url);
    let rss = build_rss(manifest, config)?;
    let robots = build_robots(&config.site.url);

    fs::create_dir_all(out_dir)?;
    let mut files = Vec::with_capacity(3);
    for (name, content) in [(SITEMAP_FILE, &sitemap), (RSS_FILE, &rss), (ROBOTS_FILE, &robots)] {
        let path = out_dir.join(name);
        fs::write(&path, content)?;
        files.push(path);
    }

    Ok(ArtifactReport {
        files,
        sitemap_urls: Locale::ALL
            .into_iter()
            .map(|locale| manifest.published(locale).count())
            .sum(),
        rss_items: manifest.published(config.feeds.rss_locale).count(),
    })
}

/// Escape the five XML special characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
