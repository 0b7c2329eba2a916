//! Shared test utilities for the postfolio test suite.
//!
//! Provides frontmatter builders, in-memory post corpora, the on-disk fixture
//! tree, and lookups that panic with a readable message on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let manifest = fixture_manifest();
//! let summaries = manifest.post_summaries(Locale::En);
//! assert_eq!(slugs(&summaries)[0], "idempotency-debounce-jobify-bullmq");
//! ```

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::locale::Locale;
use crate::manifest::{Manifest, PostDocument, RawPost, build_manifest};
use crate::types::PostSummary;
use serde_json::{Value, json};

// =========================================================================
// Frontmatter builders
// =========================================================================

/// A minimal record that passes validation.
pub fn valid_meta() -> Value {
    json!({
        "title": "Valid title",
        "subtitle": "Valid subtitle",
        "summary": "Valid summary",
        "publishedAt": "2026-01-26",
        "readTimeMinutes": 5,
        "tags": ["nodejs", "backend"],
    })
}

/// A valid record with the given title, publish date, and tags.
pub fn meta_with(title: &str, published_at: &str, tags: &[&str]) -> Value {
    let mut meta = valid_meta();
    meta["title"] = json!(title);
    meta["publishedAt"] = json!(published_at);
    meta["tags"] = json!(tags);
    meta
}

// =========================================================================
// Raw post builders
// =========================================================================

/// A raw post at an explicit path.
pub fn raw_at(path: &str, metadata: Value) -> RawPost<()> {
    RawPost {
        path: PathBuf::from(path),
        metadata,
        body: (),
    }
}

/// A raw post at `/content/posts/<slug>/<locale>.mdx`.
pub fn raw(slug: &str, locale: Locale, metadata: Value) -> RawPost<()> {
    raw_at(&format!("/content/posts/{slug}/{locale}.mdx"), metadata)
}

/// Both locale variants of a post sharing date and tags.
pub fn bilingual(slug: &str, published_at: &str, tags: &[&str]) -> Vec<RawPost<()>> {
    bilingual_with(slug, published_at, tags, |_| {})
}

/// Both locale variants, with `edit` applied to each record.
pub fn bilingual_with(
    slug: &str,
    published_at: &str,
    tags: &[&str],
    edit: impl Fn(&mut Value),
) -> Vec<RawPost<()>> {
    Locale::ALL
        .into_iter()
        .map(|locale| {
            let mut meta = meta_with(&format!("{slug} ({locale})"), published_at, tags);
            edit(&mut meta);
            raw(slug, locale, meta)
        })
        .collect()
}

/// In-memory mirror of `fixtures/content/posts`.
///
/// Newest first (en): ai-force-multiplier (draft), idempotency-debounce-jobify-bullmq,
/// nodejs-stream-backpressure-history-export, jobify-workers-queues-nestjs,
/// joining-rockfi, postgresql-unique-nulls (the last two share a date).
pub fn fixture_posts() -> Vec<RawPost<()>> {
    let mut posts = Vec::new();
    posts.extend(bilingual_with(
        "jobify-workers-queues-nestjs",
        "2025-11-10",
        &["nestjs", "bullmq", "queues", "architecture"],
        |m| {
            m["seriesId"] = json!("jobify");
            m["seriesOrder"] = json!(1);
        },
    ));
    posts.extend(bilingual_with(
        "idempotency-debounce-jobify-bullmq",
        "2026-01-12",
        &["bullmq", "queues", "idempotency"],
        |m| {
            m["updatedAt"] = json!("2026-01-20");
            m["seriesId"] = json!("jobify");
            m["seriesOrder"] = json!(2);
        },
    ));
    posts.extend(bilingual(
        "nodejs-stream-backpressure-history-export",
        "2025-12-02",
        &["nodejs", "streams", "architecture"],
    ));
    posts.extend(bilingual(
        "postgresql-unique-nulls",
        "2025-10-01",
        &["postgresql", "databases"],
    ));
    posts.extend(bilingual("joining-rockfi", "2025-10-01", &["career"]));
    posts.extend(bilingual_with(
        "ai-force-multiplier",
        "2026-02-01",
        &["ai", "architecture"],
        |m| m["draft"] = json!(true),
    ));
    posts
}

pub fn fixture_manifest() -> Manifest<()> {
    build_manifest(fixture_posts()).unwrap()
}

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write `<root>/posts/<slug>/<locale>.mdx` with the given source text.
pub fn write_post(root: &Path, slug: &str, locale: Locale, source: &str) -> PathBuf {
    let dir = root.join("posts").join(slug);
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(format!("{locale}.mdx"));
    std::fs::write(&path, source).unwrap();
    path
}

/// YAML-fronted MDX source for a valid post.
pub fn mdx_source(title: &str, published_at: &str, tags: &[&str]) -> String {
    format!(
        "---\ntitle: {title}\nsubtitle: Subtitle\nsummary: Summary\npublishedAt: {published_at}\nreadTimeMinutes: 3\ntags: [{}]\n---\n\n# {title}\n\nBody text.\n",
        tags.join(", ")
    )
}

// =========================================================================
// Lookups and extractors
// =========================================================================

/// Find a document by slug. Panics if not found.
pub fn find_post<'a, B>(manifest: &'a Manifest<B>, locale: Locale, slug: &str) -> &'a PostDocument<B> {
    manifest.get_post(locale, slug).unwrap_or_else(|| {
        let slugs: Vec<&str> = manifest
            .posts(locale)
            .iter()
            .map(|p| p.slug.as_str())
            .collect();
        panic!("post '{slug}' not found in {locale}. Available: {slugs:?}")
    })
}

/// Slugs of a summary list, in order.
pub fn slugs(summaries: &[PostSummary]) -> Vec<&str> {
    summaries.iter().map(|s| s.slug.as_str()).collect()
}
