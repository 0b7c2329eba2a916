//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is **post-centric, not file-centric**. Every post is shown by its
//! positional index, date, and slug; titles, source files, and tags follow as
//! indented context lines. The same post looks the same whether it comes from
//! `check`, `list`, or `related`.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Posts (en)
//! 001 2026-01-12 idempotency-debounce-jobify-bullmq
//!     Title: Idempotency and debounce with BullMQ
//!     Source: posts/idempotency-debounce-jobify-bullmq/en.mdx
//!     Tags: bullmq, queues, idempotency
//!     Series: jobify #2
//!
//! Posts (fr)
//! ...
//!
//! 6 posts in 2 locales (1 draft)
//! ```
//!
//! ## Artifacts
//!
//! ```text
//! sitemap.xml (10 urls)
//! rss.xml (5 items)
//! robots.txt
//! Wrote 3 files to public
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::artifacts::ArtifactReport;
use crate::locale::Locale;
use crate::manifest::{Manifest, PostDocument};
use crate::routing::Route;
use crate::types::{AdjacentPosts, PostSummary};
use crate::watch::WatchEvent;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Post header line: index, publish date, slug.
///
/// ```text
/// 001 2026-01-12 idempotency-debounce-jobify-bullmq
/// ```
fn post_header(index: usize, published_at: chrono::NaiveDate, slug: &str) -> String {
    format!("{} {} {}", format_index(index), published_at, slug)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_text(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// check / scan
// ============================================================================

/// Format the manifest inventory, one section per locale.
///
/// Source paths are shown relative to `source_root` when possible.
pub fn format_check_output<B>(manifest: &Manifest<B>, source_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    for locale in Locale::ALL {
        lines.push(format!("Posts ({locale})"));
        for (i, post) in manifest.posts(locale).iter().enumerate() {
            lines.extend(document_lines(i + 1, post, source_root));
        }
        lines.push(String::new());
    }

    let drafts = manifest
        .posts(Locale::En)
        .iter()
        .filter(|p| p.frontmatter.draft)
        .count();
    let mut total = format!(
        "{} in {}",
        plural(manifest.len(), "post"),
        plural(Locale::COUNT, "locale")
    );
    if drafts > 0 {
        total.push_str(&format!(" ({})", plural(drafts, "draft")));
    }
    lines.push(total);
    lines
}

fn document_lines<B>(index: usize, post: &PostDocument<B>, source_root: &Path) -> Vec<String> {
    let fm = &post.frontmatter;
    let ctx = indent(1);
    let source = post.source.strip_prefix(source_root).unwrap_or(&post.source);

    let mut lines = vec![post_header(index, fm.published_at, &post.slug)];
    lines.push(format!("{ctx}Title: {}", fm.title));
    lines.push(format!("{ctx}Source: {}", source.display()));
    lines.push(format!("{ctx}Tags: {}", fm.tags.join(", ")));
    if let Some(updated) = fm.updated_at {
        lines.push(format!("{ctx}Updated: {updated}"));
    }
    if let Some(series) = &fm.series_id {
        match fm.series_order {
            Some(order) => lines.push(format!("{ctx}Series: {series} #{order}")),
            None => lines.push(format!("{ctx}Series: {series}")),
        }
    }
    if fm.draft {
        lines.push(format!("{ctx}Draft"));
    }
    lines
}

pub fn print_check_output<B>(manifest: &Manifest<B>, source_root: &Path) {
    for line in format_check_output(manifest, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// list / related / series
// ============================================================================

/// Format a summary list. An empty list prints a single `(none)` line.
pub fn format_summaries(summaries: &[PostSummary]) -> Vec<String> {
    if summaries.is_empty() {
        return vec!["(none)".to_string()];
    }
    let ctx = indent(1);
    let mut lines = Vec::new();
    for (i, summary) in summaries.iter().enumerate() {
        lines.push(post_header(i + 1, summary.published_at, &summary.slug));
        lines.push(format!("{ctx}Title: {}", summary.title));
        lines.push(format!("{ctx}Summary: {}", truncate_text(&summary.summary, 72)));
        lines.push(format!(
            "{ctx}Tags: {} ({} min read)",
            summary.tags.join(", "),
            summary.read_time_minutes
        ));
    }
    lines
}

pub fn print_summaries(summaries: &[PostSummary]) {
    for line in format_summaries(summaries) {
        println!("{}", line);
    }
}

// ============================================================================
// tags
// ============================================================================

pub fn format_tags(tags: &[String]) -> Vec<String> {
    if tags.is_empty() {
        return vec!["(none)".to_string()];
    }
    let mut lines: Vec<String> = tags.iter().map(|t| format!("#{t}")).collect();
    lines.push(plural(tags.len(), "tag"));
    lines
}

pub fn print_tags(tags: &[String]) {
    for line in format_tags(tags) {
        println!("{}", line);
    }
}

// ============================================================================
// adjacent
// ============================================================================

/// ```text
/// Previous: 2025-11-10 jobify-workers-queues-nestjs
/// Next: (none)
/// ```
pub fn format_adjacent(adjacent: &AdjacentPosts) -> Vec<String> {
    let side = |label: &str, post: &Option<PostSummary>| match post {
        Some(p) => format!("{label}: {} {}", p.published_at, p.slug),
        None => format!("{label}: (none)"),
    };
    vec![
        side("Previous", &adjacent.previous),
        side("Next", &adjacent.next),
    ]
}

pub fn print_adjacent(adjacent: &AdjacentPosts) {
    for line in format_adjacent(adjacent) {
        println!("{}", line);
    }
}

// ============================================================================
// resolve
// ============================================================================

pub fn format_route(route: &Route) -> String {
    match route {
        Route::PostList(locale) => format!("Post list ({locale})"),
        Route::Post { locale, slug } => format!("Post {locale}/{slug}"),
        Route::PostNotFound { locale, slug } => format!("Not found {locale}/{slug}"),
        Route::Redirect(target) => format!("Redirect \u{2192} {target}"),
    }
}

// ============================================================================
// artifacts
// ============================================================================

pub fn format_artifacts_output(report: &ArtifactReport, out_dir: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    for file in &report.files {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.display().to_string());
        let detail = match name.as_str() {
            crate::artifacts::SITEMAP_FILE => format!(" ({})", plural(report.sitemap_urls, "url")),
            crate::artifacts::RSS_FILE => format!(" ({})", plural(report.rss_items, "item")),
            _ => String::new(),
        };
        lines.push(format!("{name}{detail}"));
    }
    lines.push(format!(
        "Wrote {} to {}",
        plural(report.files.len(), "file"),
        out_dir.display()
    ));
    lines
}

pub fn print_artifacts_output(report: &ArtifactReport, out_dir: &Path) {
    for line in format_artifacts_output(report, out_dir) {
        println!("{}", line);
    }
}

// ============================================================================
// watch
// ============================================================================

pub fn format_watch_event(event: &WatchEvent) -> String {
    match event {
        WatchEvent::Rebuilt { generation, posts } => {
            format!("rebuilt: {} (generation {generation})", plural(*posts, "post"))
        }
        WatchEvent::Failed { error } => {
            format!("rebuild failed, keeping previous manifest: {error}")
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use std::path::PathBuf;

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads_to_three_digits() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn truncate_text_short() {
        assert_eq!(truncate_text("Short text", 40), "Short text");
    }

    #[test]
    fn truncate_text_exact() {
        let text = "a".repeat(40);
        assert_eq!(truncate_text(&text, 40), text);
    }

    #[test]
    fn truncate_text_counts_characters_not_bytes() {
        assert_eq!(truncate_text("mémoire", 3), "mém...");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "post"), "1 post");
        assert_eq!(plural(0, "post"), "0 posts");
        assert_eq!(plural(6, "post"), "6 posts");
    }

    // =========================================================================
    // check
    // =========================================================================

    #[test]
    fn check_output_lists_both_locales_and_totals() {
        let lines = format_check_output(&fixture_manifest(), Path::new("/content"));
        assert_eq!(lines[0], "Posts (en)");
        assert_eq!(lines[1], "001 2026-02-01 ai-force-multiplier");
        assert!(lines.contains(&"Posts (fr)".to_string()));
        assert_eq!(lines.last().unwrap(), "6 posts in 2 locales (1 draft)");
    }

    #[test]
    fn check_output_shows_context_lines() {
        let lines = format_check_output(&fixture_manifest(), Path::new("/content"));
        assert!(lines.contains(&"    Source: posts/ai-force-multiplier/en.mdx".to_string()));
        assert!(lines.contains(&"    Series: jobify #2".to_string()));
        assert!(lines.contains(&"    Updated: 2026-01-20".to_string()));
        assert!(lines.contains(&"    Draft".to_string()));
    }

    #[test]
    fn check_output_keeps_path_outside_root() {
        let lines = format_check_output(&fixture_manifest(), Path::new("/elsewhere"));
        assert!(lines.contains(&"    Source: /content/posts/joining-rockfi/fr.mdx".to_string()));
    }

    // =========================================================================
    // Listings
    // =========================================================================

    #[test]
    fn summaries_format() {
        let manifest = fixture_manifest();
        let lines = format_summaries(&manifest.post_summaries(Locale::En));
        assert_eq!(lines[0], "001 2026-01-12 idempotency-debounce-jobify-bullmq");
        assert_eq!(lines[1], "    Title: idempotency-debounce-jobify-bullmq (en)");
        assert_eq!(lines[2], "    Summary: Valid summary");
        assert_eq!(lines[3], "    Tags: bullmq, queues, idempotency (5 min read)");
        assert_eq!(lines.len(), 5 * 4);
    }

    #[test]
    fn empty_lists_print_none() {
        assert_eq!(format_summaries(&[]), vec!["(none)"]);
        assert_eq!(format_tags(&[]), vec!["(none)"]);
    }

    #[test]
    fn tags_format() {
        let tags = vec!["ai".to_string(), "bullmq".to_string()];
        assert_eq!(format_tags(&tags), vec!["#ai", "#bullmq", "2 tags"]);
    }

    #[test]
    fn adjacent_format() {
        let manifest = fixture_manifest();
        let adjacent = manifest.adjacent_posts(Locale::En, "idempotency-debounce-jobify-bullmq");
        assert_eq!(
            format_adjacent(&adjacent),
            vec![
                "Previous: 2025-12-02 nodejs-stream-backpressure-history-export",
                "Next: (none)",
            ]
        );
    }

    #[test]
    fn route_format() {
        assert_eq!(format_route(&Route::PostList(Locale::Fr)), "Post list (fr)");
        assert_eq!(
            format_route(&Route::Post {
                locale: Locale::En,
                slug: "a".into()
            }),
            "Post en/a"
        );
        assert_eq!(
            format_route(&Route::Redirect("/en".into())),
            "Redirect \u{2192} /en"
        );
    }

    // =========================================================================
    // artifacts / watch
    // =========================================================================

    #[test]
    fn artifacts_output_names_files_with_counts() {
        let out = PathBuf::from("public");
        let report = ArtifactReport {
            files: vec![
                out.join("sitemap.xml"),
                out.join("rss.xml"),
                out.join("robots.txt"),
            ],
            sitemap_urls: 10,
            rss_items: 1,
        };
        assert_eq!(
            format_artifacts_output(&report, &out),
            vec![
                "sitemap.xml (10 urls)",
                "rss.xml (1 item)",
                "robots.txt",
                "Wrote 3 files to public",
            ]
        );
    }

    #[test]
    fn watch_event_format() {
        assert_eq!(
            format_watch_event(&WatchEvent::Rebuilt {
                generation: 3,
                posts: 6
            }),
            "rebuilt: 6 posts (generation 3)"
        );
        let failed = format_watch_event(&WatchEvent::Failed {
            error: "Missing locale variant for slug a".into(),
        });
        assert!(failed.starts_with("rebuild failed, keeping previous manifest:"));
        assert!(failed.contains("slug a"));
    }
}
