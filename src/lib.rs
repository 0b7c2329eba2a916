//! # Postfolio
//!
//! Content core for a bilingual (English/French) MDX blog. Post files on disk
//! are validated and indexed into an immutable manifest that every page, feed,
//! and redirect of the site reads from.
//!
//! # Architecture: Build Once, Read Many
//!
//! ```text
//! 1. Scan       content/posts/  →  Vec<RawPost>    (files → frontmatter records)
//! 2. Build      Vec<RawPost>    →  Manifest        (validate, pair, sort, index)
//! 3. Query      Manifest        →  summaries, tags, related, adjacent, routes
//! 4. Artifacts  Manifest        →  public/         (sitemap.xml, rss.xml, robots.txt)
//! ```
//!
//! Only step 1 touches the filesystem. The builder and the query layer are
//! pure, so they are tested with in-memory records and never need a content
//! tree.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks `content/posts`, splits YAML/TOML frontmatter, produces [`manifest::RawPost`] records |
//! | [`frontmatter`] | Validates one raw record into a typed [`frontmatter::PostFrontmatter`] |
//! | [`manifest`] | Builds the per-locale manifest: path convention, pairing, ordering, indices |
//! | [`query`] | Read-only queries over a built manifest |
//! | [`types`] | Read-side projections returned by queries (`PostSummary`, `AdjacentPosts`, ...) |
//! | [`store`] | Atomic manifest replacement for long-running processes |
//! | [`watch`] | Debounced file watcher that rebuilds through the store |
//! | [`artifacts`] | `sitemap.xml`, `rss.xml`, and `robots.txt` generation |
//! | [`routing`] | Locale URL helpers and legacy `?post=` redirects |
//! | [`locale`] | The closed set of supported locales |
//! | [`config`] | `config.toml` loading, stock defaults, merging, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Fail the Whole Build
//!
//! A path outside the `posts/<slug>/<locale>.mdx` convention, a bad field, a
//! duplicate file, or a slug missing one of its locales aborts manifest
//! construction. There is no partial manifest and no skipped post: a broken
//! post blocks the build instead of silently vanishing from the site.
//!
//! ## Every Slug in Every Locale
//!
//! The site links each article to its translation, so a slug present in one
//! locale must be present in all of them. Locales are a closed enum and the
//! manifest stores one index per locale in a fixed-size array, so "a locale
//! with no index" cannot be represented.
//!
//! ## Opaque Bodies
//!
//! The manifest is generic over the body handle `B`. It carries the handle
//! from input to document untouched and never inspects it. On disk the handle
//! is a [`scan::BodyRef`] (file plus body start line); tests use `()`.
//!
//! ## Replace, Never Patch
//!
//! A manifest has no mutation API. When content changes, a new manifest is
//! built from a full rescan and swapped in through [`store::ManifestStore`],
//! so a reader sees either the old generation or the new one, never a mix.
//! A failed rebuild leaves the previous generation in place.
//!
//! ## Drafts Are Reachable but Unlisted
//!
//! `draft: true` posts are skipped by every listing, tag, related, adjacent,
//! feed, and sitemap query, but [`manifest::Manifest::get_post`] still
//! returns them so a draft can be previewed by direct URL.

pub mod artifacts;
pub mod config;
pub mod frontmatter;
pub mod locale;
pub mod manifest;
pub mod output;
pub mod query;
pub mod routing;
pub mod scan;
pub mod store;
pub mod types;
pub mod watch;

#[cfg(test)]
pub(crate) mod test_helpers;
