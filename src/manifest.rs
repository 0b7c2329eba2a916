//! Post manifest construction.
//!
//! Turns the full set of discovered post files into a [`Manifest`]: an
//! immutable, per-locale index used by every read in the site. Construction is
//! all-or-nothing; any malformed input aborts the build so a broken post can
//! never silently disappear from the published site.
//!
//! ## Path Convention
//!
//! ```text
//! .../posts/<slug>/<locale>.mdx     (or .md)
//!
//! content/posts/joining-rockfi/en.mdx   → slug "joining-rockfi", locale en
//! content/posts/joining-rockfi/fr.mdx   → slug "joining-rockfi", locale fr
//! ```
//!
//! ## Build Steps
//!
//! 1. Parse `(slug, locale)` from each path
//! 2. Validate each frontmatter record ([`crate::frontmatter::validate`])
//! 3. Group by slug, rejecting a second file for the same `(slug, locale)`
//! 4. Require every slug to exist in every locale
//! 5. Sort each locale newest first, ties broken by slug ascending
//! 6. Index each locale's sorted sequence by slug
//!
//! The builder never reads files and never looks at a post body: inputs are
//! [`RawPost`] records whose body is an opaque handle owned by the caller.

use crate::frontmatter::{self, FrontmatterError, PostFrontmatter};
use crate::locale::Locale;
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File extensions recognised as post sources.
pub const POST_EXTENSIONS: &[&str] = &["mdx", "md"];

/// Name of the directory that holds one sub-directory per slug.
pub const POSTS_DIR: &str = "posts";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ManifestError {
    #[error("Invalid post path: {0} (expected .../posts/<slug>/<en|fr>.mdx)")]
    InvalidPath(PathBuf),
    #[error(transparent)]
    Frontmatter(#[from] FrontmatterError),
    #[error("Missing locale variant for slug {slug}: no {locale} post. Both en/fr are required.")]
    MissingLocale { slug: String, locale: Locale },
    #[error("Duplicate locale entry for {slug}/{locale}: {first} and {second}")]
    DuplicateEntry {
        slug: String,
        locale: Locale,
        first: PathBuf,
        second: PathBuf,
    },
}

/// One discovered post file, before validation.
#[derive(Debug, Clone)]
pub struct RawPost<B> {
    pub path: PathBuf,
    /// Raw frontmatter record (normally a JSON object).
    pub metadata: serde_json::Value,
    /// Handle to the renderable body. Carried through untouched.
    pub body: B,
}

/// A validated post in one locale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDocument<B> {
    pub slug: String,
    pub locale: Locale,
    #[serde(flatten)]
    pub frontmatter: PostFrontmatter,
    /// Path the document was discovered at.
    pub source: PathBuf,
    pub body: B,
}

/// All documents of one locale, newest first, with a slug index.
#[derive(Debug, Clone, PartialEq)]
pub struct LocaleIndex<B> {
    posts: Vec<PostDocument<B>>,
    by_slug: BTreeMap<String, usize>,
}

impl<B> LocaleIndex<B> {
    fn new(mut posts: Vec<PostDocument<B>>) -> Self {
        posts.sort_by(newest_first);
        let by_slug = posts
            .iter()
            .enumerate()
            .map(|(i, post)| (post.slug.clone(), i))
            .collect();
        Self { posts, by_slug }
    }

    /// Documents in publish order, newest first. Drafts included.
    pub fn posts(&self) -> &[PostDocument<B>] {
        &self.posts
    }

    pub fn get(&self, slug: &str) -> Option<&PostDocument<B>> {
        self.by_slug.get(slug).map(|&i| &self.posts[i])
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.by_slug.contains_key(slug)
    }
}

/// The built, read-only post index.
///
/// There is no mutation API: a changed corpus means building a new manifest
/// and replacing the old one wholesale (see [`crate::store::ManifestStore`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest<B> {
    locales: [LocaleIndex<B>; Locale::COUNT],
}

impl<B> Manifest<B> {
    pub fn locale(&self, locale: Locale) -> &LocaleIndex<B> {
        &self.locales[locale.index()]
    }

    /// Documents of `locale`, newest first. Drafts included.
    pub fn posts(&self, locale: Locale) -> &[PostDocument<B>] {
        self.locale(locale).posts()
    }

    /// Every document of every locale, locale by locale.
    pub fn documents(&self) -> impl Iterator<Item = &PostDocument<B>> {
        self.locales.iter().flat_map(|index| index.posts.iter())
    }

    /// Number of distinct slugs (identical in every locale).
    pub fn len(&self) -> usize {
        self.locales[0].posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Serialized as `{ "en": [...], "fr": [...] }`.
impl<B: Serialize> Serialize for Manifest<B> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Locale::COUNT))?;
        for locale in Locale::ALL {
            map.serialize_entry(locale.as_str(), self.posts(locale))?;
        }
        map.end()
    }
}

/// Order by `published_at` descending, then `slug` ascending.
pub fn newest_first<B>(a: &PostDocument<B>, b: &PostDocument<B>) -> Ordering {
    b.frontmatter
        .published_at
        .cmp(&a.frontmatter.published_at)
        .then_with(|| a.slug.cmp(&b.slug))
}

/// Extract `(slug, locale)` from a `.../posts/<slug>/<locale>.<ext>` path.
pub fn parse_post_path(path: &Path) -> Result<(String, Locale), ManifestError> {
    let invalid = || ManifestError::InvalidPath(path.to_path_buf());

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(invalid)?;
    if !POST_EXTENSIONS.contains(&ext) {
        return Err(invalid());
    }

    let locale: Locale = path
        .file_stem()
        .and_then(|s| s.to_str())
        .and_then(|s| s.parse().ok())
        .ok_or_else(invalid)?;

    let slug_dir = path.parent().ok_or_else(invalid)?;
    let slug = slug_dir
        .file_name()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(invalid)?;

    let posts_dir = slug_dir
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|s| s.to_str());
    if posts_dir != Some(POSTS_DIR) {
        return Err(invalid());
    }

    Ok((slug.to_string(), locale))
}

/// Build a manifest from every discovered post file.
///
/// Fails on the first problem: a path outside the convention, invalid
/// frontmatter, a duplicate `(slug, locale)`, or a slug missing a locale.
/// When several slugs lack a variant, the alphabetically first is reported.
pub fn build_manifest<B, I>(inputs: I) -> Result<Manifest<B>, ManifestError>
where
    I: IntoIterator<Item = RawPost<B>>,
{
    let mut by_slug: BTreeMap<String, [Option<PostDocument<B>>; Locale::COUNT]> = BTreeMap::new();

    for raw in inputs {
        let (slug, locale) = parse_post_path(&raw.path)?;
        let frontmatter = frontmatter::validate(&slug, locale, &raw.metadata)?;

        let variants = by_slug
            .entry(slug.clone())
            .or_insert_with(|| std::array::from_fn(|_| None));
        let slot = &mut variants[locale.index()];
        if let Some(existing) = slot {
            return Err(ManifestError::DuplicateEntry {
                slug,
                locale,
                first: existing.source.clone(),
                second: raw.path,
            });
        }
        *slot = Some(PostDocument {
            slug,
            locale,
            frontmatter,
            source: raw.path,
            body: raw.body,
        });
    }

    let mut grouped: [Vec<PostDocument<B>>; Locale::COUNT] = std::array::from_fn(|_| Vec::new());
    for (slug, variants) in by_slug {
        for (locale, variant) in Locale::ALL.into_iter().zip(variants) {
            let doc = variant.ok_or_else(|| ManifestError::MissingLocale {
                slug: slug.clone(),
                locale,
            })?;
            grouped[locale.index()].push(doc);
        }
    }

    Ok(Manifest {
        locales: grouped.map(LocaleIndex::new),
    })
}
