//! Read-only queries over a built [`Manifest`].
//!
//! Everything here is a pure read. "Not found" is `None` or an empty list,
//! never an error. Listing queries skip drafts; [`Manifest::get_post`] does
//! not, so a draft stays reachable by direct URL.

use crate::locale::Locale;
use crate::manifest::{Manifest, PostDocument};
use crate::types::{AdjacentPosts, PostFilter, PostSummary, SearchDocument, SortOrder};
use std::collections::BTreeSet;

/// Default number of related posts shown under an article.
pub const DEFAULT_RELATED_LIMIT: usize = 3;

impl<B> Manifest<B> {
    /// Non-draft documents of `locale`, newest first.
    pub(crate) fn published(&self, locale: Locale) -> impl Iterator<Item = &PostDocument<B>> {
        self.posts(locale).iter().filter(|p| !p.frontmatter.draft)
    }

    /// Look up a post by slug, drafts included.
    pub fn get_post(&self, locale: Locale, slug: &str) -> Option<&PostDocument<B>> {
        self.locale(locale).get(slug)
    }

    /// True if `slug` exists in any locale. Used to validate legacy `?post=` links.
    pub fn has_post_slug(&self, slug: &str) -> bool {
        Locale::ALL
            .into_iter()
            .any(|locale| self.locale(locale).contains(slug))
    }

    /// Locales in which `slug` exists, in canonical order.
    pub fn post_locales(&self, slug: &str) -> Vec<Locale> {
        Locale::ALL
            .into_iter()
            .filter(|&locale| self.locale(locale).contains(slug))
            .collect()
    }

    /// Non-draft summaries of `locale`, newest first.
    pub fn post_summaries(&self, locale: Locale) -> Vec<PostSummary> {
        self.published(locale).map(PostSummary::from).collect()
    }

    /// Distinct tags of non-draft posts, sorted by code point.
    pub fn available_tags(&self, locale: Locale) -> Vec<String> {
        self.published(locale)
            .flat_map(|p| p.frontmatter.tags.iter())
            .map(String::as_str)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Posts sharing tags with `slug`, best match first.
    ///
    /// Score is the number of distinct shared tags; zero-score posts and the
    /// post itself are excluded. Equal scores are ordered newest first, then
    /// by slug.
    pub fn related_posts(&self, locale: Locale, slug: &str, limit: usize) -> Vec<PostSummary> {
        let Some(current) = self.get_post(locale, slug) else {
            return Vec::new();
        };
        let source_tags: BTreeSet<&str> = current.frontmatter.tags.iter().map(String::as_str).collect();

        let mut scored: Vec<(usize, &PostDocument<B>)> = self
            .published(locale)
            .filter(|p| p.slug != slug)
            .map(|p| {
                let tags: BTreeSet<&str> = p.frontmatter.tags.iter().map(String::as_str).collect();
                (tags.intersection(&source_tags).count(), p)
            })
            .filter(|(score, _)| *score > 0)
            .collect();

        scored.sort_by(|(score_a, a), (score_b, b)| {
            score_b
                .cmp(score_a)
                .then_with(|| b.frontmatter.published_at.cmp(&a.frontmatter.published_at))
        });

        scored
            .into_iter()
            .take(limit)
            .map(|(_, p)| PostSummary::from(p))
            .collect()
    }

    /// Chronological neighbours of `slug` among non-draft posts.
    ///
    /// `previous` is older, `next` is newer. Both are `None` when `slug` is
    /// a draft or unknown.
    pub fn adjacent_posts(&self, locale: Locale, slug: &str) -> AdjacentPosts {
        let posts: Vec<&PostDocument<B>> = self.published(locale).collect();
        let Some(i) = posts.iter().position(|p| p.slug == slug) else {
            return AdjacentPosts::default();
        };

        AdjacentPosts {
            previous: posts.get(i + 1).map(|p| PostSummary::from(*p)),
            next: i
                .checked_sub(1)
                .and_then(|j| posts.get(j))
                .map(|p| PostSummary::from(*p)),
        }
    }

    /// Non-draft posts flattened for text search.
    pub fn search_documents(&self, locale: Locale) -> Vec<SearchDocument> {
        self.published(locale)
            .map(|p| {
                let fm = &p.frontmatter;
                SearchDocument {
                    slug: p.slug.clone(),
                    locale: p.locale,
                    title: fm.title.clone(),
                    subtitle: fm.subtitle.clone(),
                    summary: fm.summary.clone(),
                    tags: fm.tags.clone(),
                    searchable_text: searchable_text(p),
                }
            })
            .collect()
    }

    /// Non-draft summaries matching a text query and optional tag.
    ///
    /// The query is trimmed and matched case-insensitively as a substring of
    /// the post's title, subtitle, summary and tags. A blank query matches
    /// everything.
    pub fn search(&self, locale: Locale, filter: &PostFilter) -> Vec<PostSummary> {
        let needle = filter.query.trim().to_lowercase();
        let mut hits: Vec<PostSummary> = self
            .published(locale)
            .filter(|p| needle.is_empty() || searchable_text(p).contains(&needle))
            .filter(|p| match &filter.tag {
                Some(tag) => p.frontmatter.tags.contains(tag),
                None => true,
            })
            .map(PostSummary::from)
            .collect();

        if filter.order == SortOrder::Oldest {
            hits.sort_by(|a, b| a.published_at.cmp(&b.published_at));
        }
        hits
    }

    /// Non-draft posts of a series, in reading order.
    ///
    /// Ordered by `series_order` (unnumbered entries last), then oldest first.
    pub fn series(&self, locale: Locale, series_id: &str) -> Vec<PostSummary> {
        let mut members: Vec<&PostDocument<B>> = self
            .published(locale)
            .filter(|p| p.frontmatter.series_id.as_deref() == Some(series_id))
            .collect();
        members.sort_by_key(|p| {
            let fm = &p.frontmatter;
            (fm.series_order.is_none(), fm.series_order, fm.published_at)
        });
        members.into_iter().map(PostSummary::from).collect()
    }
}

fn searchable_text<B>(post: &PostDocument<B>) -> String {
    let fm = &post.frontmatter;
    format!(
        "{} {} {} {}",
        fm.title,
        fm.subtitle,
        fm.summary,
        fm.tags.join(" ")
    )
    .to_lowercase()
}
