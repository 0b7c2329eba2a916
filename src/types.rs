//! Read-side projections returned by the query layer.
//!
//! These are what the presentation layer actually consumes: owned, serializable
//! snapshots that never expose a post's body handle.

use crate::locale::Locale;
use crate::manifest::PostDocument;
use chrono::NaiveDate;
use serde::Serialize;

/// Listing view of a post: its frontmatter minus the body and series fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub slug: String,
    pub locale: Locale,
    pub title: String,
    pub subtitle: String,
    pub summary: String,
    pub published_at: NaiveDate,
    pub read_time_minutes: u32,
    pub tags: Vec<String>,
}

impl<B> From<&PostDocument<B>> for PostSummary {
    fn from(doc: &PostDocument<B>) -> Self {
        let fm = &doc.frontmatter;
        Self {
            slug: doc.slug.clone(),
            locale: doc.locale,
            title: fm.title.clone(),
            subtitle: fm.subtitle.clone(),
            summary: fm.summary.clone(),
            published_at: fm.published_at,
            read_time_minutes: fm.read_time_minutes,
            tags: fm.tags.clone(),
        }
    }
}

/// Chronological neighbours of a post.
///
/// `previous` is the next-older post, `next` the next-newer one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdjacentPosts {
    pub previous: Option<PostSummary>,
    pub next: Option<PostSummary>,
}

/// A post flattened for client-side full-text filtering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchDocument {
    pub slug: String,
    pub locale: Locale,
    pub title: String,
    pub subtitle: String,
    pub summary: String,
    pub tags: Vec<String>,
    /// Lower-cased `title subtitle summary tags...`.
    pub searchable_text: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

/// Listing filter: free-text query, optional tag, and date order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostFilter {
    pub query: String,
    pub tag: Option<String>,
    pub order: SortOrder,
}
