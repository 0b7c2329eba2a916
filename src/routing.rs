//! Locale-aware URL helpers and legacy redirect resolution.
//!
//! Site URLs have the shape `/<locale>/posts/<slug>`. Before locales existed,
//! posts were addressed as `/?post=<slug>`; those links still resolve, as
//! long as the slug exists in the manifest.
//!
//! ```text
//! /                          → /<preferred>            (redirect)
//! /?post=joining-rockfi      → /<preferred>/posts/joining-rockfi
//! /fr                        → post list (fr)
//! /fr?post=joining-rockfi    → /fr/posts/joining-rockfi
//! /fr/posts/joining-rockfi   → post (fr)
//! /de/anything               → /en                     (redirect)
//! ```
//!
//! Resolution works on the path and query of a URL; scheme and host, when
//! present, are ignored.

use crate::locale::Locale;
use crate::manifest::Manifest;

/// Where a URL leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    PostList(Locale),
    Post { locale: Locale, slug: String },
    /// A well-formed post URL whose slug is not in the manifest.
    PostNotFound { locale: Locale, slug: String },
    Redirect(String),
}

/// `"fr"` selects French; anything else, including nothing, selects English.
pub fn normalize_locale(value: Option<&str>) -> Locale {
    match value {
        Some("fr") => Locale::Fr,
        _ => Locale::En,
    }
}

/// Rewrite `pathname` to live under `locale`, replacing an existing locale
/// segment or prefixing one.
pub fn with_locale(pathname: &str, locale: Locale) -> String {
    let mut segments: Vec<&str> = pathname.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return format!("/{locale}");
    }
    if segments[0].parse::<Locale>().is_ok() {
        segments[0] = locale.as_str();
        return format!("/{}", segments.join("/"));
    }
    format!("/{locale}/{}", segments.join("/"))
}

pub fn post_path(locale: Locale, slug: &str) -> String {
    format!("/{locale}/posts/{slug}")
}

/// Value of the first `post` query parameter, percent-decoded. Empty counts
/// as absent.
pub fn legacy_post_slug(url: &str) -> Option<String> {
    let (_, query) = split_url(url);
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "post")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Redirect target for a legacy `?post=<slug>` URL, if the slug exists.
pub fn resolve_legacy<B>(url: &str, locale: Locale, manifest: &Manifest<B>) -> Option<String> {
    legacy_post_slug(url)
        .filter(|slug| manifest.has_post_slug(slug))
        .map(|slug| post_path(locale, &slug))
}

/// Where `/` sends a visitor: the legacy target, else the locale home.
pub fn resolve_root<B>(url: &str, locale: Locale, manifest: &Manifest<B>) -> String {
    resolve_legacy(url, locale, manifest).unwrap_or_else(|| format!("/{locale}"))
}

/// Resolve any site URL. `preferred` is the visitor's language, used only
/// when the URL itself carries no locale.
pub fn resolve<B>(url: &str, preferred: Locale, manifest: &Manifest<B>) -> Route {
    let (path, _) = split_url(url);
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let Some(&first) = segments.first() else {
        return Route::Redirect(resolve_root(url, preferred, manifest));
    };
    let Ok(locale) = first.parse::<Locale>() else {
        return Route::Redirect(format!("/{}", normalize_locale(Some(first))));
    };

    if let Some(target) = resolve_legacy(url, locale, manifest) {
        return Route::Redirect(target);
    }

    match &segments[1..] {
        [] => Route::PostList(locale),
        ["posts", slug] if manifest.get_post(locale, slug).is_some() => Route::Post {
            locale,
            slug: slug.to_string(),
        },
        ["posts", slug] => Route::PostNotFound {
            locale,
            slug: slug.to_string(),
        },
        _ => Route::Redirect(format!("/{}", Locale::En)),
    }
}

/// Split a URL (absolute or path-only) into path and query. The fragment is
/// dropped.
fn split_url(url: &str) -> (&str, &str) {
    let url = url.split_once('#').map_or(url, |(before, _)| before);
    let (path, query) = url.split_once('?').unwrap_or((url, ""));
    let path = match path.split_once("://") {
        Some((_, rest)) => rest.find('/').map_or("/", |i| &rest[i..]),
        None => path,
    };
    (path, query)
}
