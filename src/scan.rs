//! Filesystem content discovery.
//!
//! Walks the content directory, reads every post source file, and splits off
//! its frontmatter block. The result is a list of [`RawPost`] records ready for
//! [`build_manifest`]; no validation happens here.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                              # Content root
//! ├── config.toml                       # Site configuration (optional)
//! └── posts/
//!     ├── joining-rockfi/               # One directory per slug
//!     │   ├── en.mdx                    # English variant
//!     │   └── fr.mdx                    # French variant
//!     └── postgresql-unique-nulls/
//!         ├── en.mdx
//!         └── fr.md                     # .md works too
//! ```
//!
//! Every `.md`/`.mdx` file anywhere under `posts/` is collected, including
//! misplaced ones, so the manifest builder can reject them by path instead of
//! them being skipped. Hidden files and directories are ignored.
//!
//! ## Frontmatter
//!
//! YAML between `---` fences or TOML between `+++` fences, at the very top of
//! the file:
//!
//! ```text
//! ---
//! title: Joining RockFi
//! publishedAt: 2026-01-26
//! tags: [career]
//! ---
//!
//! Body starts here.
//! ```
//!
//! A file without a fence yields an empty record. TOML date values are turned
//! into `YYYY-MM-DD` strings so both formats validate the same way.

use crate::manifest::{self, Manifest, ManifestError, POST_EXTENSIONS, POSTS_DIR, RawPost};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Posts directory not found: {0}")]
    MissingPostsDir(PathBuf),
    #[error("Unterminated frontmatter block in {0}")]
    UnterminatedFrontmatter(PathBuf),
    #[error("Invalid YAML frontmatter in {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("Invalid TOML frontmatter in {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// Handle to a post body on disk: the source file and the 1-based line the
/// body starts on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BodyRef {
    pub path: PathBuf,
    pub line: usize,
}

/// A frontmatter block found at the top of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterBlock<'a> {
    Yaml(&'a str),
    Toml(&'a str),
}

/// Source text split into its frontmatter block and body position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitSource<'a> {
    pub block: Option<FrontmatterBlock<'a>>,
    /// 1-based line the body starts on.
    pub body_line: usize,
}

/// Discover, read, and build in one go.
pub fn load_manifest(root: &Path) -> Result<Manifest<BodyRef>, ScanError> {
    Ok(manifest::build_manifest(scan(root)?)?)
}

/// Read every post source under `<root>/posts`, sorted by path.
pub fn scan(root: &Path) -> Result<Vec<RawPost<BodyRef>>, ScanError> {
    discover(root)?.iter().map(|path| read_post(path)).collect()
}

/// Paths of every post source file under `<root>/posts`, sorted.
pub fn discover(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let posts_dir = root.join(POSTS_DIR);
    if !posts_dir.is_dir() {
        return Err(ScanError::MissingPostsDir(posts_dir));
    }

    let mut paths = Vec::new();
    let walker = WalkDir::new(&posts_dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e.file_name().to_string_lossy().as_ref()));
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && is_post_file(entry.path()) {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}

/// True for a non-hidden file with a post source extension.
pub fn is_post_file(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .map(|n| is_hidden(&n.to_string_lossy()))
        .unwrap_or(true);
    let ext_ok = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| POST_EXTENSIONS.contains(&e));
    !hidden && ext_ok
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Read one source file into a [`RawPost`].
pub fn read_post(path: &Path) -> Result<RawPost<BodyRef>, ScanError> {
    let content = fs::read_to_string(path)?;
    let split = split_frontmatter(&content)
        .ok_or_else(|| ScanError::UnterminatedFrontmatter(path.to_path_buf()))?;

    let metadata = match split.block {
        None => Value::Null,
        Some(block) => parse_block(block, path)?,
    };

    Ok(RawPost {
        path: path.to_path_buf(),
        metadata,
        body: BodyRef {
            path: path.to_path_buf(),
            line: split.body_line,
        },
    })
}

/// Locate a leading `---` or `+++` block.
///
/// Returns `None` when an opening fence has no matching closing fence.
pub fn split_frontmatter(content: &str) -> Option<SplitSource<'_>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let no_block = SplitSource {
        block: None,
        body_line: 1,
    };

    let mut lines = content.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return Some(no_block);
    };
    let fence = first.trim_end();
    if fence != "---" && fence != "+++" {
        return Some(no_block);
    }

    let start = first.len();
    let mut end = start;
    // Line 1 is the opening fence, so the n-th line yielded here is line n + 2.
    for (i, line) in lines.enumerate() {
        if line.trim_end() == fence {
            let text = &content[start..end];
            let block = if fence == "+++" {
                FrontmatterBlock::Toml(text)
            } else {
                FrontmatterBlock::Yaml(text)
            };
            return Some(SplitSource {
                block: Some(block),
                body_line: i + 3,
            });
        }
        end += line.len();
    }
    None
}

fn parse_block(block: FrontmatterBlock<'_>, path: &Path) -> Result<Value, ScanError> {
    match block {
        FrontmatterBlock::Yaml(text) if text.trim().is_empty() => Ok(Value::Null),
        FrontmatterBlock::Yaml(text) => {
            serde_yaml::from_str(text).map_err(|source| ScanError::Yaml {
                path: path.to_path_buf(),
                source,
            })
        }
        FrontmatterBlock::Toml(text) => {
            let table: toml::Table = toml::from_str(text).map_err(|source| ScanError::Toml {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(toml_to_json(toml::Value::Table(table)))
        }
    }
}

/// Convert a TOML value to JSON. Datetimes become their TOML text form, so a
/// bare date is `YYYY-MM-DD`.
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}
