//! Frontmatter validation.
//!
//! Every post file carries a metadata record (the frontmatter) that is
//! validated on its own, before the post is paired with its other locale.
//! Validation is a pure function: a raw record goes in, a typed
//! [`PostFrontmatter`] or a [`FrontmatterError`] comes out. Nothing is logged,
//! nothing is retried, and the first violation wins.
//!
//! ## Schema
//!
//! ```yaml
//! title: Joining RockFi          # required, non-empty after trimming
//! subtitle: A new chapter        # required, non-empty after trimming
//! summary: Why I moved teams.    # required, non-empty after trimming
//! publishedAt: 2026-01-26        # required, YYYY-MM-DD, real calendar date
//! updatedAt: 2026-02-01          # optional, same format, never before publishedAt
//! readTimeMinutes: 5             # required, positive integer
//! tags: [career, fintech]        # required, at least one non-empty string
//! seriesId: rockfi               # optional, non-empty
//! seriesOrder: 1                 # optional, positive integer
//! draft: false                   # optional, defaults to false
//! ```
//!
//! Unknown keys are ignored.
//!
//! ## Check Order
//!
//! 1. Shape: required keys present, every present key has the right kind
//! 2. Strings are non-empty after trimming (values are stored trimmed)
//! 3. Dates match `YYYY-MM-DD` *and* name a real day (`2026-13-42` fails)
//! 4. `tags` holds at least one entry, each non-empty after trimming
//! 5. `readTimeMinutes` and `seriesOrder` are positive integers
//!
//! The `updatedAt >= publishedAt` rule runs last and reports its own
//! [`FrontmatterError::DateOrder`] kind.

use crate::locale::Locale;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrontmatterError {
    #[error("Invalid frontmatter for {slug}/{locale}: {field} {reason}")]
    Invalid {
        slug: String,
        locale: Locale,
        field: String,
        reason: String,
    },
    #[error(
        "updatedAt ({updated_at}) cannot be before publishedAt ({published_at}) for {slug}/{locale}"
    )]
    DateOrder {
        slug: String,
        locale: Locale,
        published_at: NaiveDate,
        updated_at: NaiveDate,
    },
}

/// Validated metadata for one locale variant of a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostFrontmatter {
    pub title: String,
    pub subtitle: String,
    pub summary: String,
    pub published_at: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDate>,
    pub read_time_minutes: u32,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_order: Option<u32>,
    #[serde(default)]
    pub draft: bool,
}

impl PostFrontmatter {
    /// The date a post last changed: `updated_at` when set, else `published_at`.
    pub fn last_modified(&self) -> NaiveDate {
        self.updated_at.unwrap_or(self.published_at)
    }
}

/// Parse a strict `YYYY-MM-DD` calendar date.
///
/// The shape is checked byte by byte (four-digit year, two-digit month and
/// day) and the date is then actually constructed, so `2026-02-30` and
/// `2026-13-42` are rejected even though they look right.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !digits_ok {
        return None;
    }
    let year = value[0..4].parse().ok()?;
    let month = value[5..7].parse().ok()?;
    let day = value[8..10].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Validate the raw frontmatter record of `slug` in `locale`.
///
/// `raw` is usually a JSON object; `null` is treated as an empty record so a
/// file without frontmatter reports its first missing field.
pub fn validate(
    slug: &str,
    locale: Locale,
    raw: &Value,
) -> Result<PostFrontmatter, FrontmatterError> {
    let check = Checker { slug, locale };
    let empty = Map::new();
    let record = match raw {
        Value::Object(map) => map,
        Value::Null => &empty,
        other => {
            return Err(check.invalid(
                "frontmatter",
                format!("must be a mapping, found {}", kind(other)),
            ));
        }
    };

    // 1. shape
    let title = check.required_str(record, "title")?;
    let subtitle = check.required_str(record, "subtitle")?;
    let summary = check.required_str(record, "summary")?;
    let published_at = check.required_str(record, "publishedAt")?;
    let updated_at = check.optional_str(record, "updatedAt")?;
    let read_time_minutes = check.required_number(record, "readTimeMinutes")?;
    let tags = check.required_str_list(record, "tags")?;
    let series_id = check.optional_str(record, "seriesId")?;
    let series_order = check.optional_number(record, "seriesOrder")?;
    let draft = check.optional_bool(record, "draft")?.unwrap_or(false);

    // 2. non-empty strings
    let title = check.non_empty("title", title)?;
    let subtitle = check.non_empty("subtitle", subtitle)?;
    let summary = check.non_empty("summary", summary)?;
    let series_id = series_id
        .map(|id| check.non_empty("seriesId", id))
        .transpose()?;

    // 3. dates
    let published_at = check.date("publishedAt", published_at)?;
    let updated_at = updated_at
        .map(|date| check.date("updatedAt", date))
        .transpose()?;

    // 4. tags
    if tags.is_empty() {
        return Err(check.invalid("tags", "must contain at least one tag"));
    }
    let tags = tags
        .iter()
        .enumerate()
        .map(|(i, tag)| check.non_empty(&format!("tags[{i}]"), tag))
        .collect::<Result<Vec<_>, _>>()?;

    // 5. positive integers
    let read_time_minutes = check.positive_int("readTimeMinutes", read_time_minutes)?;
    let series_order = series_order
        .map(|n| check.positive_int("seriesOrder", n))
        .transpose()?;

    if let Some(updated) = updated_at
        && updated < published_at
    {
        return Err(FrontmatterError::DateOrder {
            slug: slug.to_string(),
            locale,
            published_at,
            updated_at: updated,
        });
    }

    Ok(PostFrontmatter {
        title,
        subtitle,
        summary,
        published_at,
        updated_at,
        read_time_minutes,
        tags,
        series_id,
        series_order,
        draft,
    })
}

struct Checker<'a> {
    slug: &'a str,
    locale: Locale,
}

impl Checker<'_> {
    fn invalid(&self, field: &str, reason: impl Into<String>) -> FrontmatterError {
        FrontmatterError::Invalid {
            slug: self.slug.to_string(),
            locale: self.locale,
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    fn required<'v>(
        &self,
        record: &'v Map<String, Value>,
        field: &str,
    ) -> Result<&'v Value, FrontmatterError> {
        record
            .get(field)
            .ok_or_else(|| self.invalid(field, "is required"))
    }

    fn expect_str<'v>(&self, field: &str, value: &'v Value) -> Result<&'v str, FrontmatterError> {
        value.as_str().ok_or_else(|| {
            self.invalid(field, format!("must be a string, found {}", kind(value)))
        })
    }

    fn required_str<'v>(
        &self,
        record: &'v Map<String, Value>,
        field: &str,
    ) -> Result<&'v str, FrontmatterError> {
        self.expect_str(field, self.required(record, field)?)
    }

    fn optional_str<'v>(
        &self,
        record: &'v Map<String, Value>,
        field: &str,
    ) -> Result<Option<&'v str>, FrontmatterError> {
        record
            .get(field)
            .map(|value| self.expect_str(field, value))
            .transpose()
    }

    fn expect_number<'v>(
        &self,
        field: &str,
        value: &'v Value,
    ) -> Result<&'v Number, FrontmatterError> {
        match value {
            Value::Number(n) => Ok(n),
            other => Err(self.invalid(
                field,
                format!("must be a number, found {}", kind(other)),
            )),
        }
    }

    fn required_number<'v>(
        &self,
        record: &'v Map<String, Value>,
        field: &str,
    ) -> Result<&'v Number, FrontmatterError> {
        self.expect_number(field, self.required(record, field)?)
    }

    fn optional_number<'v>(
        &self,
        record: &'v Map<String, Value>,
        field: &str,
    ) -> Result<Option<&'v Number>, FrontmatterError> {
        record
            .get(field)
            .map(|value| self.expect_number(field, value))
            .transpose()
    }

    fn optional_bool(
        &self,
        record: &Map<String, Value>,
        field: &str,
    ) -> Result<Option<bool>, FrontmatterError> {
        match record.get(field) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(self.invalid(
                field,
                format!("must be a boolean, found {}", kind(other)),
            )),
        }
    }

    fn required_str_list<'v>(
        &self,
        record: &'v Map<String, Value>,
        field: &str,
    ) -> Result<Vec<&'v str>, FrontmatterError> {
        let Value::Array(items) = self.required(record, field)? else {
            let value = &record[field];
            return Err(self.invalid(field, format!("must be a list, found {}", kind(value))));
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| self.expect_str(&format!("{field}[{i}]"), item))
            .collect()
    }

    fn non_empty(&self, field: &str, value: &str) -> Result<String, FrontmatterError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(self.invalid(field, "must not be empty"));
        }
        Ok(trimmed.to_string())
    }

    fn date(&self, field: &str, value: &str) -> Result<NaiveDate, FrontmatterError> {
        parse_iso_date(value).ok_or_else(|| {
            self.invalid(
                field,
                format!("must be a real calendar date in YYYY-MM-DD form, found '{value}'"),
            )
        })
    }

    fn positive_int(&self, field: &str, n: &Number) -> Result<u32, FrontmatterError> {
        n.as_f64()
            .filter(|v| v.fract() == 0.0 && *v >= 1.0 && *v <= f64::from(u32::MAX))
            .map(|v| v as u32)
            .ok_or_else(|| self.invalid(field, format!("must be a positive integer, found {n}")))
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::valid_meta;
    use serde_json::json;

    fn run(raw: &Value) -> Result<PostFrontmatter, FrontmatterError> {
        validate("example", Locale::En, raw)
    }

    fn invalid_field(raw: &Value) -> String {
        match run(raw) {
            Err(FrontmatterError::Invalid { field, .. }) => field,
            other => panic!("expected an invalid-field error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_valid_frontmatter() {
        let fm = run(&valid_meta()).unwrap();
        assert_eq!(fm.title, "Valid title");
        assert_eq!(fm.published_at, NaiveDate::from_ymd_opt(2026, 1, 26).unwrap());
        assert_eq!(fm.read_time_minutes, 5);
        assert_eq!(fm.tags, vec!["nodejs", "backend"]);
        assert!(!fm.draft);
        assert_eq!(fm.updated_at, None);
    }

    #[test]
    fn strings_are_stored_trimmed() {
        let mut meta = valid_meta();
        meta["title"] = json!("  Padded  ");
        meta["tags"] = json!([" rust "]);
        let fm = run(&meta).unwrap();
        assert_eq!(fm.title, "Padded");
        assert_eq!(fm.tags, vec!["rust"]);
    }

    #[test]
    fn optional_fields_are_read() {
        let mut meta = valid_meta();
        meta["updatedAt"] = json!("2026-02-01");
        meta["seriesId"] = json!("queues");
        meta["seriesOrder"] = json!(2);
        meta["draft"] = json!(true);
        let fm = run(&meta).unwrap();
        assert_eq!(fm.updated_at, NaiveDate::from_ymd_opt(2026, 2, 1));
        assert_eq!(fm.series_id.as_deref(), Some("queues"));
        assert_eq!(fm.series_order, Some(2));
        assert!(fm.draft);
        assert_eq!(fm.last_modified(), NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut meta = valid_meta();
        meta["heroImage"] = json!("cover.png");
        assert!(run(&meta).is_ok());
    }

    #[test]
    fn missing_required_field_is_named() {
        let mut meta = valid_meta();
        meta.as_object_mut().unwrap().remove("summary");
        let err = run(&meta).unwrap_err();
        assert_eq!(
            err,
            FrontmatterError::Invalid {
                slug: "example".into(),
                locale: Locale::En,
                field: "summary".into(),
                reason: "is required".into(),
            }
        );
    }

    #[test]
    fn null_record_reports_first_missing_field() {
        assert_eq!(invalid_field(&Value::Null), "title");
    }

    #[test]
    fn non_mapping_record_is_rejected() {
        assert_eq!(invalid_field(&json!(["title"])), "frontmatter");
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let mut meta = valid_meta();
        meta["readTimeMinutes"] = json!("5");
        assert_eq!(invalid_field(&meta), "readTimeMinutes");

        let mut meta = valid_meta();
        meta["draft"] = json!("yes");
        assert_eq!(invalid_field(&meta), "draft");

        let mut meta = valid_meta();
        meta["tags"] = json!("nodejs");
        assert_eq!(invalid_field(&meta), "tags");

        let mut meta = valid_meta();
        meta["tags"] = json!(["ok", 3]);
        assert_eq!(invalid_field(&meta), "tags[1]");
    }

    #[test]
    fn shape_errors_are_reported_before_content_errors() {
        let mut meta = valid_meta();
        meta["title"] = json!("   ");
        meta["draft"] = json!(1);
        assert_eq!(invalid_field(&meta), "draft");
    }

    #[test]
    fn blank_strings_are_rejected() {
        let mut meta = valid_meta();
        meta["subtitle"] = json!("   ");
        assert_eq!(invalid_field(&meta), "subtitle");

        let mut meta = valid_meta();
        meta["seriesId"] = json!("");
        assert_eq!(invalid_field(&meta), "seriesId");
    }

    #[test]
    fn impossible_calendar_date_is_rejected() {
        let mut meta = valid_meta();
        meta["publishedAt"] = json!("2026-13-42");
        assert_eq!(invalid_field(&meta), "publishedAt");

        let mut meta = valid_meta();
        meta["publishedAt"] = json!("2026-02-30");
        assert_eq!(invalid_field(&meta), "publishedAt");
    }

    #[test]
    fn loosely_shaped_date_is_rejected() {
        for bad in ["2026-1-05", "26-01-05", "2026/01/05", "2026-01-05T00:00:00Z", ""] {
            let mut meta = valid_meta();
            meta["updatedAt"] = json!(bad);
            assert_eq!(invalid_field(&meta), "updatedAt", "accepted {bad:?}");
        }
    }

    #[test]
    fn leap_day_is_accepted_only_in_leap_years() {
        assert!(parse_iso_date("2024-02-29").is_some());
        assert!(parse_iso_date("2026-02-29").is_none());
    }

    #[test]
    fn empty_or_blank_tags_are_rejected() {
        let mut meta = valid_meta();
        meta["tags"] = json!([]);
        assert_eq!(invalid_field(&meta), "tags");

        let mut meta = valid_meta();
        meta["tags"] = json!(["rust", " "]);
        assert_eq!(invalid_field(&meta), "tags[1]");
    }

    #[test]
    fn non_positive_or_fractional_numbers_are_rejected() {
        for bad in [json!(0), json!(-3), json!(2.5)] {
            let mut meta = valid_meta();
            meta["readTimeMinutes"] = bad.clone();
            assert_eq!(invalid_field(&meta), "readTimeMinutes", "accepted {bad}");
        }

        let mut meta = valid_meta();
        meta["seriesOrder"] = json!(0);
        assert_eq!(invalid_field(&meta), "seriesOrder");
    }

    #[test]
    fn whole_float_counts_as_integer() {
        let mut meta = valid_meta();
        meta["readTimeMinutes"] = json!(7.0);
        assert_eq!(run(&meta).unwrap().read_time_minutes, 7);
    }

    #[test]
    fn updated_before_published_is_date_order_error() {
        let mut meta = valid_meta();
        meta["publishedAt"] = json!("2026-02-01");
        meta["updatedAt"] = json!("2026-01-01");
        let err = run(&meta).unwrap_err();
        assert!(matches!(err, FrontmatterError::DateOrder { .. }));
        assert!(err.to_string().contains("example/en"));
    }

    #[test]
    fn updated_on_publish_day_is_allowed() {
        let mut meta = valid_meta();
        meta["updatedAt"] = meta["publishedAt"].clone();
        assert!(run(&meta).is_ok());
    }

    #[test]
    fn error_message_names_slug_locale_and_field() {
        let mut meta = valid_meta();
        meta.as_object_mut().unwrap().remove("title");
        let err = validate("queues", Locale::Fr, &meta).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid frontmatter for queues/fr: title is required"
        );
    }

    #[test]
    fn frontmatter_serializes_with_camel_case_keys() {
        let fm = run(&valid_meta()).unwrap();
        let value = serde_json::to_value(&fm).unwrap();
        assert_eq!(value["publishedAt"], "2026-01-26");
        assert_eq!(value["readTimeMinutes"], 5);
        assert!(value.get("updatedAt").is_none());
    }
}
