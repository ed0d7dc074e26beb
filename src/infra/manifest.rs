//! Content manifest ingestion: the compiler's JSON snapshot, typed and
//! validated once at startup.

use std::path::Path;

use serde::Deserialize;
use time::{
    Date, OffsetDateTime, Time, format_description::well_known::Rfc3339, macros::format_description,
};
use tracing::info;

use crate::domain::content::{Category, ContentItem, Locale};
use crate::domain::registry::ContentRegistry;
use crate::infra::error::InfraError;

const SOURCE: &str = "infra::manifest";

const DATE_ONLY: &[time::format_description::FormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// One record as written by the content compiler. Shape errors surface
/// here, at ingestion, rather than at render time.
#[derive(Debug, Deserialize)]
struct RawContentRecord {
    slug: String,
    lang: String,
    category: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    date: Option<String>,
    published: bool,
    #[serde(default)]
    body_html: String,
}

/// Read and validate the manifest at `path` into an immutable registry.
pub async fn load(path: &Path) -> Result<ContentRegistry, InfraError> {
    let bytes = tokio::fs::read(path).await.map_err(|err| {
        InfraError::manifest(format!(
            "failed to read manifest `{}`: {err}",
            path.display()
        ))
    })?;
    let registry = parse(&bytes)?;
    info!(
        target = SOURCE,
        path = %path.display(),
        items = registry.len(),
        "content manifest ingested"
    );
    Ok(registry)
}

/// Parse a manifest document, rejecting records that violate the content
/// model instead of carrying them into the registry.
pub fn parse(bytes: &[u8]) -> Result<ContentRegistry, InfraError> {
    let records: Vec<RawContentRecord> = serde_json::from_slice(bytes)
        .map_err(|err| InfraError::manifest(format!("failed to decode manifest: {err}")))?;

    let items = records
        .into_iter()
        .map(validate_record)
        .collect::<Result<Vec<_>, _>>()?;

    ContentRegistry::from_items(items).map_err(|err| InfraError::manifest(err.to_string()))
}

fn validate_record(record: RawContentRecord) -> Result<ContentItem, InfraError> {
    let context = |field: &str, detail: String| {
        InfraError::manifest(format!(
            "record `{}`: invalid {field}: {detail}",
            record.slug
        ))
    };

    let lang: Locale = record
        .lang
        .parse()
        .map_err(|err: crate::domain::error::DomainError| context("lang", err.to_string()))?;
    let category: Category = record
        .category
        .parse()
        .map_err(|err: crate::domain::error::DomainError| context("category", err.to_string()))?;

    let date = record
        .date
        .as_deref()
        .map(parse_date)
        .transpose()
        .map_err(|detail| context("date", detail))?;

    Ok(ContentItem {
        slug: record.slug,
        lang,
        category,
        title: record.title,
        description: record.description,
        date,
        published: record.published,
        body_html: record.body_html,
    })
}

/// Compiler output carries either a full RFC 3339 timestamp or a bare
/// calendar date; a bare date means midnight UTC.
fn parse_date(value: &str) -> Result<OffsetDateTime, String> {
    if let Ok(parsed) = OffsetDateTime::parse(value, &Rfc3339) {
        return Ok(parsed);
    }
    Date::parse(value, DATE_ONLY)
        .map(|date| date.with_time(Time::MIDNIGHT).assume_utc())
        .map_err(|err| format!("`{value}` is neither RFC 3339 nor YYYY-MM-DD: {err}"))
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn record(slug: &str, lang: &str, date: Option<&str>) -> serde_json::Value {
        serde_json::json!({
            "slug": slug,
            "lang": lang,
            "category": "blogs",
            "title": slug,
            "description": "",
            "date": date,
            "published": true,
            "body_html": "<p>body</p>",
        })
    }

    fn parse_records(records: Vec<serde_json::Value>) -> Result<ContentRegistry, InfraError> {
        let bytes = serde_json::to_vec(&records).unwrap();
        parse(&bytes)
    }

    #[test]
    fn well_formed_manifest_is_ingested() {
        let registry = parse_records(vec![
            record("hello-world", "en", Some("2024-03-01T10:30:00Z")),
            record("hello-world", "id", Some("2024-03-01")),
            record("undated", "en", None),
        ])
        .unwrap();

        assert_eq!(registry.len(), 3);
        let dated = registry
            .find_one(Category::Blogs, "hello-world", Locale::En)
            .unwrap();
        assert_eq!(dated.date, Some(datetime!(2024-03-01 10:30 UTC)));

        let midnight = registry
            .find_one(Category::Blogs, "hello-world", Locale::Id)
            .unwrap();
        assert_eq!(midnight.date, Some(datetime!(2024-03-01 0:00 UTC)));
    }

    #[test]
    fn unknown_locale_fails_ingestion() {
        let result = parse_records(vec![record("hello-world", "fr", None)]);
        assert!(result.is_err());
    }

    #[test]
    fn unparseable_date_fails_ingestion() {
        let result = parse_records(vec![record("hello-world", "en", Some("March 1st"))]);
        assert!(result.is_err());
    }

    #[test]
    fn duplicate_identity_fails_ingestion() {
        let result = parse_records(vec![
            record("twice", "en", None),
            record("twice", "en", None),
        ]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn load_reads_manifest_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        let bytes = serde_json::to_vec(&vec![record("hello-world", "en", None)]).unwrap();
        std::fs::write(&path, bytes).unwrap();

        let registry = load(&path).await.unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn load_surfaces_a_missing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let result = load(&dir.path().join("absent.json")).await;
        assert!(result.is_err());
    }

    #[test]
    fn missing_required_field_fails_decode() {
        let bytes = serde_json::to_vec(&vec![serde_json::json!({
            "slug": "incomplete",
            "lang": "en",
        })])
        .unwrap();
        assert!(parse(&bytes).is_err());
    }
}
