//! Turns a resident [`CanonicalSchema`] into downloadable files.
//!
//! Two formats:
//! - delimited text (`{name}_{YYYY-MM-DD}.csv`) for flat record collections;
//! - a structured JSON report (`insighttube_analysis_{YYYY-MM-DD}.json`) with
//!   keys in this fixed order: `video_info`, `topics`, `sentiment_data`,
//!   `sentiment_timeline`, `top_comments`, `keywords`, `analysis_timestamp`.
//!
//! Delimited cells use JSON quoting rather than RFC 4180: strings are JSON
//! string literals, numbers and booleans are bare, absent or null values are
//! `""`, and nested values are JSON-encoded then quoted.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use insighttube_common::{
    CanonicalSchema, CommentInsight, SentimentSegment, SentimentShare, TopicScore, VideoData,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub const CSV_CONTENT_TYPE: &str = "text/csv";
pub const JSON_CONTENT_TYPE: &str = "application/json";

pub const TOPICS_EXPORT_NAME: &str = "topics_analysis";
pub const COMMENTS_EXPORT_NAME: &str = "comments_analysis";
pub const REPORT_EXPORT_NAME: &str = "insighttube_analysis";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Export record {index} is not a flat object")]
    NotARecord { index: usize },

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A rendered export, ready to hand to the user's environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub contents: String,
}

impl ExportFile {
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.contents).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// `{logical_name}_{YYYY-MM-DD}.{extension}`
pub fn export_file_name(logical_name: &str, date: NaiveDate, extension: &str) -> String {
    format!("{logical_name}_{}.{extension}", date.format("%Y-%m-%d"))
}

// =============================================================================
// Delimited text
// =============================================================================

/// Render records as delimited text. The header is the first record's keys;
/// later records are projected onto exactly those keys.
///
/// Returns `Ok(None)` when there are no records.
pub fn to_delimited_text<T: Serialize>(records: &[T]) -> Result<Option<String>, ExportError> {
    let rows = records
        .iter()
        .enumerate()
        .map(|(index, record)| match serde_json::to_value(record)? {
            Value::Object(map) => Ok(map),
            _ => Err(ExportError::NotARecord { index }),
        })
        .collect::<Result<Vec<_>, ExportError>>()?;

    let Some(first) = rows.first() else {
        return Ok(None);
    };
    let headers: Vec<&String> = first.keys().collect();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        headers
            .iter()
            .map(|h| h.as_str())
            .collect::<Vec<_>>()
            .join(","),
    );
    for row in &rows {
        let cells: Vec<String> = headers
            .iter()
            .map(|header| render_cell(row.get(header.as_str())))
            .collect();
        lines.push(cells.join(","));
    }

    Ok(Some(lines.join("\n")))
}

fn render_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "\"\"".to_string(),
        Some(value @ (Value::String(_) | Value::Number(_) | Value::Bool(_))) => value.to_string(),
        Some(nested) => Value::String(nested.to_string()).to_string(),
    }
}

/// Delimited export of `records` named after `logical_name` and `date`.
/// `None` when there is nothing to export.
pub fn delimited_export<T: Serialize>(
    logical_name: &str,
    records: &[T],
    date: NaiveDate,
) -> Result<Option<ExportFile>, ExportError> {
    let Some(contents) = to_delimited_text(records)? else {
        tracing::debug!(logical_name, "No records to export, skipping");
        return Ok(None);
    };

    Ok(Some(ExportFile {
        file_name: export_file_name(logical_name, date, "csv"),
        content_type: CSV_CONTENT_TYPE,
        contents,
    }))
}

// =============================================================================
// Structured report
// =============================================================================

#[derive(Serialize)]
struct StructuredReport<'a> {
    video_info: &'a VideoData,
    topics: &'a [TopicScore],
    sentiment_data: &'a [SentimentShare],
    sentiment_timeline: &'a [SentimentSegment],
    top_comments: &'a [CommentInsight],
    keywords: &'a [String],
    analysis_timestamp: String,
}

/// Pretty-printed JSON report. `exported_at` is the moment of export, not of
/// analysis.
pub fn to_structured_report(
    schema: &CanonicalSchema,
    exported_at: DateTime<Utc>,
) -> Result<String, ExportError> {
    let report = StructuredReport {
        video_info: &schema.video_data,
        topics: &schema.topics,
        sentiment_data: &schema.sentiment_distribution,
        sentiment_timeline: &schema.sentiment_timeline,
        top_comments: &schema.top_comments,
        keywords: &schema.keywords,
        analysis_timestamp: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

pub fn structured_export(
    schema: &CanonicalSchema,
    exported_at: DateTime<Utc>,
) -> Result<ExportFile, ExportError> {
    Ok(ExportFile {
        file_name: export_file_name(REPORT_EXPORT_NAME, exported_at.date_naive(), "json"),
        content_type: JSON_CONTENT_TYPE,
        contents: to_structured_report(schema, exported_at)?,
    })
}

/// Topics CSV, comments CSV (each only when non-empty) and the full report.
pub fn export_bundle(
    schema: &CanonicalSchema,
    exported_at: DateTime<Utc>,
) -> Result<Vec<ExportFile>, ExportError> {
    let date = exported_at.date_naive();
    let mut files = Vec::with_capacity(3);

    files.extend(delimited_export(TOPICS_EXPORT_NAME, &schema.topics, date)?);
    files.extend(delimited_export(COMMENTS_EXPORT_NAME, &schema.top_comments, date)?);
    files.push(structured_export(schema, exported_at)?);

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::fallback_dataset;
    use crate::normalize::normalize;
    use chrono::TimeZone;
    use serde_json::json;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 15, 9, 26).unwrap()
    }

    #[test]
    fn empty_records_produce_nothing() {
        let records: Vec<Value> = vec![];
        assert_eq!(to_delimited_text(&records).unwrap(), None);

        let date = instant().date_naive();
        assert_eq!(delimited_export("topics", &records, date).unwrap(), None);
    }

    #[test]
    fn header_comes_from_first_record() {
        let records = vec![json!({ "a": 1, "b": 2 }), json!({ "a": 3 })];
        let text = to_delimited_text(&records).unwrap().unwrap();

        assert_eq!(text, "a,b\n1,2\n3,\"\"");
    }

    #[test]
    fn extra_keys_in_later_records_are_dropped() {
        let records = vec![json!({ "a": "x" }), json!({ "b": "y", "a": "z", "c": true })];
        let text = to_delimited_text(&records).unwrap().unwrap();

        assert_eq!(text, "a\n\"x\"\n\"z\"");
    }

    #[test]
    fn cells_are_json_quoted() {
        let records = vec![json!({
            "text": "hello, \"world\"\nbye",
            "zero": 0,
            "flag": false,
            "none": null,
            "list": [1, 2]
        })];
        let text = to_delimited_text(&records).unwrap().unwrap();
        let row = text.lines().nth(1).unwrap();

        assert_eq!(
            row,
            r#""hello, \"world\"\nbye",0,false,"","[1,2]""#
        );
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn non_object_records_are_rejected() {
        let err = to_delimited_text(&[1, 2]).unwrap_err();
        assert!(matches!(err, ExportError::NotARecord { index: 0 }));
    }

    #[test]
    fn topics_export_uses_schema_field_order() {
        let data = fallback_dataset();
        let file = delimited_export(TOPICS_EXPORT_NAME, &data.topics, instant().date_naive())
            .unwrap()
            .unwrap();

        assert_eq!(file.file_name, "topics_analysis_2026-03-14.csv");
        assert_eq!(file.content_type, CSV_CONTENT_TYPE);
        let mut lines = file.contents.lines();
        assert_eq!(lines.next(), Some("topic,relevance,mentions"));
        assert_eq!(lines.next(), Some("\"Technology\",85.0,120"));
    }

    #[test]
    fn comments_export_renders_sentiment_label() {
        let data = fallback_dataset();
        let text = to_delimited_text(&data.top_comments).unwrap().unwrap();
        let mut lines = text.lines();

        assert_eq!(lines.next(), Some("author,text,sentiment,sentiment_score,likes"));
        assert!(lines.next().unwrap().contains(",\"positive\",0.95,1250"));
    }

    #[test]
    fn report_has_stable_key_order_and_export_timestamp() {
        let data = fallback_dataset();
        let text = to_structured_report(&data, instant()).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();

        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "video_info",
                "topics",
                "sentiment_data",
                "sentiment_timeline",
                "top_comments",
                "keywords",
                "analysis_timestamp",
            ]
        );

        let stamp = value["analysis_timestamp"].as_str().unwrap();
        assert_eq!(stamp, "2026-03-14T15:09:26.000Z");
        assert!(DateTime::parse_from_rfc3339(stamp).is_ok());
        assert_eq!(value["video_info"]["processing_time"], 45.2);
    }

    #[test]
    fn report_timestamp_is_distinct_from_analyzed_data() {
        let data = normalize(&json!({ "video_info": { "upload_date": "2020-01-01" } })).unwrap();
        let file = structured_export(&data, instant()).unwrap();
        let value: Value = serde_json::from_str(&file.contents).unwrap();

        assert_eq!(file.file_name, "insighttube_analysis_2026-03-14.json");
        assert_eq!(file.content_type, JSON_CONTENT_TYPE);
        assert_ne!(value["analysis_timestamp"], value["video_info"]["upload_date"]);
    }

    #[test]
    fn bundle_skips_empty_collections() {
        let full = export_bundle(&fallback_dataset(), instant()).unwrap();
        let names: Vec<&str> = full.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "topics_analysis_2026-03-14.csv",
                "comments_analysis_2026-03-14.csv",
                "insighttube_analysis_2026-03-14.json",
            ]
        );

        let sparse = normalize(&json!({})).unwrap();
        let files = export_bundle(&sparse, instant()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].content_type, JSON_CONTENT_TYPE);
    }

    #[test]
    fn export_does_not_mutate_source() {
        let data = fallback_dataset();
        let before = data.clone();
        export_bundle(&data, instant()).unwrap();
        assert_eq!(data, before);
    }

    #[test]
    fn write_to_places_file_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = structured_export(&fallback_dataset(), instant()).unwrap();

        let path = file.write_to(dir.path()).unwrap();

        assert_eq!(path, dir.path().join("insighttube_analysis_2026-03-14.json"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), file.contents);
    }
}
