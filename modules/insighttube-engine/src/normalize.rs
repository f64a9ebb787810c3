//! Shapes the analysis service's untyped payload into a [`CanonicalSchema`].
//!
//! The payload has no enforced schema, so every field is looked up with an
//! explicit presence and type check. Anything absent, empty, or of the wrong
//! leaf type is replaced with its default:
//!
//! | field | default |
//! |---|---|
//! | `title` | `"Unknown Title"` |
//! | `channel` | `"Unknown Channel"` |
//! | `views` | `"0 views"` |
//! | `upload_date` | `"Unknown date"` |
//! | `duration` | `"0:00"` |
//! | comment `author` | `"Unknown"` |
//! | comment `sentiment` | `neutral` |
//! | sentiment `color` | `"#000000"` |
//! | other strings | `""` |
//! | numbers | `0` |
//! | collections | empty |
//!
//! A missing nested object behaves as if all of its fields were missing, and a
//! malformed collection element only loses its own fields.

use insighttube_common::{
    CanonicalSchema, CommentInsight, Sentiment, SentimentSegment, SentimentShare, TopicScore,
    VideoData,
};
use serde_json::{Map, Value};
use thiserror::Error;

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_CHANNEL: &str = "Unknown Channel";
pub const UNKNOWN_AUTHOR: &str = "Unknown";
pub const DEFAULT_VIEWS: &str = "0 views";
pub const DEFAULT_UPLOAD_DATE: &str = "Unknown date";
pub const DEFAULT_DURATION: &str = "0:00";
pub const DEFAULT_COLOR: &str = "#000000";

type Object = Map<String, Value>;

/// The payload could not be traversed at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to process analysis results: {cause}")]
pub struct NormalizationError {
    pub cause: String,
}

/// Map a raw payload onto the canonical schema.
///
/// Only fails when the top level is not a JSON object. Never returns a
/// partially populated result.
pub fn normalize(raw: &Value) -> Result<CanonicalSchema, NormalizationError> {
    let root = raw.as_object().ok_or_else(|| NormalizationError {
        cause: format!("expected a JSON object, got {}", kind(raw)),
    })?;

    let video = object(Some(root), "video_info");

    let video_data = VideoData {
        title: text(video, "title", UNKNOWN_TITLE),
        channel: text(video, "channel", UNKNOWN_CHANNEL),
        views: text(video, "views", DEFAULT_VIEWS),
        upload_date: text(video, "upload_date", DEFAULT_UPLOAD_DATE),
        duration: text(video, "duration", DEFAULT_DURATION),
        likes: count(video, "likes"),
        dislikes: count(video, "dislikes"),
        comments: count(video, "comments"),
        processing_time_seconds: number(Some(root), "processing_time").max(0.0),
    };

    let topics = collection(root, "topics", |item| TopicScore {
        topic: text(item, "topic", ""),
        relevance: number(item, "relevance").clamp(0.0, 100.0),
        mentions: count(item, "mentions"),
    });

    let sentiment_distribution = collection(root, "sentiment_distribution", |item| SentimentShare {
        name: text(item, "name", ""),
        value: number(item, "value").clamp(0.0, 100.0),
        color: text(item, "color", DEFAULT_COLOR),
    });

    let sentiment_timeline = collection(root, "sentiment_over_time", |item| SentimentSegment {
        time: text(item, "time", ""),
        positive: number(item, "positive"),
        negative: number(item, "negative"),
        neutral: number(item, "neutral"),
    });

    let top_comments = collection(root, "top_comments", |item| CommentInsight {
        author: text(item, "author", UNKNOWN_AUTHOR),
        text: text(item, "text", ""),
        sentiment: item
            .and_then(|m| m.get("sentiment"))
            .and_then(Value::as_str)
            .and_then(Sentiment::parse)
            .unwrap_or_default(),
        sentiment_score: number(item, "sentiment_score").clamp(-1.0, 1.0),
        likes: count(item, "likes"),
    });

    let keywords = object(Some(root), "comment_analysis")
        .and_then(|analysis| analysis.get("top_keywords"))
        .and_then(Value::as_array)
        .map(|words| {
            words
                .iter()
                .filter_map(Value::as_str)
                .filter(|word| !word.trim().is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(CanonicalSchema {
        video_data,
        topics,
        sentiment_distribution,
        sentiment_timeline,
        top_comments,
        keywords,
    })
}

// =============================================================================
// Field accessors
// =============================================================================

fn object<'a>(parent: Option<&'a Object>, key: &str) -> Option<&'a Object> {
    parent.and_then(|m| m.get(key)).and_then(Value::as_object)
}

fn text(parent: Option<&Object>, key: &str, default: &str) -> String {
    parent
        .and_then(|m| m.get(key))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
        .to_string()
}

/// Finite float from a JSON number or a numeric string; 0.0 otherwise.
fn number(parent: Option<&Object>, key: &str) -> f64 {
    let value = match parent.and_then(|m| m.get(key)) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Non-negative integer. Fractions truncate, negatives become 0.
fn count(parent: Option<&Object>, key: &str) -> u64 {
    if let Some(n) = parent.and_then(|m| m.get(key)).and_then(Value::as_u64) {
        return n;
    }
    let n = number(parent, key);
    if n > 0.0 {
        n.trunc() as u64
    } else {
        0
    }
}

fn collection<T>(root: &Object, key: &str, map: impl Fn(Option<&Object>) -> T) -> Vec<T> {
    root.get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().map(|item| map(item.as_object())).collect())
        .unwrap_or_default()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
