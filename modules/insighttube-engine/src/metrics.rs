//! Derived figures computed from a canonical result.

use insighttube_common::{CommentInsight, VideoData};

/// Parse a display view count such as `"1.2M views"` or `"45,300 views"`.
///
/// `K`, `M` and `B` suffixes scale the number. `None` when no digits are present.
pub fn parse_view_count(display: &str) -> Option<f64> {
    let trimmed = display.trim();
    let end = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == ','))
        .unwrap_or(trimmed.len());
    let base: f64 = trimmed[..end].replace(',', "").parse().ok()?;

    let scale = match trimmed[end..].trim_start().chars().next() {
        Some('k' | 'K') => 1e3,
        Some('m' | 'M') => 1e6,
        Some('b' | 'B') => 1e9,
        _ => 1.0,
    };

    Some(base * scale)
}

/// (likes + comments) / views, as a percentage.
pub fn engagement_rate(video: &VideoData) -> Option<f64> {
    let views = parse_view_count(&video.views)?;
    if views <= 0.0 {
        return None;
    }
    Some((video.likes as f64 + video.comments as f64) / views * 100.0)
}

pub fn average_sentiment_score(comments: &[CommentInsight]) -> Option<f64> {
    if comments.is_empty() {
        return None;
    }
    let total: f64 = comments.iter().map(|c| c.sentiment_score).sum();
    Some(total / comments.len() as f64)
}

/// Keywords paired with a positional weight: the first of `n` keywords weighs
/// `n`, the last weighs 1. At most `limit` entries.
pub fn ranked_keywords(keywords: &[String], limit: usize) -> Vec<(&str, usize)> {
    keywords
        .iter()
        .take(limit)
        .enumerate()
        .map(|(index, keyword)| (keyword.as_str(), keywords.len() - index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::fallback_dataset;

    #[test]
    fn parses_suffixed_view_counts() {
        assert!((parse_view_count("1.2M views").unwrap() - 1_200_000.0).abs() < 1e-3);
        assert_eq!(parse_view_count("45K views"), Some(45_000.0));
        assert_eq!(parse_view_count("3B views"), Some(3_000_000_000.0));
        assert_eq!(parse_view_count("1,234 views"), Some(1234.0));
        assert_eq!(parse_view_count("no views yet"), None);
    }

    #[test]
    fn engagement_for_fallback_video() {
        let video = fallback_dataset().video_data;
        let rate = engagement_rate(&video).unwrap();
        // (45000 + 8500) / 1.2M
        assert!((rate - 4.458333).abs() < 1e-4);
    }

    #[test]
    fn engagement_unknown_without_views() {
        let mut video = fallback_dataset().video_data;
        video.views = "0 views".to_string();
        assert_eq!(engagement_rate(&video), None);
    }

    #[test]
    fn engagement_with_extreme_counts_does_not_overflow() {
        let data = crate::normalize::normalize(&serde_json::json!({
            "video_info": { "views": "10 views", "likes": u64::MAX, "comments": 1 }
        }))
        .unwrap();
        assert_eq!(data.video_data.likes, u64::MAX);

        let rate = engagement_rate(&data.video_data).unwrap();
        assert!(rate.is_finite());
        assert!(rate > 1e18);
    }

    #[test]
    fn average_sentiment() {
        let comments = fallback_dataset().top_comments;
        let avg = average_sentiment_score(&comments).unwrap();
        assert!((avg - (0.95 + 0.15 - 0.75) / 3.0).abs() < 1e-9);
        assert_eq!(average_sentiment_score(&[]), None);
    }

    #[test]
    fn keyword_weights_follow_position() {
        let keywords: Vec<String> = ["a", "b", "c"].into_iter().map(String::from).collect();
        assert_eq!(ranked_keywords(&keywords, 2), vec![("a", 3), ("b", 2)]);
        assert!(ranked_keywords(&[], 10).is_empty());
    }
}
