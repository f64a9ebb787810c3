use serde::{Deserialize, Serialize};

// --- Request ---

/// A request to analyze one video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub video_url: String,
    pub include_comments: bool,
    pub include_sentiment: bool,
    pub include_topics: bool,
    pub include_keywords: bool,
}

impl AnalysisRequest {
    /// Request every section of the analysis.
    pub fn new(video_url: impl Into<String>) -> Self {
        Self {
            video_url: video_url.into(),
            include_comments: true,
            include_sentiment: true,
            include_topics: true,
            include_keywords: true,
        }
    }
}

// --- Canonical schema ---

/// Normalized result of one video analysis. Every field is always populated;
/// missing upstream values are replaced with defaults during normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalSchema {
    pub video_data: VideoData,
    pub topics: Vec<TopicScore>,
    pub sentiment_distribution: Vec<SentimentShare>,
    /// Chronological, in the order the service reported it.
    pub sentiment_timeline: Vec<SentimentSegment>,
    pub top_comments: Vec<CommentInsight>,
    /// Most relevant first. Rank is positional; there is no score.
    pub keywords: Vec<String>,
}

/// Video metadata. `views`, `upload_date` and `duration` are display strings
/// exactly as the service formatted them (e.g. "1.2M views", "2 days ago").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoData {
    pub title: String,
    pub channel: String,
    pub views: String,
    pub upload_date: String,
    pub duration: String,
    pub likes: u64,
    pub dislikes: u64,
    pub comments: u64,
    #[serde(rename = "processing_time")]
    pub processing_time_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicScore {
    pub topic: String,
    /// 0–100.
    pub relevance: f64,
    pub mentions: u64,
}

/// One slice of the sentiment distribution. Values are percentages that are
/// meant to add up to roughly 100, but nothing renormalizes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentShare {
    pub name: String,
    pub value: f64,
    /// Hex color, e.g. "#22c55e".
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSegment {
    /// Label for the slice of the video, e.g. "0-25%".
    pub time: String,
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl Sentiment {
    /// Case-insensitive parse; `None` for anything that isn't one of the three labels.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" => Some(Sentiment::Positive),
            "neutral" => Some(Sentiment::Neutral),
            "negative" => Some(Sentiment::Negative),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentInsight {
    pub author: String,
    pub text: String,
    pub sentiment: Sentiment,
    /// -1.0 (negative) to 1.0 (positive).
    pub sentiment_score: f64,
    pub likes: u64,
}
