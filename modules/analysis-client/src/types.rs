use serde::Serialize;

/// Body of `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyzeRequestBody {
    pub video_url: String,
    pub include_comments: bool,
    pub include_sentiment: bool,
    pub include_topics: bool,
    pub include_keywords: bool,
}
