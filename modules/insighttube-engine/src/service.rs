use analysis_client::{AnalysisClient, AnalyzeRequestBody};
use async_trait::async_trait;
use insighttube_common::AnalysisRequest;

use crate::error::AnalysisError;

/// The remote analysis backend as seen by the orchestrator.
///
/// Implemented by the HTTP client; tests plug in scripted fakes.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Fetch the raw, unnormalized analysis payload for a video.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<serde_json::Value, AnalysisError>;
}

#[async_trait]
impl AnalysisService for AnalysisClient {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<serde_json::Value, AnalysisError> {
        let body = AnalyzeRequestBody {
            video_url: request.video_url.clone(),
            include_comments: request.include_comments,
            include_sentiment: request.include_sentiment,
            include_topics: request.include_topics,
            include_keywords: request.include_keywords,
        };
        Ok(AnalysisClient::analyze(self, &body).await?)
    }
}
