pub mod error;
pub mod types;

pub use error::{ClientError, Result};
pub use types::AnalyzeRequestBody;

use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the remote video analysis service.
///
/// The service is a black box: the response body is returned as untyped JSON
/// and shaping it into something usable is the caller's job.
#[derive(Clone)]
pub struct AnalysisClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AnalysisClient {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, api_key, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run an analysis. Any 2xx response must carry a JSON body; anything else
    /// is an `Api` error with the status code and whatever text came back.
    pub async fn analyze(&self, body: &AnalyzeRequestBody) -> Result<serde_json::Value> {
        let url = format!("{}/analyze", self.base_url);
        tracing::debug!(url = %url, video_url = %body.video_url, "Sending analysis request");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = resp.text().await?;
        let payload: serde_json::Value = serde_json::from_str(&text)?;
        tracing::debug!(status = status.as_u16(), bytes = text.len(), "Analysis response received");

        Ok(payload)
    }
}
