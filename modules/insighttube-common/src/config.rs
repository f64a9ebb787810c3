use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// What the orchestrator puts in the result slot when a live analysis fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Install the fixed fallback dataset alongside the error.
    #[default]
    Fallback,
    /// Leave the result slot empty; only the error is reported.
    Empty,
}

impl FromStr for FailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fallback" => Ok(FailurePolicy::Fallback),
            "empty" => Ok(FailurePolicy::Empty),
            other => Err(anyhow!("unknown failure policy '{other}' (expected fallback|empty)")),
        }
    }
}

/// How completions of overlapping `analyze` calls are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionPolicy {
    /// Only the most recently issued request may write the result slot.
    /// Older in-flight requests are cancelled.
    #[default]
    LatestRequest,
    /// Whichever response arrives last overwrites the slot.
    LastArrival,
}

impl FromStr for CompletionPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latest-request" | "latest_request" | "latest" => Ok(CompletionPolicy::LatestRequest),
            "last-arrival" | "last_arrival" => Ok(CompletionPolicy::LastArrival),
            other => Err(anyhow!(
                "unknown completion policy '{other}' (expected latest-request|last-arrival)"
            )),
        }
    }
}

/// Deployment configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub api_key: String,
    pub request_timeout: Duration,
    pub failure_policy: FailurePolicy,
    pub completion_policy: CompletionPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            api_url: std::env::var("INSIGHTTUBE_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            api_key: std::env::var("INSIGHTTUBE_API_KEY")
                .context("INSIGHTTUBE_API_KEY environment variable not set")?,
            request_timeout: Duration::from_secs(parse_env(
                "INSIGHTTUBE_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )?),
            failure_policy: parse_env("INSIGHTTUBE_FAILURE_POLICY", FailurePolicy::default())?,
            completion_policy: parse_env(
                "INSIGHTTUBE_COMPLETION_POLICY",
                CompletionPolicy::default(),
            )?,
        };

        config.log_redacted();
        Ok(config)
    }

    fn log_redacted(&self) {
        fn preview(val: &str) -> String {
            let n = val.chars().take(5).map(char::len_utf8).sum::<usize>();
            format!("{}...({} chars)", &val[..n], val.chars().count())
        }

        tracing::info!("Config loaded:");
        tracing::info!("  INSIGHTTUBE_API_URL: {}", self.api_url);
        tracing::info!("  INSIGHTTUBE_API_KEY: {}", preview(&self.api_key));
        tracing::info!("  INSIGHTTUBE_TIMEOUT_SECS: {}", self.request_timeout.as_secs());
        tracing::info!("  INSIGHTTUBE_FAILURE_POLICY: {:?}", self.failure_policy);
        tracing::info!("  INSIGHTTUBE_COMPLETION_POLICY: {:?}", self.completion_policy);
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{key} is invalid: {e}")),
        _ => Ok(default),
    }
}
