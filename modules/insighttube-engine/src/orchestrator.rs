//! Request lifecycle for one analysis session.
//!
//! State lives in an explicit [`OrchestratorState`] and only changes through
//! [`transition`], a pure function of `(state, event)`. The [`Orchestrator`]
//! issues remote calls, turns their outcomes into events, and applies them.
//!
//! ```text
//! Idle ──analyze──▶ Loading ──ok──▶ Succeeded (live data)
//!   ▲                  │
//!   │                  └──err──▶ Failed (error + fallback data)
//!   └──────clear─────── any
//! ```

use std::sync::Arc;

use insighttube_common::{AnalysisRequest, CanonicalSchema, CompletionPolicy, FailurePolicy};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::AnalysisError;
use crate::fallback::fallback_dataset;
use crate::normalize::normalize;
use crate::service::AnalysisService;
use crate::validation::{extract_video_id, is_supported_video_url};

// =============================================================================
// State
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// Where the resident result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSource {
    /// Normalized from the service's response for the requested video.
    Live,
    /// The fixed fallback dataset; says nothing about the requested video.
    Fallback,
}

/// Snapshot of the orchestrator. `data` and `error` are independent: a failed
/// analysis may carry both an error and fallback data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrchestratorState {
    pub phase: Phase,
    pub data: Option<Arc<CanonicalSchema>>,
    pub source: Option<ResultSource>,
    pub error: Option<String>,
    /// Generation of the most recently issued request (or clear).
    pub generation: u64,
}

impl OrchestratorState {
    /// True when `data` reflects the requested video.
    pub fn is_authoritative(&self) -> bool {
        self.phase == Phase::Succeeded && self.source == Some(ResultSource::Live)
    }
}

#[derive(Debug, Clone)]
pub enum AnalysisEvent {
    Started {
        generation: u64,
    },
    Succeeded {
        generation: u64,
        data: Arc<CanonicalSchema>,
    },
    Failed {
        generation: u64,
        message: String,
        fallback: Option<Arc<CanonicalSchema>>,
    },
    Cleared,
}

/// Apply one event. Pure: no I/O and no access to anything but its inputs.
///
/// Under [`CompletionPolicy::LatestRequest`], a completion from a generation
/// older than the state's is stale and leaves the state unchanged. Under
/// [`CompletionPolicy::LastArrival`], every completion overwrites the slot.
pub fn transition(
    state: &OrchestratorState,
    event: AnalysisEvent,
    policy: CompletionPolicy,
) -> OrchestratorState {
    let stale = |generation: u64| is_stale(state, generation, policy);

    match event {
        AnalysisEvent::Started { generation } => OrchestratorState {
            phase: Phase::Loading,
            data: None,
            source: None,
            error: None,
            generation: generation.max(state.generation),
        },
        AnalysisEvent::Succeeded { generation, .. } | AnalysisEvent::Failed { generation, .. }
            if stale(generation) =>
        {
            state.clone()
        }
        AnalysisEvent::Succeeded { data, .. } => OrchestratorState {
            phase: Phase::Succeeded,
            data: Some(data),
            source: Some(ResultSource::Live),
            error: None,
            generation: state.generation,
        },
        AnalysisEvent::Failed {
            message, fallback, ..
        } => OrchestratorState {
            phase: Phase::Failed,
            source: fallback.as_ref().map(|_| ResultSource::Fallback),
            data: fallback,
            error: Some(message),
            generation: state.generation,
        },
        AnalysisEvent::Cleared => OrchestratorState {
            generation: state.generation + 1,
            ..OrchestratorState::default()
        },
    }
}

/// A completion is stale when a newer request (or a clear) has been issued
/// and only the latest request may write the slot.
pub fn is_stale(state: &OrchestratorState, generation: u64, policy: CompletionPolicy) -> bool {
    policy == CompletionPolicy::LatestRequest && generation < state.generation
}

// =============================================================================
// Orchestrator
// =============================================================================

struct Inner {
    state: OrchestratorState,
    /// Cancellation handle of the request allowed to write the slot.
    in_flight: Option<(u64, CancellationToken)>,
}

/// Owns the current-result slot and drives requests against an [`AnalysisService`].
pub struct Orchestrator<S> {
    service: S,
    failure_policy: FailurePolicy,
    completion_policy: CompletionPolicy,
    inner: Mutex<Inner>,
}

impl<S: AnalysisService> Orchestrator<S> {
    pub fn new(service: S) -> Self {
        Self::with_policies(service, FailurePolicy::default(), CompletionPolicy::default())
    }

    pub fn with_policies(
        service: S,
        failure_policy: FailurePolicy,
        completion_policy: CompletionPolicy,
    ) -> Self {
        Self {
            service,
            failure_policy,
            completion_policy,
            inner: Mutex::new(Inner {
                state: OrchestratorState::default(),
                in_flight: None,
            }),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Read-only snapshot of the current state.
    pub async fn state(&self) -> OrchestratorState {
        self.inner.lock().await.state.clone()
    }

    pub async fn current_result(&self) -> Option<Arc<CanonicalSchema>> {
        self.inner.lock().await.state.data.clone()
    }

    /// Run one analysis and return the state after it settles.
    ///
    /// A request whose URL is empty or not on a recognized video host is a
    /// no-op. Any failure is recorded as an error and, depending on the
    /// failure policy, the fallback dataset is installed as the result.
    pub async fn analyze(&self, request: AnalysisRequest) -> OrchestratorState {
        if !is_supported_video_url(&request.video_url) {
            debug!(video_url = %request.video_url, "Ignoring unsupported video URL");
            return self.state().await;
        }

        let request_id = Uuid::new_v4();
        let (generation, token) = self.begin().await;
        info!(
            %request_id,
            generation,
            video_id = extract_video_id(&request.video_url).as_deref().unwrap_or("?"),
            "Starting video analysis"
        );

        let outcome = tokio::select! {
            _ = token.cancelled() => {
                debug!(%request_id, generation, "Analysis superseded before completion");
                return self.state().await;
            }
            outcome = self.fetch(&request) => outcome,
        };

        let event = match outcome {
            Ok(data) => {
                info!(
                    %request_id,
                    generation,
                    topics = data.topics.len(),
                    comments = data.top_comments.len(),
                    keywords = data.keywords.len(),
                    "Analysis succeeded"
                );
                AnalysisEvent::Succeeded {
                    generation,
                    data: Arc::new(data),
                }
            }
            Err(err) => {
                warn!(%request_id, generation, error = %err, "Analysis failed");
                AnalysisEvent::Failed {
                    generation,
                    message: err.to_string(),
                    fallback: match self.failure_policy {
                        FailurePolicy::Fallback => Some(Arc::new(fallback_dataset())),
                        FailurePolicy::Empty => None,
                    },
                }
            }
        };

        let mut inner = self.inner.lock().await;
        if is_stale(&inner.state, generation, self.completion_policy) {
            debug!(%request_id, generation, "Discarded stale analysis result");
        }
        inner.state = transition(&inner.state, event, self.completion_policy);
        if matches!(inner.in_flight, Some((g, _)) if g == generation) {
            inner.in_flight = None;
        }
        inner.state.clone()
    }

    /// Reset to `Idle`, dropping any result and error. Idempotent.
    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        if let Some((_, token)) = inner.in_flight.take() {
            token.cancel();
        }
        inner.state = transition(&inner.state, AnalysisEvent::Cleared, self.completion_policy);
        debug!(generation = inner.state.generation, "Analysis cleared");
    }

    async fn begin(&self) -> (u64, CancellationToken) {
        let mut inner = self.inner.lock().await;
        let generation = inner.state.generation + 1;
        inner.state = transition(
            &inner.state,
            AnalysisEvent::Started { generation },
            self.completion_policy,
        );

        let token = CancellationToken::new();
        if self.completion_policy == CompletionPolicy::LatestRequest {
            let previous = inner.in_flight.replace((generation, token.clone()));
            if let Some((previous, superseded)) = previous {
                debug!(previous, generation, "Cancelling superseded analysis");
                superseded.cancel();
            }
        }
        (generation, token)
    }

    async fn fetch(&self, request: &AnalysisRequest) -> Result<CanonicalSchema, AnalysisError> {
        let raw = self.service.analyze(request).await?;
        Ok(normalize(&raw)?)
    }
}
