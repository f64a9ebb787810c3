//! Analysis request orchestration and data normalization.
//!
//! A request flows through the [`Orchestrator`]: the remote service is called
//! through an [`AnalysisService`], the untyped payload is shaped by
//! [`normalize`] into a [`CanonicalSchema`](insighttube_common::CanonicalSchema),
//! and failures fall back to [`fallback_dataset`]. The [`export`] module turns
//! whatever result is resident into downloadable CSV and JSON files.

pub mod error;
pub mod export;
pub mod fallback;
pub mod metrics;
pub mod normalize;
pub mod orchestrator;
pub mod service;
pub mod validation;

pub use error::AnalysisError;
pub use export::{ExportError, ExportFile};
pub use fallback::fallback_dataset;
pub use normalize::{normalize, NormalizationError};
pub use orchestrator::{
    is_stale, transition, AnalysisEvent, Orchestrator, OrchestratorState, Phase, ResultSource,
};
pub use service::AnalysisService;
pub use validation::{extract_video_id, is_supported_video_url};
