use std::path::{Path, PathBuf};

use analysis_client::AnalysisClient;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use insighttube_common::{AnalysisRequest, CanonicalSchema, Config};
use insighttube_engine::export::export_bundle;
use insighttube_engine::{fallback_dataset, Orchestrator, OrchestratorState, Phase};
use tracing_subscriber::EnvFilter;

mod summary;

#[derive(Parser)]
#[command(name = "insighttube", about = "Analyze a video's topics, sentiment and comments")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a video and export the results
    Analyze {
        /// Video URL (youtube.com or youtu.be)
        url: String,

        /// Directory to write export files into
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Print the summary only, write no files
        #[arg(long)]
        no_export: bool,
    },
    /// Export the built-in fallback dataset without contacting the service
    Fallback {
        /// Directory to write export files into
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("insighttube=info,insighttube_engine=info"));
    if cli.json_logs {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    match cli.command {
        Command::Analyze {
            url,
            out_dir,
            no_export,
        } => analyze(&url, &out_dir, no_export).await,
        Command::Fallback { out_dir } => {
            let data = fallback_dataset();
            summary::print_result(&data);
            write_exports(&data, &out_dir)
        }
    }
}

async fn analyze(url: &str, out_dir: &Path, no_export: bool) -> Result<()> {
    let config = Config::from_env()?;

    let client =
        AnalysisClient::with_timeout(&config.api_url, &config.api_key, config.request_timeout)
            .context("Failed to build analysis client")?;
    let orchestrator =
        Orchestrator::with_policies(client, config.failure_policy, config.completion_policy);

    let state = orchestrator.analyze(AnalysisRequest::new(url)).await;
    if state.phase == Phase::Idle {
        anyhow::bail!("'{url}' is not a supported video URL");
    }

    summary::print_state(&state);

    match (&state.data, no_export) {
        (Some(data), false) => write_exports(data, out_dir)?,
        (Some(_), true) => tracing::info!("Export skipped (--no-export)"),
        (None, _) => tracing::warn!("No result to export"),
    }

    exit_status(&state)
}

fn write_exports(data: &CanonicalSchema, out_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    for file in export_bundle(data, chrono::Utc::now())? {
        let path = file.write_to(out_dir)?;
        tracing::info!(path = %path.display(), content_type = file.content_type, "Export written");
    }
    Ok(())
}

/// A failed analysis still exports fallback data, but the process reports failure.
fn exit_status(state: &OrchestratorState) -> Result<()> {
    match (&state.phase, &state.error) {
        (Phase::Failed, Some(error)) => Err(anyhow::anyhow!("analysis failed: {error}")),
        _ => Ok(()),
    }
}
