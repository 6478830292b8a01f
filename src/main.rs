//! Ticketsync CLI entrypoint, run once per pull request event.

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use ortho_config::OrthoConfig;
use ticketsync::config::DEFAULT_LOG_LEVEL;
use ticketsync::workflow::write_error_command;
use ticketsync::{
    JiraClient, OctocrabCommitGateway, PullRequestEvent, SyncError, TicketExtractor, TicketSync,
    TicketSyncConfig,
};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            error!("{failure}");
            if write_error_command(&mut io::stdout().lock(), &failure.to_string()).is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), SyncError> {
    let config = load_config()?;
    init_tracing(&config.log_level);

    let settings = config.resolve_settings()?;
    let event = PullRequestEvent::load(&settings.event_path, &settings.github_api_base)?;

    let commits = OctocrabCommitGateway::for_token(&settings.github_token, &event.locator)?;
    let tracker = Arc::new(JiraClient::new(settings.jira_url, settings.credentials)?);
    let extractor = TicketExtractor::new(&settings.project)?;

    let summary = TicketSync::new(commits, tracker, extractor, settings.transitions)
        .with_policy(settings.policy)
        .with_resolution_name(settings.resolution_name)
        .run(&event)
        .await?;
    debug!("Run summary: {summary:?}");
    Ok(())
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`SyncError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<TicketSyncConfig, SyncError> {
    TicketSyncConfig::load().map_err(|failure| SyncError::Configuration {
        message: failure.to_string(),
    })
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();
}
