//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.ticketsync.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `TICKETSYNC_*`
//! 4. **Command-line arguments** – `--jira-url`, `--jira-project`, ...
//!
//! Settings that none of these layers provide fall back to the variables
//! the GitHub Actions runner exports: action inputs (`INPUT_JIRA-URL` and
//! friends), `GITHUB_TOKEN`, `GITHUB_EVENT_PATH`, and `GITHUB_API_URL`.
//!
//! # Configuration File
//!
//! ```toml
//! jira_url = "https://example.atlassian.net"
//! jira_project = "SC"
//! jira_login = "bot@example.com"
//! transition_in_progress = 11
//! transition_in_review = 21
//! transition_in_test = 31
//! transition_resolved = 41
//! mainline_branch = "main"
//! ```

use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::SyncError;
use crate::github::locator::{DEFAULT_API_BASE, PersonalAccessToken, parse_api_base};
use crate::jira::client::TrackerCredentials;
use crate::sync::driver::DEFAULT_RESOLUTION_NAME;
use crate::sync::extract::ProjectKey;
use crate::sync::status::{
    DEFAULT_MAINLINE_BRANCH, DEFAULT_SHARED_BRANCH_LABEL, SyncPolicy, TransitionIds,
};
use crate::workflow::{action_input, non_blank_env};

/// Default tracing filter directive.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// Every field can be set as `TICKETSYNC_<FIELD>`, e.g. `TICKETSYNC_JIRA_URL`.
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use ticketsync::TicketSyncConfig;
///
/// let config = TicketSyncConfig::load().expect("failed to load configuration");
/// let settings = config.resolve_settings().expect("settings should resolve");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "TICKETSYNC",
    discovery(
        dotfile_name = ".ticketsync.toml",
        config_file_name = "ticketsync.toml",
        app_name = "ticketsync"
    )
)]
pub struct TicketSyncConfig {
    /// Token used to list pull request commits.
    ///
    /// Falls back to the `github-token` action input, then `GITHUB_TOKEN`.
    #[ortho_config(cli_short = 't')]
    pub github_token: Option<String>,

    /// GitHub REST API base URL.
    ///
    /// Falls back to `GITHUB_API_URL`, then the public API.
    #[ortho_config()]
    pub github_api_url: Option<String>,

    /// Path of the webhook payload file.
    ///
    /// Falls back to `GITHUB_EVENT_PATH`.
    #[ortho_config(cli_short = 'e')]
    pub event_path: Option<PathBuf>,

    /// Tracker login (action input `jira-login`).
    #[ortho_config()]
    pub jira_login: Option<String>,

    /// Tracker API token (action input `jira-password`).
    #[ortho_config()]
    pub jira_token: Option<String>,

    /// Tracker base URL, optionally with a context path (action input `jira-url`).
    #[ortho_config()]
    pub jira_url: Option<String>,

    /// Tracker project key used as the ticket prefix (action input `jira-project`).
    #[ortho_config(cli_short = 'p')]
    pub jira_project: Option<String>,

    /// Transition reaching `In Progress` (action input `jira-field-inprogress`).
    #[ortho_config()]
    pub transition_in_progress: Option<u64>,

    /// Transition reaching `In Review` (action input `jira-field-inreview`).
    #[ortho_config()]
    pub transition_in_review: Option<u64>,

    /// Transition reaching `In Test` (action input `jira-field-intest`).
    #[ortho_config()]
    pub transition_in_test: Option<u64>,

    /// Transition reaching `Resolved` (action input `jira-field-resolved`).
    #[ortho_config()]
    pub transition_resolved: Option<u64>,

    /// Label exempting pull requests against long-lived shared branches.
    #[ortho_config()]
    pub shared_branch_label: String,

    /// Branch whose merges resolve tickets.
    #[ortho_config()]
    pub mainline_branch: String,

    /// Resolution attached to resolved tickets.
    #[ortho_config()]
    pub resolution_name: String,

    /// Tracing filter directive, e.g. `debug` or `ticketsync=trace`.
    #[ortho_config(cli_short = 'l')]
    pub log_level: String,
}

impl Default for TicketSyncConfig {
    fn default() -> Self {
        Self {
            github_token: None,
            github_api_url: None,
            event_path: None,
            jira_login: None,
            jira_token: None,
            jira_url: None,
            jira_project: None,
            transition_in_progress: None,
            transition_in_review: None,
            transition_in_test: None,
            transition_resolved: None,
            shared_branch_label: DEFAULT_SHARED_BRANCH_LABEL.to_owned(),
            mainline_branch: DEFAULT_MAINLINE_BRANCH.to_owned(),
            resolution_name: DEFAULT_RESOLUTION_NAME.to_owned(),
            log_level: DEFAULT_LOG_LEVEL.to_owned(),
        }
    }
}

/// Validated settings for one run.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// Token for the GitHub API.
    pub github_token: PersonalAccessToken,
    /// GitHub REST API base URL.
    pub github_api_base: Url,
    /// Webhook payload file.
    pub event_path: PathBuf,
    /// Tracker base URL.
    pub jira_url: Url,
    /// Tracker credentials.
    pub credentials: TrackerCredentials,
    /// Ticket prefix.
    pub project: ProjectKey,
    /// Transition identifier per target status.
    pub transitions: TransitionIds,
    /// Shared-branch and mainline conventions.
    pub policy: SyncPolicy,
    /// Resolution attached to resolved tickets.
    pub resolution_name: String,
}

impl TicketSyncConfig {
    /// Validates the configuration, filling gaps from the Actions runner
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MissingSetting`] naming the first required field
    /// no source provides, [`SyncError::Configuration`] for non-numeric
    /// transition inputs, [`SyncError::InvalidUrl`] for malformed URLs, and
    /// [`SyncError::InvalidProjectKey`] for unusable project keys.
    pub fn resolve_settings(&self) -> Result<SyncSettings, SyncError> {
        let github_token = PersonalAccessToken::new(self.resolve_github_token()?)?;
        let github_api_base = parse_api_base(&self.resolve_github_api_url())?;
        let event_path = self.resolve_event_path()?;

        let login = required(self.jira_login.as_deref(), "jira-login", "jira_login")?;
        let token = required(self.jira_token.as_deref(), "jira-password", "jira_token")?;
        let credentials = TrackerCredentials::new(login, token)?;
        let jira_url = parse_tracker_url(&required(
            self.jira_url.as_deref(),
            "jira-url",
            "jira_url",
        )?)?;
        let project = ProjectKey::new(&required(
            self.jira_project.as_deref(),
            "jira-project",
            "jira_project",
        )?)?;

        let transitions = TransitionIds {
            in_progress: transition_id(
                self.transition_in_progress,
                "jira-field-inprogress",
                "transition_in_progress",
            )?,
            in_review: transition_id(
                self.transition_in_review,
                "jira-field-inreview",
                "transition_in_review",
            )?,
            in_test: transition_id(
                self.transition_in_test,
                "jira-field-intest",
                "transition_in_test",
            )?,
            resolved: transition_id(
                self.transition_resolved,
                "jira-field-resolved",
                "transition_resolved",
            )?,
        };

        Ok(SyncSettings {
            github_token,
            github_api_base,
            event_path,
            jira_url,
            credentials,
            project,
            transitions,
            policy: SyncPolicy {
                shared_branch_label: self.shared_branch_label.clone(),
                mainline_branch: self.mainline_branch.clone(),
            },
            resolution_name: self.resolution_name.clone(),
        })
    }

    /// Resolves the GitHub token from configuration, the `github-token`
    /// action input, or the legacy `GITHUB_TOKEN` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MissingSetting`] when no source provides a value.
    pub fn resolve_github_token(&self) -> Result<String, SyncError> {
        configured(self.github_token.as_deref())
            .or_else(|| action_input("github-token"))
            .or_else(|| non_blank_env("GITHUB_TOKEN"))
            .ok_or_else(|| missing("github_token"))
    }

    /// GitHub API base URL from configuration, `GITHUB_API_URL`, or the
    /// public API.
    #[must_use]
    pub fn resolve_github_api_url(&self) -> String {
        configured(self.github_api_url.as_deref())
            .or_else(|| non_blank_env("GITHUB_API_URL"))
            .unwrap_or_else(|| DEFAULT_API_BASE.to_owned())
    }

    /// Event payload path from configuration or `GITHUB_EVENT_PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MissingSetting`] when neither is set.
    pub fn resolve_event_path(&self) -> Result<PathBuf, SyncError> {
        self.event_path
            .clone()
            .filter(|path| !path.as_os_str().is_empty())
            .or_else(|| non_blank_env("GITHUB_EVENT_PATH").map(PathBuf::from))
            .ok_or_else(|| missing("event_path"))
    }
}

fn configured(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(ToOwned::to_owned)
}

fn missing(name: &str) -> SyncError {
    SyncError::MissingSetting {
        name: name.to_owned(),
    }
}

fn required(value: Option<&str>, input: &str, name: &str) -> Result<String, SyncError> {
    configured(value)
        .or_else(|| action_input(input))
        .ok_or_else(|| missing(name))
}

fn transition_id(value: Option<u64>, input: &str, name: &str) -> Result<u64, SyncError> {
    if let Some(id) = value {
        return Ok(id);
    }
    let raw = action_input(input).ok_or_else(|| missing(name))?;
    raw.parse().map_err(|_| SyncError::Configuration {
        message: format!("{name} must be a transition number, got `{raw}`"),
    })
}

fn parse_tracker_url(input: &str) -> Result<Url, SyncError> {
    let parsed =
        Url::parse(input).map_err(|error| SyncError::InvalidUrl(format!("{input}: {error}")))?;
    if parsed.cannot_be_a_base() {
        return Err(SyncError::InvalidUrl(format!(
            "{input}: tracker URL must be hierarchical"
        )));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests;
