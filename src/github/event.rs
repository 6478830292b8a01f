//! Pull request lifecycle events delivered by the GitHub Actions runner.
//!
//! The runner writes the webhook payload that triggered the workflow to the
//! file named by `GITHUB_EVENT_PATH`. Only the fields that drive ticket
//! synchronisation are decoded; everything else in the payload is ignored.

use std::path::Path;

use serde::Deserialize;
use url::Url;

use crate::error::SyncError;

use super::locator::{PullRequestLocator, PullRequestNumber, RepositoryName, RepositoryOwner};

/// Lifecycle action named by the webhook `action` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullRequestAction {
    /// The pull request was opened.
    Opened,
    /// A closed pull request was reopened.
    Reopened,
    /// New commits were pushed to the head branch.
    Synchronize,
    /// A review was requested from a user or team.
    ReviewRequested,
    /// A review request was withdrawn.
    ReviewRequestRemoved,
    /// A review was submitted (`pull_request_review` events).
    Submitted,
    /// The pull request was closed, merged or not.
    Closed,
    /// Any action the synchroniser does not react to.
    Other(String),
}

impl PullRequestAction {
    /// Maps the webhook action name onto a variant.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "opened" => Self::Opened,
            "reopened" => Self::Reopened,
            "synchronize" => Self::Synchronize,
            "review_requested" => Self::ReviewRequested,
            "review_request_removed" => Self::ReviewRequestRemoved,
            "submitted" => Self::Submitted,
            "closed" => Self::Closed,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Webhook name of the action.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Opened => "opened",
            Self::Reopened => "reopened",
            Self::Synchronize => "synchronize",
            Self::ReviewRequested => "review_requested",
            Self::ReviewRequestRemoved => "review_request_removed",
            Self::Submitted => "submitted",
            Self::Closed => "closed",
            Self::Other(name) => name.as_str(),
        }
    }
}

/// State of a submitted review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewState {
    /// The reviewer approved the changes.
    Approved,
    /// The reviewer requested changes.
    ChangesRequested,
    /// The reviewer only left comments.
    Commented,
    /// A previous review was dismissed.
    Dismissed,
    /// A state this crate does not know about.
    Other(String),
}

impl ReviewState {
    /// Parses a review state; webhooks send lowercase, the REST API uppercase.
    #[must_use]
    pub fn parse(state: &str) -> Self {
        match state.to_ascii_lowercase().as_str() {
            "approved" => Self::Approved,
            "changes_requested" => Self::ChangesRequested,
            "commented" => Self::Commented,
            "dismissed" => Self::Dismissed,
            _ => Self::Other(state.to_owned()),
        }
    }
}

/// One pull request lifecycle event, immutable for the whole invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestEvent {
    /// Action that triggered the workflow.
    pub action: PullRequestAction,
    /// Names of the labels attached to the pull request.
    pub labels: Vec<String>,
    /// Number of reviewers whose review is still requested.
    pub requested_reviewer_count: usize,
    /// Whether the pull request has been merged.
    pub merged: bool,
    /// Name of the branch the pull request targets.
    pub base_branch: String,
    /// State of the submitted review, for review events.
    pub review_state: Option<ReviewState>,
    /// Pull request title.
    pub title: String,
    /// Where to list the pull request commits from.
    pub locator: PullRequestLocator,
}

impl PullRequestEvent {
    /// Decodes a webhook payload.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Event`] when the payload is not valid JSON or
    /// lacks the `pull_request` or `repository` objects, and the locator
    /// validation errors when the repository or number are unusable.
    pub fn from_payload(payload: &str, api_base: &Url) -> Result<Self, SyncError> {
        let raw: ApiEvent = serde_json::from_str(payload).map_err(|error| SyncError::Event {
            message: error.to_string(),
        })?;
        raw.into_event(api_base)
    }

    /// Reads and decodes the payload stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Io`] when the file cannot be read, otherwise the
    /// same errors as [`PullRequestEvent::from_payload`].
    pub fn load(path: &Path, api_base: &Url) -> Result<Self, SyncError> {
        let payload = std::fs::read_to_string(path).map_err(|error| SyncError::Io {
            message: format!("failed to read event payload {}: {error}", path.display()),
        })?;
        Self::from_payload(&payload, api_base)
    }

    /// Whether a label with exactly this name is attached.
    #[must_use]
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|label| label == name)
    }
}

#[derive(Debug, Deserialize)]
struct ApiEvent {
    action: Option<String>,
    pull_request: Option<ApiPullRequest>,
    review: Option<ApiReview>,
    repository: Option<ApiRepository>,
}

#[derive(Debug, Deserialize)]
struct ApiPullRequest {
    number: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    labels: Vec<ApiLabel>,
    #[serde(default)]
    requested_reviewers: Vec<serde_json::Value>,
    #[serde(default)]
    merged: Option<bool>,
    base: ApiBranch,
}

#[derive(Debug, Deserialize)]
struct ApiLabel {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiBranch {
    #[serde(rename = "ref")]
    reference: String,
}

#[derive(Debug, Deserialize)]
struct ApiReview {
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiRepository {
    name: String,
    owner: ApiOwner,
}

#[derive(Debug, Deserialize)]
struct ApiOwner {
    login: String,
}

impl ApiEvent {
    fn into_event(self, api_base: &Url) -> Result<PullRequestEvent, SyncError> {
        let pull_request = self.pull_request.ok_or_else(|| SyncError::Event {
            message: "payload has no pull_request object".to_owned(),
        })?;
        let repository = self.repository.ok_or_else(|| SyncError::Event {
            message: "payload has no repository object".to_owned(),
        })?;

        let locator = PullRequestLocator::new(
            api_base.clone(),
            RepositoryOwner::new(&repository.owner.login)?,
            RepositoryName::new(&repository.name)?,
            PullRequestNumber::new(pull_request.number)?,
        );

        Ok(PullRequestEvent {
            action: PullRequestAction::parse(self.action.as_deref().unwrap_or_default()),
            labels: pull_request
                .labels
                .into_iter()
                .map(|label| label.name)
                .collect(),
            requested_reviewer_count: pull_request.requested_reviewers.len(),
            merged: pull_request.merged.unwrap_or(false),
            base_branch: pull_request.base.reference,
            review_state: self
                .review
                .and_then(|review| review.state)
                .map(|state| ReviewState::parse(&state)),
            title: pull_request.title.unwrap_or_default(),
            locator,
        })
    }
}
