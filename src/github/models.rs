//! Data models representing pull request commits.

use serde::Deserialize;

/// Commit attached to a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestCommit {
    /// Commit SHA.
    pub sha: String,
    /// Full commit message, subject line first.
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCommit {
    pub(super) sha: String,
    pub(super) commit: ApiCommitDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCommitDetail {
    #[serde(default)]
    pub(super) message: String,
}

impl From<ApiCommit> for PullRequestCommit {
    fn from(value: ApiCommit) -> Self {
        Self {
            sha: value.sha,
            message: value.commit.message,
        }
    }
}
