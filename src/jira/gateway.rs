//! Trait seam over the tracker's issue endpoints.

use async_trait::async_trait;

use crate::error::SyncError;

use super::models::{AvailableTransition, Issue, IssueQuery, TransitionRequest};

/// Result of fetching an issue that may legitimately not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueLookup {
    /// The tracker returned the issue.
    Found(Issue),
    /// The tracker answered 404 for the key.
    NotFound,
}

/// Read/update verbs of the tracker used by the synchroniser.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrackerGateway: Send + Sync {
    /// Fetch an issue; a missing issue is [`IssueLookup::NotFound`], not an error.
    async fn get_issue(&self, key: &str, query: &IssueQuery) -> Result<IssueLookup, SyncError>;

    /// List the transitions currently available for an issue.
    async fn get_issue_transitions(&self, key: &str)
    -> Result<Vec<AvailableTransition>, SyncError>;

    /// Execute a workflow transition.
    async fn transition_issue(
        &self,
        key: &str,
        request: &TransitionRequest,
    ) -> Result<(), SyncError>;

    /// Reassign an issue to the user with the given login name.
    async fn assign_issue(&self, key: &str, assignee: &str) -> Result<(), SyncError>;
}
