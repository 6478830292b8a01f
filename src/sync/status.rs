//! Decides which tracker status a pull request event should produce.

use std::fmt;

use tracing::info;

use crate::github::event::{PullRequestAction, PullRequestEvent, ReviewState};

/// Default label marking pull requests against long-lived shared branches.
pub const DEFAULT_SHARED_BRANCH_LABEL: &str = "common-branch";
/// Default branch whose merges resolve tickets.
pub const DEFAULT_MAINLINE_BRANCH: &str = "master";

/// Tracker status a ticket is moved into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetStatus {
    /// Work has started, nobody has been asked to review yet.
    InProgress,
    /// Reviewers have been requested.
    InReview,
    /// A reviewer approved the change.
    InTest,
    /// The change landed on the mainline branch.
    Resolved,
}

impl TargetStatus {
    /// Status name as the tracker displays it.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::InProgress => "In Progress",
            Self::InReview => "In Review",
            Self::InTest => "In Test",
            Self::Resolved => "Resolved",
        }
    }

    /// Whether the status is terminal and needs a resolution.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Resolved)
    }
}

impl fmt::Display for TargetStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// Tracker transition identifiers reaching each target status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionIds {
    /// Transition into `In Progress`.
    pub in_progress: u64,
    /// Transition into `In Review`.
    pub in_review: u64,
    /// Transition into `In Test`.
    pub in_test: u64,
    /// Transition into `Resolved`.
    pub resolved: u64,
}

impl TransitionIds {
    /// Identifier of the transition reaching `status`.
    #[must_use]
    pub const fn for_status(&self, status: TargetStatus) -> u64 {
        match status {
            TargetStatus::InProgress => self.in_progress,
            TargetStatus::InReview => self.in_review,
            TargetStatus::InTest => self.in_test,
            TargetStatus::Resolved => self.resolved,
        }
    }
}

/// Repository conventions the resolver relies on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPolicy {
    /// Label exempting a pull request from synchronisation until its final merge.
    pub shared_branch_label: String,
    /// Branch whose merges resolve tickets.
    pub mainline_branch: String,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            shared_branch_label: DEFAULT_SHARED_BRANCH_LABEL.to_owned(),
            mainline_branch: DEFAULT_MAINLINE_BRANCH.to_owned(),
        }
    }
}

impl SyncPolicy {
    fn is_merged_into_mainline(&self, event: &PullRequestEvent) -> bool {
        event.merged && event.base_branch == self.mainline_branch
    }
}

/// Maps a pull request event onto the status its tickets should reach.
///
/// Returns `None` when the event should leave tickets untouched.
#[must_use]
pub fn resolve_target_status(event: &PullRequestEvent, policy: &SyncPolicy) -> Option<TargetStatus> {
    if event.has_label(&policy.shared_branch_label)
        && !(event.action == PullRequestAction::Closed && policy.is_merged_into_mainline(event))
    {
        info!(
            label = %policy.shared_branch_label,
            "Detected shared-branch label - not performing any change"
        );
        return None;
    }

    match &event.action {
        PullRequestAction::Opened
        | PullRequestAction::Reopened
        | PullRequestAction::Synchronize
        | PullRequestAction::ReviewRequestRemoved => {
            if event.requested_reviewer_count == 0 {
                Some(TargetStatus::InProgress)
            } else {
                Some(TargetStatus::InReview)
            }
        }
        PullRequestAction::ReviewRequested => Some(TargetStatus::InReview),
        PullRequestAction::Submitted => (event.review_state == Some(ReviewState::Approved))
            .then_some(TargetStatus::InTest),
        PullRequestAction::Closed => policy
            .is_merged_into_mainline(event)
            .then_some(TargetStatus::Resolved),
        PullRequestAction::Other(name) => {
            info!(action = %name, "Ignoring unrecognised pull request action");
            None
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
