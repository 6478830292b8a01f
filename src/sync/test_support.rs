//! Test helpers for constructing events, issues, and tickets.

use url::Url;

use crate::github::event::{PullRequestAction, PullRequestEvent, ReviewState};
use crate::github::locator::{
    PullRequestLocator, PullRequestNumber, RepositoryName, RepositoryOwner,
};
use crate::jira::models::{Issue, IssueFields, IssueStatus, IssueUser};

use super::eligibility::Ticket;
use super::status::TransitionIds;

/// Transition identifiers used across the synchroniser tests.
pub const TEST_TRANSITIONS: TransitionIds = TransitionIds {
    in_progress: 11,
    in_review: 21,
    in_test: 31,
    resolved: 41,
};

/// Locator for `octo/repo#7` on the public API.
#[must_use]
pub fn sample_locator() -> PullRequestLocator {
    PullRequestLocator::new(
        Url::parse("https://api.github.com").expect("static URL should parse"),
        RepositoryOwner::new("octo").expect("owner should be valid"),
        RepositoryName::new("repo").expect("repository should be valid"),
        PullRequestNumber::new(7).expect("number should be valid"),
    )
}

/// An unlabeled, unmerged event against `master` with no reviewers.
#[must_use]
pub fn event(action: PullRequestAction) -> PullRequestEvent {
    PullRequestEvent {
        action,
        labels: Vec::new(),
        requested_reviewer_count: 0,
        merged: false,
        base_branch: "master".to_owned(),
        review_state: None,
        title: String::new(),
        locator: sample_locator(),
    }
}

/// Same as [`event`] with the given reviewer count.
#[must_use]
pub fn event_with_reviewers(action: PullRequestAction, count: usize) -> PullRequestEvent {
    PullRequestEvent {
        requested_reviewer_count: count,
        ..event(action)
    }
}

/// A review submission with the given state.
#[must_use]
pub fn review_event(state: Option<ReviewState>) -> PullRequestEvent {
    PullRequestEvent {
        review_state: state,
        ..event(PullRequestAction::Submitted)
    }
}

/// A closed event with the given merge flag and base branch.
#[must_use]
pub fn closed_event(merged: bool, base_branch: &str) -> PullRequestEvent {
    PullRequestEvent {
        merged,
        base_branch: base_branch.to_owned(),
        ..event(PullRequestAction::Closed)
    }
}

/// Tracker issue with the given status, assignee, and sub-task count.
#[must_use]
pub fn issue(key: &str, status: &str, assignee: Option<&str>, subtasks: usize) -> Issue {
    Issue {
        id: format!("id-{key}"),
        key: key.to_owned(),
        fields: IssueFields {
            status: Some(IssueStatus {
                name: status.to_owned(),
            }),
            assignee: assignee.map(|name| IssueUser {
                name: Some(name.to_owned()),
            }),
            subtasks: Some(vec![serde_json::json!({ "key": "SUB-1" }); subtasks]),
        },
    }
}

/// Eligible ticket with the given status and assignee.
#[must_use]
pub fn ticket(key: &str, status: &str, assignee: Option<&str>) -> Ticket {
    Ticket::from(issue(key, status, assignee, 0))
}
