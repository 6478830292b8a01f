//! Scenario state and payload builders for ticket sync BDD tests.

use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use serde_json::{Value, json};
use ticketsync::{SyncError, SyncSummary};
use wiremock::MockServer;

use crate::support::runtime::SharedRuntime;

/// Repository owner used by every scenario.
pub(crate) const OWNER: &str = "octo";
/// Repository name used by every scenario.
pub(crate) const REPOSITORY: &str = "repo";
/// Pull request number used by every scenario.
pub(crate) const PULL_REQUEST: u64 = 7;

/// State shared across steps in a ticket sync scenario.
#[derive(ScenarioState, Default)]
pub(crate) struct SyncState {
    /// Runtime driving the mock servers and the pipeline.
    pub(crate) runtime: Slot<SharedRuntime>,
    /// Stand-in for the GitHub REST API.
    pub(crate) github: Slot<MockServer>,
    /// Stand-in for the tracker REST API.
    pub(crate) tracker: Slot<MockServer>,
    /// Outcome of a successful run.
    pub(crate) summary: Slot<SyncSummary>,
    /// Failure of an unsuccessful run.
    pub(crate) error: Slot<SyncError>,
}

/// Numeric tracker identifier for `key`, e.g. `10007` for `SC-7`.
pub(crate) fn issue_id(key: &str) -> String {
    let number = key
        .rsplit('-')
        .next()
        .and_then(|digits| digits.parse::<u64>().ok())
        .unwrap_or_default();
    (10_000 + number).to_string()
}

/// Tracker issue body with the given status and assignee.
pub(crate) fn issue_body(key: &str, status: &str, assignee: Option<&str>) -> Value {
    json!({
        "id": issue_id(key),
        "key": key,
        "fields": {
            "status": { "name": status },
            "assignee": assignee.map(|name| json!({ "name": name })),
            "subtasks": []
        }
    })
}

/// Commit list body for the pull request commits endpoint.
pub(crate) fn commits_body(messages: &[&str]) -> Value {
    let commits: Vec<Value> = messages
        .iter()
        .enumerate()
        .map(|(index, message)| {
            json!({
                "sha": format!("{index:040x}"),
                "commit": { "message": message }
            })
        })
        .collect();
    Value::Array(commits)
}

/// Webhook payload for `action` against `base`.
pub(crate) fn event_payload(action: &str, base: &str, merged: bool) -> Value {
    json!({
        "action": action,
        "number": PULL_REQUEST,
        "pull_request": {
            "number": PULL_REQUEST,
            "title": "Ticket work",
            "labels": [],
            "requested_reviewers": [],
            "merged": merged,
            "base": { "ref": base }
        },
        "repository": {
            "name": REPOSITORY,
            "owner": { "login": OWNER }
        }
    })
}

/// Error raised when the scenario harness itself misbehaves.
pub(crate) fn harness_error(message: impl Into<String>) -> SyncError {
    SyncError::Io {
        message: message.into(),
    }
}
