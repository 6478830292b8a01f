//! Behavioural tests for ticket synchronisation against mock GitHub and
//! tracker servers.

mod support {
    #[path = "../support/runtime.rs"]
    pub mod runtime;
}

#[path = "ticket_sync_bdd/state.rs"]
mod ticket_sync_bdd_state;

use std::sync::Arc;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};
use ticketsync::sync::{ProjectKey, TransitionIds, TransitionResult};
use ticketsync::{
    JiraClient, OctocrabCommitGateway, PersonalAccessToken, PullRequestEvent, SyncError,
    SyncSummary, TicketExtractor, TicketSync, TrackerCredentials,
};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use support::runtime::{SharedRuntime, ensure_runtime_and_servers};
use ticket_sync_bdd_state::{
    OWNER, PULL_REQUEST, REPOSITORY, SyncState, commits_body, event_payload, harness_error,
    issue_body, issue_id,
};

const TRANSITIONS: TransitionIds = TransitionIds {
    in_progress: 11,
    in_review: 21,
    in_test: 31,
    resolved: 41,
};

#[fixture]
fn sync_state() -> SyncState {
    SyncState::default()
}

fn ensure_servers(sync_state: &SyncState) -> Result<SharedRuntime, SyncError> {
    ensure_runtime_and_servers(
        &sync_state.runtime,
        &[&sync_state.github, &sync_state.tracker],
    )
    .map_err(|error| harness_error(format!("failed to start mock servers: {error}")))
}

fn mount(sync_state: &SyncState, on_github: bool, mocks: Vec<Mock>) -> Result<(), SyncError> {
    let runtime = ensure_servers(sync_state)?;
    let server = if on_github {
        &sync_state.github
    } else {
        &sync_state.tracker
    };
    server
        .with_ref(|mock_server| {
            for mock in mocks {
                runtime.block_on(mock.mount(mock_server));
            }
        })
        .ok_or_else(|| harness_error("mock server not initialised"))
}

fn commits_path() -> String {
    format!("/repos/{OWNER}/{REPOSITORY}/pulls/{PULL_REQUEST}/commits")
}

fn seed_ticket(
    sync_state: &SyncState,
    key: &str,
    status: &str,
    assignee: Option<&str>,
) -> Result<(), SyncError> {
    let id = issue_id(key);
    mount(
        sync_state,
        false,
        vec![
            Mock::given(method("GET"))
                .and(path(format!("/rest/api/2/issue/{key}")))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(issue_body(key, status, assignee)),
                ),
            Mock::given(method("POST"))
                .and(path(format!("/rest/api/2/issue/{id}/transitions")))
                .respond_with(ResponseTemplate::new(204)),
            Mock::given(method("PUT"))
                .and(path(format!("/rest/api/2/issue/{id}/assignee")))
                .respond_with(ResponseTemplate::new(204)),
        ],
    )
}

fn tracker_requests(sync_state: &SyncState) -> Result<Vec<Request>, SyncError> {
    let runtime = sync_state
        .runtime
        .get()
        .ok_or_else(|| harness_error("runtime not initialised"))?;
    sync_state
        .tracker
        .with_ref(|server| runtime.block_on(server.received_requests()))
        .flatten()
        .ok_or_else(|| harness_error("tracker request recording is disabled"))
}

fn request_bodies(
    sync_state: &SyncState,
    http_method: &str,
    request_path: &str,
) -> Result<Vec<Value>, SyncError> {
    tracker_requests(sync_state)?
        .iter()
        .filter(|request| {
            request.method.as_str() == http_method && request.url.path() == request_path
        })
        .map(|request| {
            request
                .body_json::<Value>()
                .map_err(|error| harness_error(format!("request body is not JSON: {error}")))
        })
        .collect()
}

fn run_pipeline(
    sync_state: &SyncState,
    action: &str,
    base: &str,
    merged: bool,
) -> Result<(), SyncError> {
    let runtime = ensure_servers(sync_state)?;
    let github_uri = sync_state
        .github
        .with_ref(MockServer::uri)
        .ok_or_else(|| harness_error("GitHub mock server missing"))?;
    let tracker_uri = sync_state
        .tracker
        .with_ref(MockServer::uri)
        .ok_or_else(|| harness_error("tracker mock server missing"))?;
    let api_base =
        Url::parse(&github_uri).map_err(|error| SyncError::InvalidUrl(error.to_string()))?;
    let tracker_url =
        Url::parse(&tracker_uri).map_err(|error| SyncError::InvalidUrl(error.to_string()))?;

    let event_dir = tempfile::tempdir()
        .map_err(|error| harness_error(format!("failed to create event directory: {error}")))?;
    let event_path = event_dir.path().join("event.json");
    std::fs::write(&event_path, event_payload(action, base, merged).to_string())
        .map_err(|error| harness_error(format!("failed to write event: {error}")))?;
    let event = PullRequestEvent::load(&event_path, &api_base)?;

    let result = runtime.block_on(async {
        let token = PersonalAccessToken::new("ghp_test")?;
        let commits = OctocrabCommitGateway::for_token(&token, &event.locator)?;
        let credentials = TrackerCredentials::new("bot@example.com", "jira-secret")?;
        let tracker = Arc::new(JiraClient::new(tracker_url, credentials)?);
        let extractor = TicketExtractor::new(&ProjectKey::new("SC")?)?;
        TicketSync::new(commits, tracker, extractor, TRANSITIONS)
            .run(&event)
            .await
    });

    match result {
        Ok(summary) => {
            drop(sync_state.error.take());
            sync_state.summary.set(summary);
        }
        Err(error) => {
            drop(sync_state.summary.take());
            sync_state.error.set(error);
        }
    }
    Ok(())
}

fn transitioned(sync_state: &SyncState) -> Result<Vec<TransitionResult>, SyncError> {
    match sync_state.summary.get() {
        Some(SyncSummary::Transitioned(report)) => Ok(report
            .outcomes
            .into_iter()
            .map(|outcome| outcome.result)
            .collect()),
        other => Err(harness_error(format!(
            "expected a transition batch, got {other:?} (error: {:?})",
            sync_state.error.get()
        ))),
    }
}

// Given steps

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[given("a GitHub pull request with commits {messages}")]
fn seed_commits(sync_state: &SyncState, messages: String) -> Result<(), SyncError> {
    let listed: Vec<&str> = messages.trim_matches('"').split("; ").collect();
    mount(
        sync_state,
        true,
        vec![
            Mock::given(method("GET"))
                .and(path(commits_path()))
                .respond_with(ResponseTemplate::new(200).set_body_json(commits_body(&listed))),
        ],
    )
}

#[given("the GitHub API rejects the token")]
fn seed_rejecting_github(sync_state: &SyncState) -> Result<(), SyncError> {
    mount(
        sync_state,
        true,
        vec![
            Mock::given(method("GET"))
                .and(path(commits_path()))
                .respond_with(
                    ResponseTemplate::new(401).set_body_json(json!({ "message": "Bad credentials" })),
                ),
        ],
    )
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[given("a tracker ticket {key} in status {status} assigned to {assignee}")]
fn seed_assigned_ticket(
    sync_state: &SyncState,
    key: String,
    status: String,
    assignee: String,
) -> Result<(), SyncError> {
    seed_ticket(
        sync_state,
        &key,
        status.trim_matches('"'),
        Some(assignee.as_str()),
    )
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[given("an unassigned tracker ticket {key} in status {status}")]
fn seed_unassigned_ticket(
    sync_state: &SyncState,
    key: String,
    status: String,
) -> Result<(), SyncError> {
    seed_ticket(sync_state, &key, status.trim_matches('"'), None)
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[given("the tracker rejects transitions for {key}")]
fn seed_rejected_transition(sync_state: &SyncState, key: String) -> Result<(), SyncError> {
    mount(
        sync_state,
        false,
        vec![
            Mock::given(method("POST"))
                .and(path(format!("/rest/api/2/issue/{}/transitions", issue_id(&key))))
                .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                    "errorMessages": ["Transition is not valid"]
                })))
                .with_priority(1),
        ],
    )
}

// When steps

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[when("the pull request is opened against {base}")]
fn open_pull_request(sync_state: &SyncState, base: String) -> Result<(), SyncError> {
    run_pipeline(sync_state, "opened", &base, false)
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[when("the pull request is merged into {base}")]
fn merge_pull_request(sync_state: &SyncState, base: String) -> Result<(), SyncError> {
    run_pipeline(sync_state, "closed", &base, true)
}

// Then steps

#[then("{count:usize} tickets were transitioned successfully")]
fn assert_succeeded(sync_state: &SyncState, count: usize) -> Result<(), SyncError> {
    let succeeded = transitioned(sync_state)?
        .iter()
        .filter(|result| **result == TransitionResult::Succeeded)
        .count();
    if succeeded == count {
        Ok(())
    } else {
        Err(harness_error(format!(
            "expected {count} successful transitions, found {succeeded}"
        )))
    }
}

#[then("{count:usize} transitions failed")]
fn assert_failed(sync_state: &SyncState, count: usize) -> Result<(), SyncError> {
    let failed = transitioned(sync_state)?
        .iter()
        .filter(|result| matches!(result, TransitionResult::Failed { .. }))
        .count();
    if failed == count {
        Ok(())
    } else {
        Err(harness_error(format!(
            "expected {count} failed transitions, found {failed}"
        )))
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[then("ticket {key} received transition {id:u64}")]
fn assert_transition(sync_state: &SyncState, key: String, id: u64) -> Result<(), SyncError> {
    let bodies = request_bodies(
        sync_state,
        "POST",
        &format!("/rest/api/2/issue/{}/transitions", issue_id(&key)),
    )?;
    if bodies == vec![json!({ "transition": { "id": id } })] {
        Ok(())
    } else {
        Err(harness_error(format!(
            "expected one transition {id} for {key}, got {bodies:?}"
        )))
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[then("ticket {key} was resolved by transition {id:u64} as {resolution}")]
fn assert_resolution(
    sync_state: &SyncState,
    key: String,
    id: u64,
    resolution: String,
) -> Result<(), SyncError> {
    let bodies = request_bodies(
        sync_state,
        "POST",
        &format!("/rest/api/2/issue/{}/transitions", issue_id(&key)),
    )?;
    let expected = json!({
        "transition": { "id": id },
        "fields": { "resolution": { "name": resolution.trim_matches('"') } }
    });
    if bodies == vec![expected] {
        Ok(())
    } else {
        Err(harness_error(format!(
            "expected resolution {resolution} for {key}, got {bodies:?}"
        )))
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[then("ticket {key} was reassigned to {assignee}")]
fn assert_reassigned(
    sync_state: &SyncState,
    key: String,
    assignee: String,
) -> Result<(), SyncError> {
    let bodies = request_bodies(
        sync_state,
        "PUT",
        &format!("/rest/api/2/issue/{}/assignee", issue_id(&key)),
    )?;
    if bodies == vec![json!({ "name": assignee })] {
        Ok(())
    } else {
        Err(harness_error(format!(
            "expected {key} to be reassigned to {assignee}, got {bodies:?}"
        )))
    }
}

#[then("the run stops with every ticket already in place")]
fn assert_already_in_place(sync_state: &SyncState) -> Result<(), SyncError> {
    match sync_state.summary.get() {
        Some(SyncSummary::AlreadyInTargetStatus(_)) => Ok(()),
        other => Err(harness_error(format!(
            "expected an already-in-place summary, got {other:?}"
        ))),
    }
}

#[then("the tracker received no transitions")]
fn assert_no_transitions(sync_state: &SyncState) -> Result<(), SyncError> {
    let posted = tracker_requests(sync_state)?
        .iter()
        .filter(|request| request.method.as_str() == "POST")
        .count();
    if posted == 0 {
        Ok(())
    } else {
        Err(harness_error(format!("expected no transitions, found {posted}")))
    }
}

#[then("the run fails with an authentication error")]
fn assert_authentication_error(sync_state: &SyncState) -> Result<(), SyncError> {
    match sync_state.error.get() {
        Some(SyncError::Authentication { .. }) => Ok(()),
        other => Err(harness_error(format!(
            "expected Authentication variant, got {other:?}"
        ))),
    }
}

#[scenario(path = "tests/features/ticket_sync.feature", index = 0)]
fn opening_starts_work(sync_state: SyncState) {
    let _ = sync_state;
}

#[scenario(path = "tests/features/ticket_sync.feature", index = 1)]
fn merging_resolves(sync_state: SyncState) {
    let _ = sync_state;
}

#[scenario(path = "tests/features/ticket_sync.feature", index = 2)]
fn rejected_transition_is_isolated(sync_state: SyncState) {
    let _ = sync_state;
}

#[scenario(path = "tests/features/ticket_sync.feature", index = 3)]
fn tickets_in_place_are_left_alone(sync_state: SyncState) {
    let _ = sync_state;
}

#[scenario(path = "tests/features/ticket_sync.feature", index = 4)]
fn github_rejects_token(sync_state: SyncState) {
    let _ = sync_state;
}
