//! Fetches referenced tickets and keeps those that may be transitioned.

use futures::future::join_all;
use tracing::info;

use crate::error::SyncError;
use crate::jira::gateway::{IssueLookup, TrackerGateway};
use crate::jira::models::{Issue, IssueQuery};

const TICKET_FIELDS: [&str; 3] = ["assignee", "status", "subtasks"];

/// Reduced view of a tracker issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    /// Numeric issue identifier used by the update endpoints.
    pub id: String,
    /// Project-prefixed key, for logging.
    pub key: String,
    /// Current status name.
    pub status: String,
    /// Login of the current assignee, if any.
    pub assignee: Option<String>,
    /// Number of sub-tasks.
    pub subtask_count: usize,
}

impl From<Issue> for Ticket {
    fn from(issue: Issue) -> Self {
        let subtask_count = issue.fields.subtask_count();
        Self {
            id: issue.id,
            key: issue.key,
            status: issue
                .fields
                .status
                .map(|status| status.name)
                .unwrap_or_default(),
            assignee: issue
                .fields
                .assignee
                .and_then(|user| user.name)
                .filter(|name| !name.trim().is_empty()),
            subtask_count,
        }
    }
}

/// Fetches every referenced ticket concurrently and drops missing tickets and
/// tickets with sub-tasks.
///
/// All fetches run to completion before any failure is reported; ordering of
/// the result follows the input references.
///
/// # Errors
///
/// Returns the first tracker failure other than "not found".
pub async fn filter_eligible<G>(tracker: &G, references: &[String]) -> Result<Vec<Ticket>, SyncError>
where
    G: TrackerGateway + ?Sized,
{
    info!("Fetch tracker ticket details...");
    let query = IssueQuery::fields(TICKET_FIELDS);
    let lookups = join_all(
        references
            .iter()
            .map(|reference| tracker.get_issue(reference, &query)),
    )
    .await;

    let mut found = Vec::with_capacity(lookups.len());
    for lookup in lookups {
        if let IssueLookup::Found(issue) = lookup? {
            found.push(Ticket::from(issue));
        }
    }
    let fetched = found.len();

    let eligible: Vec<Ticket> = found
        .into_iter()
        .filter(|ticket| ticket.subtask_count == 0)
        .collect();

    info!(
        "Fetch tickets details: {fetched} tickets found, and {} without subtasks",
        eligible.len()
    );
    info!(
        "Tickets without sub-tasks: {}",
        eligible
            .iter()
            .map(|ticket| format!("{} [{}]", ticket.key, ticket.status))
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(eligible)
}
