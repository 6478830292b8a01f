//! Batch transition of eligible tickets with per-ticket failure isolation.
//!
//! Every ticket is transitioned concurrently. A failed transition is logged
//! and recorded in the [`BatchReport`]; it never stops sibling tickets.
//! Reassignment after a successful move to `In Progress` runs as a detached
//! task whose output is `()`: its outcome is logged inside the task and can
//! not flow into the report. The batch still waits for those tasks to settle
//! before returning so that no request outlives the invocation.

use std::sync::Arc;

use futures::future::join_all;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::jira::gateway::TrackerGateway;
use crate::jira::models::TransitionRequest;

use super::eligibility::Ticket;
use super::status::{TargetStatus, TransitionIds};

/// Default resolution attached when resolving tickets.
pub const DEFAULT_RESOLUTION_NAME: &str = "Done";

/// Outcome of one ticket's transition call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionResult {
    /// The tracker accepted the transition.
    Succeeded,
    /// The tracker rejected the transition or could not be reached.
    Failed {
        /// Failure description.
        reason: String,
    },
}

/// Per-ticket entry of a [`BatchReport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionOutcome {
    /// Ticket key.
    pub key: String,
    /// Status the ticket was in before the attempt.
    pub from_status: String,
    /// What happened.
    pub result: TransitionResult,
}

/// Transition outcomes of one batch, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// Status the batch moved tickets into.
    pub target: TargetStatus,
    /// One entry per attempted ticket.
    pub outcomes: Vec<TransitionOutcome>,
}

impl BatchReport {
    /// Number of tickets the tracker transitioned.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.result == TransitionResult::Succeeded)
            .count()
    }

    /// Number of tickets whose transition failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Tickets whose current status differs from `target`.
#[must_use]
pub fn needs_transition(tickets: &[Ticket], target: TargetStatus) -> Vec<Ticket> {
    tickets
        .iter()
        .filter(|ticket| ticket.status != target.name())
        .cloned()
        .collect()
}

/// Reassignment running detached from the batch result.
struct Reassignment {
    key: String,
    handle: JoinHandle<()>,
}

/// Drives tracker transitions for a batch of tickets.
pub struct TransitionDriver<G: ?Sized> {
    tracker: Arc<G>,
    transitions: TransitionIds,
    resolution_name: String,
}

impl<G> TransitionDriver<G>
where
    G: TrackerGateway + ?Sized + 'static,
{
    /// Creates a driver using the given transition identifiers.
    #[must_use]
    pub fn new(tracker: Arc<G>, transitions: TransitionIds) -> Self {
        Self {
            tracker,
            transitions,
            resolution_name: DEFAULT_RESOLUTION_NAME.to_owned(),
        }
    }

    /// Overrides the resolution attached to terminal transitions.
    #[must_use]
    pub fn with_resolution_name(self, resolution_name: impl Into<String>) -> Self {
        Self {
            resolution_name: resolution_name.into(),
            ..self
        }
    }

    /// Transition request for `target`.
    #[must_use]
    pub fn request_for(&self, target: TargetStatus) -> TransitionRequest {
        let request = TransitionRequest::new(self.transitions.for_status(target));
        if target.is_terminal() {
            request.with_resolution(self.resolution_name.as_str())
        } else {
            request
        }
    }

    /// Transitions every ticket not already in `target`.
    ///
    /// Completes once every transition and every reassignment has settled,
    /// whatever their individual outcomes.
    pub async fn run(&self, tickets: &[Ticket], target: TargetStatus) -> BatchReport {
        let pending = needs_transition(tickets, target);
        info!("Start transitioning {} tracker tickets...", pending.len());

        let request = self.request_for(target);
        let settled = join_all(
            pending
                .iter()
                .map(|ticket| self.transition_one(ticket, target, &request)),
        )
        .await;
        let (outcomes, reassignments): (Vec<_>, Vec<_>) = settled.into_iter().unzip();

        settle_reassignments(reassignments.into_iter().flatten().collect()).await;

        BatchReport { target, outcomes }
    }

    async fn transition_one(
        &self,
        ticket: &Ticket,
        target: TargetStatus,
        request: &TransitionRequest,
    ) -> (TransitionOutcome, Option<Reassignment>) {
        let result = self.tracker.transition_issue(&ticket.id, request).await;
        let outcome = |result| TransitionOutcome {
            key: ticket.key.clone(),
            from_status: ticket.status.clone(),
            result,
        };

        match result {
            Ok(()) => {
                info!(
                    "   - {} transition from status \"{}\" to \"{target}\" SUCCESSFUL",
                    ticket.key, ticket.status
                );
                let reassignment = match (target, ticket.assignee.as_deref()) {
                    (TargetStatus::InProgress, Some(assignee)) => {
                        Some(self.spawn_reassignment(ticket, assignee))
                    }
                    _ => None,
                };
                (outcome(TransitionResult::Succeeded), reassignment)
            }
            Err(error) => {
                warn!(
                    "   - {} transition from status \"{}\" to \"{target}\" FAILED: {error}",
                    ticket.key, ticket.status
                );
                let reason = error.to_string();
                (outcome(TransitionResult::Failed { reason }), None)
            }
        }
    }

    fn spawn_reassignment(&self, ticket: &Ticket, assignee: &str) -> Reassignment {
        let tracker = Arc::clone(&self.tracker);
        let id = ticket.id.clone();
        let key = ticket.key.clone();
        let name = assignee.to_owned();
        let task_key = key.clone();
        let handle = tokio::spawn(async move {
            match tracker.assign_issue(&id, &name).await {
                Ok(()) => info!("   - {task_key} re-assign to \"{name}\" SUCCESSFUL"),
                Err(error) => warn!("   - {task_key} re-assign to \"{name}\" FAILED: {error}"),
            }
        });
        Reassignment { key, handle }
    }
}

async fn settle_reassignments(reassignments: Vec<Reassignment>) {
    let (keys, handles): (Vec<_>, Vec<_>) = reassignments
        .into_iter()
        .map(|reassignment| (reassignment.key, reassignment.handle))
        .unzip();
    for (key, joined) in keys.iter().zip(join_all(handles).await) {
        if let Err(error) = joined {
            warn!("   - {key} re-assign task did not complete: {error}");
        }
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
