//! Per-event pipeline: status, references, eligibility, transitions.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::SyncError;
use crate::github::event::PullRequestEvent;
use crate::github::gateway::CommitGateway;
use crate::jira::gateway::TrackerGateway;

use super::driver::{BatchReport, TransitionDriver, needs_transition};
use super::eligibility::filter_eligible;
use super::extract::TicketExtractor;
use super::status::{SyncPolicy, TargetStatus, TransitionIds, resolve_target_status};

/// Where a run stopped, or what the batch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncSummary {
    /// The event does not map onto a target status.
    NoTargetStatus,
    /// Neither the commits nor the title reference a ticket.
    NoTicketReferences,
    /// Every referenced ticket is missing or has sub-tasks.
    NoEligibleTickets,
    /// Every eligible ticket already has the target status.
    AlreadyInTargetStatus(TargetStatus),
    /// Transitions were attempted.
    Transitioned(BatchReport),
}

/// Synchronises tracker tickets with one pull request event.
pub struct TicketSync<C, T: ?Sized> {
    commits: C,
    tracker: Arc<T>,
    extractor: TicketExtractor,
    policy: SyncPolicy,
    driver: TransitionDriver<T>,
}

impl<C, T> TicketSync<C, T>
where
    C: CommitGateway,
    T: TrackerGateway + ?Sized + 'static,
{
    /// Wires the gateways with the default policy and resolution.
    #[must_use]
    pub fn new(
        commits: C,
        tracker: Arc<T>,
        extractor: TicketExtractor,
        transitions: TransitionIds,
    ) -> Self {
        Self {
            commits,
            driver: TransitionDriver::new(Arc::clone(&tracker), transitions),
            tracker,
            extractor,
            policy: SyncPolicy::default(),
        }
    }

    /// Replaces the shared-branch and mainline conventions.
    #[must_use]
    pub fn with_policy(self, policy: SyncPolicy) -> Self {
        Self { policy, ..self }
    }

    /// Replaces the resolution attached to resolved tickets.
    #[must_use]
    pub fn with_resolution_name(self, resolution_name: impl Into<String>) -> Self {
        Self {
            driver: self.driver.with_resolution_name(resolution_name),
            ..self
        }
    }

    /// Runs the pipeline for `event`.
    ///
    /// Per-ticket transition failures are logged and reported in the
    /// summary; they never make the run fail.
    ///
    /// # Errors
    ///
    /// Returns the first failure listing commits or fetching tickets.
    pub async fn run(&self, event: &PullRequestEvent) -> Result<SyncSummary, SyncError> {
        info!("Received action: {}", event.action.as_str());

        let Some(target) = resolve_target_status(event, &self.policy) else {
            info!("No new status to set.");
            return Ok(SyncSummary::NoTargetStatus);
        };
        info!("Target status: {target}");

        let commits = self.commits.list_commits(&event.locator).await?;
        info!("Pull request {} has {} commits", event.locator, commits.len());
        for commit in &commits {
            debug!(sha = %commit.sha, "Commit message: {:?}", commit.message);
        }

        let references = self.extractor.extract(
            commits.iter().map(|commit| commit.message.as_str()),
            &event.title,
        );
        if references.is_empty() {
            info!("No tickets to update.");
            return Ok(SyncSummary::NoTicketReferences);
        }
        info!("Tickets found: {}", references.join(", "));

        let eligible = filter_eligible(self.tracker.as_ref(), &references).await?;
        if eligible.is_empty() {
            info!("No eligible tickets to update.");
            return Ok(SyncSummary::NoEligibleTickets);
        }

        let pending = needs_transition(&eligible, target);
        if pending.is_empty() {
            info!("All tickets are already \"{target}\".");
            return Ok(SyncSummary::AlreadyInTargetStatus(target));
        }

        let report = self.driver.run(&pending, target).await;
        info!(
            "Transitioned {} of {} tickets to \"{target}\"",
            report.succeeded(),
            report.outcomes.len()
        );
        Ok(SyncSummary::Transitioned(report))
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
