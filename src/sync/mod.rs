//! Ticket synchronisation core.
//!
//! A run resolves the status an event implies, collects the ticket
//! references of the pull request, keeps the tickets that may be moved and
//! transitions those not already in place. [`TicketSync`] composes the
//! stages; each stage is usable on its own.

pub mod driver;
pub mod eligibility;
pub mod extract;
pub mod orchestrator;
pub mod status;

#[cfg(test)]
mod test_support;

pub use driver::{
    BatchReport, DEFAULT_RESOLUTION_NAME, TransitionDriver, TransitionOutcome, TransitionResult,
    needs_transition,
};
pub use eligibility::{Ticket, filter_eligible};
pub use extract::{ProjectKey, TicketExtractor};
pub use orchestrator::{SyncSummary, TicketSync};
pub use status::{
    DEFAULT_MAINLINE_BRANCH, DEFAULT_SHARED_BRANCH_LABEL, SyncPolicy, TargetStatus, TransitionIds,
    resolve_target_status,
};
