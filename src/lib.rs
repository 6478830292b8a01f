//! Ticketsync library crate keeping tracker tickets in step with pull requests.
//!
//! A pull request event decides the status its tickets should reach. The
//! library lists the pull request commits through Octocrab, extracts ticket
//! references from commit messages and the title, and moves every eligible
//! ticket through the tracker's REST API, logging per-ticket outcomes.

pub mod config;
pub mod error;
pub mod github;
pub mod jira;
pub mod sync;
pub mod workflow;

pub use config::{SyncSettings, TicketSyncConfig};
pub use error::SyncError;
pub use github::{
    CommitGateway, OctocrabCommitGateway, PersonalAccessToken, PullRequestEvent,
    PullRequestLocator,
};
pub use jira::{JiraClient, TrackerCredentials, TrackerGateway};
pub use sync::{SyncSummary, TicketExtractor, TicketSync};
