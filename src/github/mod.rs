//! GitHub side of the synchroniser: event intake and commit listing.
//!
//! This module decodes the pull request event delivered by the Actions
//! runner and wraps Octocrab to list the commits of that pull request.
//! Octocrab failures are mapped into [`SyncError`](crate::SyncError)
//! variants so callers never see Octocrab internals.

pub mod event;
pub mod gateway;
pub mod locator;
pub mod models;

pub use event::{PullRequestAction, PullRequestEvent, ReviewState};
pub use gateway::{CommitGateway, OctocrabCommitGateway};
pub use locator::{
    DEFAULT_API_BASE, PersonalAccessToken, PullRequestLocator, PullRequestNumber, RepositoryName,
    RepositoryOwner, parse_api_base,
};
pub use models::PullRequestCommit;

#[cfg(test)]
pub use gateway::MockCommitGateway;
