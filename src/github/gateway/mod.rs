//! Gateways for listing pull request commits through Octocrab.
//!
//! The trait-based seam lets the synchroniser be tested with mocks while the
//! Octocrab implementation handles real HTTP requests.

mod commits;
mod error_mapping;

pub use commits::OctocrabCommitGateway;

use async_trait::async_trait;

use crate::error::SyncError;
use crate::github::locator::PullRequestLocator;
use crate::github::models::PullRequestCommit;

/// Gateway that can list the commits of a pull request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommitGateway: Send + Sync {
    /// Fetch every commit of the pull request, oldest first.
    async fn list_commits(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<Vec<PullRequestCommit>, SyncError>;
}
