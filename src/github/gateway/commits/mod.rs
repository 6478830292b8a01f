//! Octocrab implementation of the commit gateway.

use async_trait::async_trait;
use octocrab::{Octocrab, Page};

use crate::error::SyncError;
use crate::github::locator::{PersonalAccessToken, PullRequestLocator};
use crate::github::models::{ApiCommit, PullRequestCommit};

use super::CommitGateway;
use super::error_mapping::map_octocrab_error;

/// GitHub's maximum page size for the pull request commits endpoint.
const COMMITS_PER_PAGE: &str = "100";

/// Octocrab-backed commit gateway.
pub struct OctocrabCommitGateway {
    client: Octocrab,
}

impl OctocrabCommitGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Authenticates with `token` against the API base the locator names.
    ///
    /// Must be called inside a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::InvalidUrl` when the API base is not a valid URI
    /// and the mapped Octocrab error when the client cannot be built.
    pub fn for_token(
        token: &PersonalAccessToken,
        locator: &PullRequestLocator,
    ) -> Result<Self, SyncError> {
        let api_base = locator.api_base().as_str();
        let client = Octocrab::builder()
            .personal_token(token.value())
            .base_uri(api_base)
            .map_err(|error| SyncError::InvalidUrl(format!("{api_base}: {error}")))?
            .build()
            .map_err(|error| map_octocrab_error("configure GitHub client", &error))?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl CommitGateway for OctocrabCommitGateway {
    async fn list_commits(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<Vec<PullRequestCommit>, SyncError> {
        let query_params = [("per_page", COMMITS_PER_PAGE)];
        let first_page = self
            .client
            .get::<Page<ApiCommit>, _, _>(locator.commits_path(), Some(&query_params))
            .await
            .map_err(|error| map_octocrab_error("list commits", &error))?;

        self.client
            .all_pages(first_page)
            .await
            .map(|commits| commits.into_iter().map(ApiCommit::into).collect())
            .map_err(|error| map_octocrab_error("list commits", &error))
    }
}
