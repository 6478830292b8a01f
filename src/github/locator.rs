//! Identity wrappers locating the pull request whose commits are scanned.

use std::fmt;

use url::Url;

use crate::error::SyncError;

/// Public GitHub REST API endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

fn non_blank(value: &str) -> Result<String, SyncError> {
    if value.trim().is_empty() {
        return Err(SyncError::MissingRepository);
    }
    Ok(value.to_owned())
}

/// Login of the user or organisation owning the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    /// # Errors
    ///
    /// Returns [`SyncError::MissingRepository`] when the login is blank.
    pub fn new(value: &str) -> Result<Self, SyncError> {
        non_blank(value).map(Self)
    }

    /// Borrow the login.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name, without the owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// # Errors
    ///
    /// Returns [`SyncError::MissingRepository`] when the name is blank.
    pub fn new(value: &str) -> Result<Self, SyncError> {
        non_blank(value).map(Self)
    }

    /// Borrow the name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Positive pull request number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullRequestNumber(u64);

impl PullRequestNumber {
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidPullRequestNumber`] for zero.
    pub const fn new(value: u64) -> Result<Self, SyncError> {
        match value {
            0 => Err(SyncError::InvalidPullRequestNumber),
            number => Ok(Self(number)),
        }
    }

    /// Numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Token sent to GitHub, trimmed and known to be non-blank.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// # Errors
    ///
    /// Returns [`SyncError::MissingToken`] when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, SyncError> {
        match token.as_ref().trim() {
            "" => Err(SyncError::MissingToken),
            trimmed => Ok(Self(trimmed.to_owned())),
        }
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PersonalAccessToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("PersonalAccessToken(<redacted>)")
    }
}

/// Parses a GitHub REST API base URL such as `https://ghe.example.com/api/v3`.
///
/// # Errors
///
/// Returns [`SyncError::InvalidUrl`] when the value is not a hierarchical
/// absolute URL.
pub fn parse_api_base(input: &str) -> Result<Url, SyncError> {
    let parsed = Url::parse(input.trim())
        .map_err(|error| SyncError::InvalidUrl(format!("{input}: {error}")))?;
    if parsed.cannot_be_a_base() {
        return Err(SyncError::InvalidUrl(format!(
            "{input}: API base must be a hierarchical URL"
        )));
    }
    Ok(parsed)
}

/// API base, repository, and number identifying one pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestLocator {
    api_base: Url,
    owner: RepositoryOwner,
    repository: RepositoryName,
    number: PullRequestNumber,
}

impl PullRequestLocator {
    /// Creates a locator from already validated parts.
    #[must_use]
    pub const fn new(
        api_base: Url,
        owner: RepositoryOwner,
        repository: RepositoryName,
        number: PullRequestNumber,
    ) -> Self {
        Self {
            api_base,
            owner,
            repository,
            number,
        }
    }

    /// API base URL used for requests.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Pull request number.
    #[must_use]
    pub const fn number(&self) -> PullRequestNumber {
        self.number
    }

    /// Path of the commits listing, relative to the API base.
    pub(crate) fn commits_path(&self) -> String {
        format!("/repos/{self:#}/commits")
    }
}

impl fmt::Display for PullRequestLocator {
    /// `owner/repo#7`, or `owner/repo/pulls/7` with the alternate flag.
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = if formatter.alternate() { "/pulls/" } else { "#" };
        write!(
            formatter,
            "{}/{}{separator}{}",
            self.owner.as_str(),
            self.repository.as_str(),
            self.number.get()
        )
    }
}
