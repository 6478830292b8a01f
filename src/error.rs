//! Error types shared by the event intake, GitHub, and tracker layers.

use thiserror::Error;

/// Errors surfaced while loading configuration or synchronising tickets.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    /// A required setting was not supplied by any configuration source.
    #[error("required setting `{name}` is missing")]
    MissingSetting {
        /// Name of the setting as it appears in configuration files.
        name: String,
    },

    /// Configuration was supplied but could not be used.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// A URL could not be parsed.
    #[error("URL is invalid: {0}")]
    InvalidUrl(String),

    /// The tracker project key is not a usable ticket prefix.
    #[error("project key `{key}` must be non-empty and alphanumeric")]
    InvalidProjectKey {
        /// The rejected key.
        key: String,
    },

    /// An authentication token or tracker credential was blank.
    #[error("authentication token is required")]
    MissingToken,

    /// The pull request event payload could not be read or understood.
    #[error("pull request event is invalid: {message}")]
    Event {
        /// Parsing or validation detail.
        message: String,
    },

    /// The pull request number is not a valid integer.
    #[error("pull request number must be a positive integer")]
    InvalidPullRequestNumber,

    /// A repository owner or name was empty.
    #[error("repository owner and name must not be empty")]
    MissingRepository,

    /// GitHub rejected the token.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// GitHub returned a non-authentication API error.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response detail from GitHub describing the failure.
        message: String,
    },

    /// Networking failed while calling GitHub or the tracker.
    #[error("network error: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// The tracker answered with a status outside the success range.
    #[error("{operation} failed with status {status}: {reason}")]
    Tracker {
        /// Tracker operation that failed (e.g. `getIssue`).
        operation: String,
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase for the status.
        reason: String,
    },

    /// A tracker response body could not be decoded.
    #[error("{operation} returned an undecodable body: {message}")]
    Decode {
        /// Tracker operation whose response failed to decode.
        operation: String,
        /// Decoder error detail.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}

impl SyncError {
    /// Returns the HTTP status for tracker failures.
    #[must_use]
    pub const fn tracker_status(&self) -> Option<u16> {
        match self {
            Self::Tracker { status, .. } => Some(*status),
            _ => None,
        }
    }
}
