//! reqwest implementation of the tracker gateway.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::SyncError;

use super::gateway::{IssueLookup, TrackerGateway};
use super::models::{
    AssigneeRequest, AvailableTransition, Issue, IssueQuery, TransitionRequest,
    TransitionsResponse,
};

const JSON_MEDIA_TYPE: &str = "application/json";
const ISSUE_API_PATH: [&str; 4] = ["rest", "api", "2", "issue"];

/// Login and API token pair sent as HTTP basic credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct TrackerCredentials {
    login: String,
    token: String,
}

impl TrackerCredentials {
    /// Validates that both halves are present.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MissingToken`] when either value is blank.
    pub fn new(login: impl AsRef<str>, token: impl AsRef<str>) -> Result<Self, SyncError> {
        let trimmed_login = login.as_ref().trim();
        let trimmed_token = token.as_ref().trim();
        if trimmed_login.is_empty() || trimmed_token.is_empty() {
            return Err(SyncError::MissingToken);
        }
        Ok(Self {
            login: trimmed_login.to_owned(),
            token: trimmed_token.to_owned(),
        })
    }

    /// Login half of the credentials.
    #[must_use]
    pub const fn login(&self) -> &str {
        self.login.as_str()
    }
}

impl std::fmt::Debug for TrackerCredentials {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("TrackerCredentials")
            .field("login", &self.login)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Stateless tracker client; every call is an independent request.
#[derive(Debug, Clone)]
pub struct JiraClient {
    base_url: Url,
    credentials: TrackerCredentials,
    http: Client,
}

impl JiraClient {
    /// Creates a client for the tracker rooted at `base_url`.
    ///
    /// The base URL may carry a context path such as `https://host/jira`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidUrl`] when the base URL cannot hold a path
    /// and [`SyncError::Configuration`] when the HTTP client cannot be built.
    pub fn new(base_url: Url, credentials: TrackerCredentials) -> Result<Self, SyncError> {
        if base_url.cannot_be_a_base() {
            return Err(SyncError::InvalidUrl(format!(
                "{base_url}: tracker URL must be hierarchical"
            )));
        }
        let http = Client::builder()
            .build()
            .map_err(|error| SyncError::Configuration {
                message: format!("failed to configure tracker HTTP client: {error}"),
            })?;
        Ok(Self {
            base_url,
            credentials,
            http,
        })
    }

    fn issue_url(&self, key: &str, tail: &[&str]) -> Result<Url, SyncError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| SyncError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(ISSUE_API_PATH)
            .push(key)
            .extend(tail);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .basic_auth(&self.credentials.login, Some(&self.credentials.token))
            .header(CONTENT_TYPE, JSON_MEDIA_TYPE)
            .header(ACCEPT, JSON_MEDIA_TYPE)
    }

    /// Sends the request and returns the decoded body.
    ///
    /// Yields `None` for an empty body or one not declared as JSON; any 2xx
    /// answer counts as success.
    async fn execute<T: DeserializeOwned>(
        operation: &str,
        request: RequestBuilder,
    ) -> Result<Option<T>, SyncError> {
        let response = request.send().await.map_err(|error| SyncError::Network {
            message: format!("{operation} request failed: {error}"),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(operation, status));
        }

        if !is_json(response.headers()) {
            return Ok(None);
        }
        let body = response.text().await.map_err(|error| SyncError::Network {
            message: format!("{operation} response could not be read: {error}"),
        })?;
        decode_body(operation, &body)
    }
}

fn status_error(operation: &str, status: StatusCode) -> SyncError {
    SyncError::Tracker {
        operation: operation.to_owned(),
        status: status.as_u16(),
        reason: status
            .canonical_reason()
            .unwrap_or("unknown status")
            .to_owned(),
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.to_ascii_lowercase().contains(JSON_MEDIA_TYPE))
}

fn decode_body<T: DeserializeOwned>(operation: &str, body: &str) -> Result<Option<T>, SyncError> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(body)
        .map(Some)
        .map_err(|error| SyncError::Decode {
            operation: operation.to_owned(),
            message: error.to_string(),
        })
}

fn missing_body(operation: &str) -> SyncError {
    SyncError::Decode {
        operation: operation.to_owned(),
        message: "response carried no JSON body".to_owned(),
    }
}

#[async_trait]
impl TrackerGateway for JiraClient {
    async fn get_issue(&self, key: &str, query: &IssueQuery) -> Result<IssueLookup, SyncError> {
        let mut url = self.issue_url(key, &[])?;
        if !query.fields.is_empty() {
            url.query_pairs_mut()
                .append_pair("fields", &query.fields.join(","));
        }
        if !query.expand.is_empty() {
            url.query_pairs_mut()
                .append_pair("expand", &query.expand.join(","));
        }

        match Self::execute::<Issue>("getIssue", self.request(Method::GET, url)).await {
            Ok(Some(issue)) => Ok(IssueLookup::Found(issue)),
            Ok(None) => Err(missing_body("getIssue")),
            Err(error) if error.tracker_status() == Some(StatusCode::NOT_FOUND.as_u16()) => {
                Ok(IssueLookup::NotFound)
            }
            Err(error) => Err(error),
        }
    }

    async fn get_issue_transitions(
        &self,
        key: &str,
    ) -> Result<Vec<AvailableTransition>, SyncError> {
        let url = self.issue_url(key, &["transitions"])?;
        let response: Option<TransitionsResponse> =
            Self::execute("getIssueTransitions", self.request(Method::GET, url)).await?;
        Ok(response
            .map(|payload| payload.transitions)
            .unwrap_or_default())
    }

    async fn transition_issue(
        &self,
        key: &str,
        request: &TransitionRequest,
    ) -> Result<(), SyncError> {
        let url = self.issue_url(key, &["transitions"])?;
        let builder = self.request(Method::POST, url).json(request);
        Self::execute::<serde_json::Value>("transitionIssue", builder).await?;
        Ok(())
    }

    async fn assign_issue(&self, key: &str, assignee: &str) -> Result<(), SyncError> {
        let url = self.issue_url(key, &["assignee"])?;
        let builder = self
            .request(Method::PUT, url)
            .json(&AssigneeRequest { name: assignee });
        Self::execute::<serde_json::Value>("assignIssue", builder).await?;
        Ok(())
    }
}
