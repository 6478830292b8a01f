//! Wire models for the tracker REST API (version 2).

use serde::{Deserialize, Serialize};

/// Issue as returned by `GET /rest/api/2/issue/{key}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Issue {
    /// Numeric issue identifier, as a string.
    pub id: String,
    /// Project-prefixed key such as `SC-42`.
    pub key: String,
    /// Requested issue fields.
    #[serde(default)]
    pub fields: IssueFields,
}

/// Subset of issue fields the synchroniser reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IssueFields {
    /// Current workflow status.
    pub status: Option<IssueStatus>,
    /// Current assignee, absent when unassigned.
    pub assignee: Option<IssueUser>,
    /// Sub-tasks of the issue; `null` decodes as none.
    pub subtasks: Option<Vec<serde_json::Value>>,
}

impl IssueFields {
    /// Number of sub-tasks, zero when the tracker sent none.
    #[must_use]
    pub fn subtask_count(&self) -> usize {
        self.subtasks.as_ref().map_or(0, Vec::len)
    }
}

/// Workflow status of an issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IssueStatus {
    /// Status display name, e.g. `In Progress`.
    #[serde(default)]
    pub name: String,
}

/// Tracker user reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IssueUser {
    /// Login name used by the assignee endpoint.
    #[serde(default)]
    pub name: Option<String>,
}

/// Field and expansion selection for issue fetches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueQuery {
    /// Fields to return; empty means the tracker default.
    pub fields: Vec<String>,
    /// Entities to expand; empty means none.
    pub expand: Vec<String>,
}

impl IssueQuery {
    /// Query restricted to the given fields.
    #[must_use]
    pub fn fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            expand: Vec::new(),
        }
    }
}

/// Transition offered by the tracker for an issue.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AvailableTransition {
    /// Transition identifier.
    pub id: String,
    /// Transition display name.
    pub name: String,
    /// Status reached by the transition.
    #[serde(default)]
    pub to: Option<IssueStatus>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TransitionsResponse {
    #[serde(default)]
    pub(super) transitions: Vec<AvailableTransition>,
}

/// Body of `POST /rest/api/2/issue/{key}/transitions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionRequest {
    transition: TransitionReference,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<TransitionFields>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct TransitionReference {
    id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct TransitionFields {
    resolution: Resolution,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct Resolution {
    name: String,
}

impl TransitionRequest {
    /// Executes the transition with the given identifier.
    #[must_use]
    pub const fn new(transition_id: u64) -> Self {
        Self {
            transition: TransitionReference { id: transition_id },
            fields: None,
        }
    }

    /// Also sets the issue resolution, as terminal transitions require.
    #[must_use]
    pub fn with_resolution(self, name: impl Into<String>) -> Self {
        Self {
            fields: Some(TransitionFields {
                resolution: Resolution { name: name.into() },
            }),
            ..self
        }
    }

    /// Identifier of the transition to execute.
    #[must_use]
    pub const fn transition_id(&self) -> u64 {
        self.transition.id
    }

    /// Resolution name attached to the transition, if any.
    #[must_use]
    pub fn resolution(&self) -> Option<&str> {
        self.fields
            .as_ref()
            .map(|fields| fields.resolution.name.as_str())
    }
}

#[derive(Debug, Serialize)]
pub(super) struct AssigneeRequest<'a> {
    pub(super) name: &'a str,
}
