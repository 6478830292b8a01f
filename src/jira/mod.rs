//! Issue tracker access over the REST API version 2.
//!
//! [`JiraClient`] is a thin reqwest wrapper exposing the four verbs the
//! synchroniser needs. Callers depend on the [`TrackerGateway`] trait so the
//! batch workflow can be exercised against mocks.

pub mod client;
pub mod gateway;
pub mod models;

pub use client::{JiraClient, TrackerCredentials};
pub use gateway::{IssueLookup, TrackerGateway};
pub use models::{AvailableTransition, Issue, IssueFields, IssueQuery, IssueStatus, IssueUser, TransitionRequest};

#[cfg(test)]
pub use gateway::MockTrackerGateway;
