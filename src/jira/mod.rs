//! Issue tracker: the API trait and the dual-backend client.

pub mod api;
pub mod client;

pub use api::{IssueUpdate, JiraApi, NewIssue};
pub use client::JiraClient;
