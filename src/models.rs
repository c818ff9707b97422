//! Canonical entities every backend response is normalized into.
//!
//! These are plain value objects: they are built fresh for each response and
//! carry no identity beyond their `id`/`key` fields. Optional fields that the
//! backend omitted are `None`; `Issue::labels` is always a (possibly empty)
//! list.

use serde::Serialize;

/// A content page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContentPage {
  pub id: String,
  pub title: String,
  /// Body in storage format.
  pub content: Option<String>,
  pub space_key: Option<String>,
  pub space_name: Option<String>,
  /// Publication status such as `"current"` or `"draft"`.
  pub status: Option<String>,
  pub version: Option<u64>,
  pub created: Option<String>,
  pub updated: Option<String>,
  pub created_by: Option<String>,
  pub updated_by: Option<String>,
  pub url: Option<String>,
}

/// A content space (the container pages live in).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContentSpace {
  pub key: String,
  pub name: String,
  pub description: Option<String>,
  #[serde(rename = "type")]
  pub space_type: Option<String>,
  pub url: Option<String>,
}

/// A comment on a content page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContentComment {
  pub id: String,
  pub content: String,
  pub author: String,
  pub created: String,
  pub updated: Option<String>,
}

/// An issue in the tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Issue {
  pub id: String,
  /// Human-readable key such as `PROJ-123`.
  pub key: String,
  pub summary: String,
  /// Plain-text description.
  pub description: Option<String>,
  pub status: Option<String>,
  pub assignee: Option<String>,
  pub reporter: Option<String>,
  pub created: Option<String>,
  pub updated: Option<String>,
  pub priority: Option<String>,
  pub issue_type: Option<String>,
  /// Key of the owning project.
  pub project: Option<String>,
  pub labels: Vec<String>,
}

/// A comment on an issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IssueComment {
  pub id: String,
  pub author: String,
  pub body: String,
  pub created: String,
  pub updated: Option<String>,
}

/// An issue-tracker project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Project {
  pub id: String,
  pub key: String,
  pub name: String,
  pub description: Option<String>,
  pub lead: Option<String>,
}

/// A workflow transition available on an issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Transition {
  pub id: String,
  pub name: String,
  /// Name of the status the issue ends up in.
  pub to_status: String,
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult<T> {
  pub results: Vec<T>,
  /// Offset of the first result.
  pub start: u64,
  /// Page size requested (or reported by the server).
  pub limit: u64,
  /// Total reported by the server, or the number of results observed.
  pub size: u64,
}
