//! Trait definitions for the issue tracker.

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Issue, IssueComment, Project, SearchResult, Transition};

/// Fields for a new issue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewIssue {
  pub project_key: String,
  pub summary: String,
  pub description: Option<String>,
  /// Issue type name; `Task` when absent.
  pub issue_type: Option<String>,
  pub priority: Option<String>,
  pub assignee: Option<String>,
  pub labels: Vec<String>,
}

/// Partial update of an issue. Empty fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueUpdate {
  pub summary: Option<String>,
  pub description: Option<String>,
  pub assignee: Option<String>,
  pub priority: Option<String>,
  pub labels: Vec<String>,
}

/// Issue-tracker operations, independent of the backend schema.
#[async_trait]
pub trait JiraApi: Send + Sync {
  async fn get_issue(&self, issue_key: &str) -> Result<Issue>;

  /// Search issues. The custom API only understands `project`, `status` and
  /// `assignee` equality filters extracted from `query`.
  async fn search_issues(&self, query: &str, limit: Option<usize>, start: usize) -> Result<SearchResult<Issue>>;

  /// Create an issue and return it as stored by the server.
  async fn create_issue(&self, issue: &NewIssue) -> Result<Issue>;

  async fn update_issue(&self, issue_key: &str, update: &IssueUpdate) -> Result<()>;

  async fn add_comment(&self, issue_key: &str, comment: &str) -> Result<IssueComment>;

  async fn get_comments(&self, issue_key: &str) -> Result<Vec<IssueComment>>;

  async fn get_projects(&self) -> Result<Vec<Project>>;

  async fn get_transitions(&self, issue_key: &str) -> Result<Vec<Transition>>;

  async fn transition_issue(&self, issue_key: &str, transition_id: &str) -> Result<()>;
}
