//! Issue-tracker tools.

use std::sync::Arc;

use anyhow::{Result, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{ToolDefinition, ToolSet, count_arg, optional_count_arg, parse_args, render};
use crate::jira::{IssueUpdate, JiraApi, NewIssue};
use crate::models::{Issue, SearchResult};

#[derive(Debug, Deserialize)]
struct IssueKeyArgs {
  issue_key: String,
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
  jql: String,
  #[serde(default, deserialize_with = "optional_count_arg")]
  max_results: Option<usize>,
  #[serde(default, deserialize_with = "count_arg")]
  start_at: usize,
}

#[derive(Debug, Deserialize)]
struct CreateIssueArgs {
  project_key: String,
  summary: String,
  #[serde(default)]
  description: Option<String>,
  #[serde(default)]
  issue_type: Option<String>,
  #[serde(default)]
  priority: Option<String>,
  #[serde(default)]
  assignee: Option<String>,
  #[serde(default)]
  labels: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct UpdateIssueArgs {
  issue_key: String,
  #[serde(default)]
  summary: Option<String>,
  #[serde(default)]
  description: Option<String>,
  #[serde(default)]
  assignee: Option<String>,
  #[serde(default)]
  priority: Option<String>,
  #[serde(default)]
  labels: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct AddCommentArgs {
  issue_key: String,
  comment: String,
}

#[derive(Debug, Deserialize)]
struct TransitionArgs {
  issue_key: String,
  transition_id: String,
}

/// Search results in the tracker's own paging vocabulary.
#[derive(Debug, Serialize)]
struct IssueSearchPage<'a> {
  issues: &'a [Issue],
  total: u64,
  #[serde(rename = "maxResults")]
  max_results: u64,
  #[serde(rename = "startAt")]
  start_at: u64,
}

impl<'a> From<&'a SearchResult<Issue>> for IssueSearchPage<'a> {
  fn from(result: &'a SearchResult<Issue>) -> Self {
    Self {
      issues: &result.results,
      total: result.size,
      max_results: result.limit,
      start_at: result.start,
    }
  }
}

/// Tools backed by an issue-tracker client.
pub struct JiraTools {
  client: Arc<dyn JiraApi>,
  max_results_default: usize,
}

impl JiraTools {
  pub fn new(client: Arc<dyn JiraApi>, max_results_default: usize) -> Self {
    Self {
      client,
      max_results_default,
    }
  }
}

fn string_prop(description: &str) -> Value {
  json!({"type": "string", "description": description})
}

fn labels_prop(description: &str) -> Value {
  json!({"type": "array", "items": {"type": "string"}, "description": description})
}

#[async_trait]
impl ToolSet for JiraTools {
  fn server_name(&self) -> &'static str {
    "jira-mcp-server"
  }

  fn definitions(&self) -> Vec<ToolDefinition> {
    vec![
      ToolDefinition::new(
        "jira_get_issue",
        "Get a specific Jira issue by key",
        json!({"issue_key": string_prop("The Jira issue key (e.g., PROJ-123)")}),
        &["issue_key"],
      ),
      ToolDefinition::new(
        "jira_search_issues",
        "Search for Jira issues using JQL",
        json!({
          "jql": string_prop("JQL (Jira Query Language) string"),
          "max_results": {
            "type": "number",
            "description": "Maximum number of results to return",
            "default": self.max_results_default,
          },
          "start_at": {"type": "number", "description": "Starting index for pagination", "default": 0},
        }),
        &["jql"],
      ),
      ToolDefinition::new(
        "jira_create_issue",
        "Create a new Jira issue",
        json!({
          "project_key": string_prop("The project key where to create the issue"),
          "summary": string_prop("Issue summary/title"),
          "description": string_prop("Issue description"),
          "issue_type": {"type": "string", "description": "Issue type (e.g., Task, Bug, Story)", "default": "Task"},
          "priority": string_prop("Issue priority (e.g., High, Medium, Low)"),
          "assignee": string_prop("Assignee username or email"),
          "labels": labels_prop("Array of labels to add to the issue"),
        }),
        &["project_key", "summary"],
      ),
      ToolDefinition::new(
        "jira_update_issue",
        "Update an existing Jira issue",
        json!({
          "issue_key": string_prop("The Jira issue key to update"),
          "summary": string_prop("New issue summary/title"),
          "description": string_prop("New issue description"),
          "assignee": string_prop("New assignee username or email"),
          "priority": string_prop("New issue priority"),
          "labels": labels_prop("Array of labels to set on the issue"),
        }),
        &["issue_key"],
      ),
      ToolDefinition::new(
        "jira_add_comment",
        "Add a comment to a Jira issue",
        json!({
          "issue_key": string_prop("The Jira issue key"),
          "comment": string_prop("Comment text to add"),
        }),
        &["issue_key", "comment"],
      ),
      ToolDefinition::new(
        "jira_get_comments",
        "Get all comments for a Jira issue",
        json!({"issue_key": string_prop("The Jira issue key")}),
        &["issue_key"],
      ),
      ToolDefinition::new("jira_get_projects", "Get all Jira projects", json!({}), &[]),
      ToolDefinition::new(
        "jira_get_transitions",
        "Get available transitions for a Jira issue",
        json!({"issue_key": string_prop("The Jira issue key")}),
        &["issue_key"],
      ),
      ToolDefinition::new(
        "jira_transition_issue",
        "Transition a Jira issue to a new status",
        json!({
          "issue_key": string_prop("The Jira issue key"),
          "transition_id": string_prop("The ID of the transition to execute"),
        }),
        &["issue_key", "transition_id"],
      ),
    ]
  }

  async fn call(&self, name: &str, arguments: Value) -> Result<String> {
    match name {
      "jira_get_issue" => {
        let args: IssueKeyArgs = parse_args(arguments)?;
        render(&self.client.get_issue(&args.issue_key).await?)
      }
      "jira_search_issues" => {
        let args: SearchArgs = parse_args(arguments)?;
        let result = self
          .client
          .search_issues(&args.jql, args.max_results, args.start_at)
          .await?;
        render(&IssueSearchPage::from(&result))
      }
      "jira_create_issue" => {
        let args: CreateIssueArgs = parse_args(arguments)?;
        let issue = NewIssue {
          project_key: args.project_key,
          summary: args.summary,
          description: args.description,
          issue_type: args.issue_type,
          priority: args.priority,
          assignee: args.assignee,
          labels: args.labels.unwrap_or_default(),
        };
        render(&self.client.create_issue(&issue).await?)
      }
      "jira_update_issue" => {
        let args: UpdateIssueArgs = parse_args(arguments)?;
        let update = IssueUpdate {
          summary: args.summary,
          description: args.description,
          assignee: args.assignee,
          priority: args.priority,
          labels: args.labels.unwrap_or_default(),
        };
        self.client.update_issue(&args.issue_key, &update).await?;
        Ok(format!("Successfully updated issue {}", args.issue_key))
      }
      "jira_add_comment" => {
        let args: AddCommentArgs = parse_args(arguments)?;
        render(&self.client.add_comment(&args.issue_key, &args.comment).await?)
      }
      "jira_get_comments" => {
        let args: IssueKeyArgs = parse_args(arguments)?;
        render(&self.client.get_comments(&args.issue_key).await?)
      }
      "jira_get_projects" => render(&self.client.get_projects().await?),
      "jira_get_transitions" => {
        let args: IssueKeyArgs = parse_args(arguments)?;
        render(&self.client.get_transitions(&args.issue_key).await?)
      }
      "jira_transition_issue" => {
        let args: TransitionArgs = parse_args(arguments)?;
        self
          .client
          .transition_issue(&args.issue_key, &args.transition_id)
          .await?;
        Ok(format!("Successfully transitioned issue {}", args.issue_key))
      }
      other => bail!("Unknown tool: {other}"),
    }
  }
}
