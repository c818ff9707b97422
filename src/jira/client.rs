//! Issue-tracker client dispatching to the standard or custom API.

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tracing::debug;

use super::api::{IssueUpdate, JiraApi, NewIssue};
use crate::config::{BackendMode, ClientOptions, Config};
use crate::models::{Issue, IssueComment, Project, SearchResult, Transition};
use crate::normalize::jira::{
  CUSTOM_COMMENT_LIST, CUSTOM_PROJECT_LIST, CUSTOM_TRANSITION_LIST, STANDARD_COMMENT_LIST, STANDARD_TRANSITION_LIST,
  comment_from_custom, comment_from_standard, issue_from_custom, issue_from_standard, issue_search_from_custom,
  issue_search_from_standard, project_from_custom, project_from_standard, transition_from_custom,
  transition_from_standard,
};
use crate::normalize::{RawObject, issue_query_filters, list_items, text_document};
use crate::transport::{ApiRequest, HttpTransport, REQUEST_TIMEOUT_SECS, Transport};

const DEFAULT_ISSUE_TYPE: &str = "Task";

/// Fields requested from the standard search endpoint.
const SEARCH_FIELDS: [&str; 11] = [
  "summary",
  "status",
  "assignee",
  "reporter",
  "created",
  "updated",
  "priority",
  "issuetype",
  "project",
  "labels",
  "description",
];

/// Issue-tracker client.
#[derive(Clone)]
pub struct JiraClient {
  transport: Arc<dyn Transport>,
  options: ClientOptions,
}

impl JiraClient {
  /// Create a client over an existing transport.
  pub fn new(transport: Arc<dyn Transport>, options: ClientOptions) -> Self {
    Self { transport, options }
  }

  /// Create a client talking HTTP to the configured backend.
  ///
  /// # Errors
  /// Returns an error if the HTTP client cannot be built.
  pub fn from_config(config: &Config) -> Result<Self> {
    let transport = HttpTransport::new(config.base_url.clone(), config.auth.clone(), REQUEST_TIMEOUT_SECS)?;
    Ok(Self::new(Arc::new(transport), ClientOptions::from(config)))
  }

  fn is_custom(&self) -> bool {
    self.options.mode == BackendMode::Custom
  }

  fn custom(&self, path: &str) -> String {
    self.options.custom_path(path)
  }
}

/// Non-empty value of an optional argument.
fn given(value: &Option<String>) -> Option<&str> {
  value.as_deref().filter(|v| !v.is_empty())
}

fn custom_create_payload(issue: &NewIssue) -> Value {
  json!({
    "project": issue.project_key,
    "title": issue.summary,
    "description": issue.description.as_deref().unwrap_or_default(),
    "type": issue.issue_type.as_deref().unwrap_or(DEFAULT_ISSUE_TYPE).to_lowercase(),
    "priority": issue.priority,
    "assignee": issue.assignee,
    "labels": issue.labels,
  })
}

fn standard_create_payload(issue: &NewIssue) -> Value {
  let mut fields = Map::new();
  fields.insert("project".into(), json!({"key": issue.project_key}));
  fields.insert("summary".into(), json!(issue.summary));
  fields.insert(
    "issuetype".into(),
    json!({"name": issue.issue_type.as_deref().unwrap_or(DEFAULT_ISSUE_TYPE)}),
  );

  if let Some(description) = given(&issue.description) {
    fields.insert("description".into(), text_document(description));
  }
  if let Some(priority) = given(&issue.priority) {
    fields.insert("priority".into(), json!({"name": priority}));
  }
  if let Some(assignee) = given(&issue.assignee) {
    fields.insert("assignee".into(), json!({"name": assignee}));
  }
  if !issue.labels.is_empty() {
    fields.insert("labels".into(), json!(issue.labels));
  }

  json!({"fields": fields})
}

fn custom_update_payload(update: &IssueUpdate) -> Value {
  let mut payload = Map::new();
  if let Some(summary) = given(&update.summary) {
    payload.insert("title".into(), json!(summary));
  }
  if let Some(description) = given(&update.description) {
    payload.insert("description".into(), json!(description));
  }
  if let Some(assignee) = given(&update.assignee) {
    payload.insert("assignee".into(), json!(assignee));
  }
  if let Some(priority) = given(&update.priority) {
    payload.insert("priority".into(), json!(priority));
  }
  if !update.labels.is_empty() {
    payload.insert("labels".into(), json!(update.labels));
  }
  Value::Object(payload)
}

fn standard_update_payload(update: &IssueUpdate) -> Value {
  let mut fields = Map::new();
  if let Some(summary) = given(&update.summary) {
    fields.insert("summary".into(), json!(summary));
  }
  if let Some(description) = given(&update.description) {
    fields.insert("description".into(), text_document(description));
  }
  if let Some(assignee) = given(&update.assignee) {
    fields.insert("assignee".into(), json!({"name": assignee}));
  }
  if let Some(priority) = given(&update.priority) {
    fields.insert("priority".into(), json!({"name": priority}));
  }
  if !update.labels.is_empty() {
    fields.insert("labels".into(), json!(update.labels));
  }
  json!({"fields": fields})
}

#[async_trait]
impl JiraApi for JiraClient {
  async fn get_issue(&self, issue_key: &str) -> Result<Issue> {
    let issue = match self.options.mode {
      BackendMode::Custom => {
        let raw = self
          .transport
          .send(ApiRequest::get(self.custom(&format!("/issues/{issue_key}"))))
          .await
          .with_context(|| format!("Failed to fetch issue {issue_key}"))?;
        issue_from_custom(&raw)
      }
      BackendMode::Standard => {
        let raw = self
          .transport
          .send(ApiRequest::get(format!("/rest/api/3/issue/{issue_key}")))
          .await
          .with_context(|| format!("Failed to fetch issue {issue_key}"))?;
        issue_from_standard(&raw)
      }
    };

    Ok(issue)
  }

  async fn search_issues(&self, query: &str, limit: Option<usize>, start: usize) -> Result<SearchResult<Issue>> {
    let limit = self.options.page_size(limit);

    if self.is_custom() {
      let filters = issue_query_filters(query);
      debug!("Translated issue query {query:?} into {filters:?}");

      let request = filters
        .to_query_pairs()
        .into_iter()
        .fold(ApiRequest::get(self.custom("/issues/search")), |request, (key, value)| {
          request.query(key, value)
        })
        .query("limit", limit)
        .query("offset", start);
      let raw = self.transport.send(request).await.context("Failed to search issues")?;
      return Ok(issue_search_from_custom(&raw, limit as u64, start as u64));
    }

    let payload = json!({
      "jql": query,
      "maxResults": limit,
      "startAt": start,
      "fields": SEARCH_FIELDS,
    });
    let raw = self
      .transport
      .send(ApiRequest::post("/rest/api/3/search", payload))
      .await
      .context("Failed to search issues")?;
    Ok(issue_search_from_standard(&raw, limit as u64, start as u64))
  }

  async fn create_issue(&self, issue: &NewIssue) -> Result<Issue> {
    let project_key = &issue.project_key;

    if self.is_custom() {
      let raw = self
        .transport
        .send(ApiRequest::post(self.custom("/issues"), custom_create_payload(issue)))
        .await
        .with_context(|| format!("Failed to create issue in project {project_key}"))?;
      return Ok(issue_from_custom(&raw));
    }

    let created = self
      .transport
      .send(ApiRequest::post("/rest/api/3/issue", standard_create_payload(issue)))
      .await
      .with_context(|| format!("Failed to create issue in project {project_key}"))?;
    let key = RawObject::new(&created)
      .string("key")
      .ok_or_else(|| anyhow!("Created issue response did not include a key"))?;

    debug!("Created issue {key}, fetching it back");
    self.get_issue(&key).await
  }

  async fn update_issue(&self, issue_key: &str, update: &IssueUpdate) -> Result<()> {
    let request = match self.options.mode {
      BackendMode::Custom => ApiRequest::put(self.custom(&format!("/issues/{issue_key}")), custom_update_payload(update)),
      BackendMode::Standard => ApiRequest::put(format!("/rest/api/3/issue/{issue_key}"), standard_update_payload(update)),
    };

    self
      .transport
      .send(request)
      .await
      .with_context(|| format!("Failed to update issue {issue_key}"))?;
    Ok(())
  }

  async fn add_comment(&self, issue_key: &str, comment: &str) -> Result<IssueComment> {
    if self.is_custom() {
      let raw = self
        .transport
        .send(ApiRequest::post(
          self.custom(&format!("/issues/{issue_key}/comments")),
          json!({"comment": comment}),
        ))
        .await
        .with_context(|| format!("Failed to comment on issue {issue_key}"))?;
      return Ok(comment_from_custom(&raw));
    }

    let raw = self
      .transport
      .send(ApiRequest::post(
        format!("/rest/api/3/issue/{issue_key}/comment"),
        json!({"body": text_document(comment)}),
      ))
      .await
      .with_context(|| format!("Failed to comment on issue {issue_key}"))?;
    Ok(comment_from_standard(&raw))
  }

  async fn get_comments(&self, issue_key: &str) -> Result<Vec<IssueComment>> {
    let comments = match self.options.mode {
      BackendMode::Custom => {
        let raw = self
          .transport
          .send(ApiRequest::get(self.custom(&format!("/issues/{issue_key}/comments"))))
          .await
          .with_context(|| format!("Failed to list comments of issue {issue_key}"))?;
        list_items(&raw, CUSTOM_COMMENT_LIST).iter().map(comment_from_custom).collect()
      }
      BackendMode::Standard => {
        let raw = self
          .transport
          .send(ApiRequest::get(format!("/rest/api/3/issue/{issue_key}/comment")))
          .await
          .with_context(|| format!("Failed to list comments of issue {issue_key}"))?;
        list_items(&raw, STANDARD_COMMENT_LIST)
          .iter()
          .map(comment_from_standard)
          .collect()
      }
    };

    Ok(comments)
  }

  async fn get_projects(&self) -> Result<Vec<Project>> {
    if self.is_custom() {
      let raw = self
        .transport
        .send(ApiRequest::get(self.custom("/projects")))
        .await
        .context("Failed to list projects")?;
      return Ok(list_items(&raw, CUSTOM_PROJECT_LIST).iter().map(project_from_custom).collect());
    }

    let raw = self
      .transport
      .send(ApiRequest::get("/rest/api/3/project"))
      .await
      .context("Failed to list projects")?;
    Ok(list_items(&raw, &[]).iter().map(project_from_standard).collect())
  }

  async fn get_transitions(&self, issue_key: &str) -> Result<Vec<Transition>> {
    if self.is_custom() {
      let raw = self
        .transport
        .send(ApiRequest::get(self.custom(&format!("/issues/{issue_key}/transitions"))))
        .await
        .with_context(|| format!("Failed to list transitions of issue {issue_key}"))?;
      return Ok(
        list_items(&raw, CUSTOM_TRANSITION_LIST)
          .iter()
          .map(transition_from_custom)
          .collect(),
      );
    }

    let raw = self
      .transport
      .send(ApiRequest::get(format!("/rest/api/3/issue/{issue_key}/transitions")))
      .await
      .with_context(|| format!("Failed to list transitions of issue {issue_key}"))?;
    Ok(
      list_items(&raw, STANDARD_TRANSITION_LIST)
        .iter()
        .map(transition_from_standard)
        .collect(),
    )
  }

  async fn transition_issue(&self, issue_key: &str, transition_id: &str) -> Result<()> {
    let request = match self.options.mode {
      BackendMode::Custom => ApiRequest::post(
        self.custom(&format!("/issues/{issue_key}/transitions")),
        json!({"transition": transition_id}),
      ),
      BackendMode::Standard => ApiRequest::post(
        format!("/rest/api/3/issue/{issue_key}/transitions"),
        json!({"transition": {"id": transition_id}}),
      ),
    };

    self
      .transport
      .send(request)
      .await
      .with_context(|| format!("Failed to transition issue {issue_key}"))?;
    Ok(())
  }
}
