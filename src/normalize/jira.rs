//! Normalizers for issues, issue comments, projects and transitions.

use serde_json::Value;

use super::fields::{RawObject, list_items, scalar_to_string};
use super::rich_text::extract_text;
use super::user::resolve_user;
use crate::models::{Issue, IssueComment, Project, SearchResult, Transition};

pub const ISSUE_ID: &[&str] = &["id", "issue_id"];
pub const ISSUE_KEY: &[&str] = &["key", "id", "number"];
pub const ISSUE_SUMMARY: &[&str] = &["title", "summary", "name"];
pub const ISSUE_DESCRIPTION: &[&str] = &["description", "body", "content"];
pub const ISSUE_STATUS: &[&str] = &["status", "state"];
pub const ISSUE_ASSIGNEE: &[&str] = &["assignee"];
pub const ISSUE_REPORTER: &[&str] = &["reporter", "created_by"];
pub const ISSUE_CREATED: &[&str] = &["created", "created_at"];
pub const ISSUE_UPDATED: &[&str] = &["updated", "updated_at"];
pub const ISSUE_PRIORITY: &[&str] = &["priority"];
pub const ISSUE_TYPE: &[&str] = &["type", "issue_type"];
pub const ISSUE_PROJECT: &[&str] = &["project", "project_key"];
pub const ISSUE_LABELS: &[&str] = &["labels", "tags"];

pub const COMMENT_ID: &[&str] = &["id", "comment_id"];
pub const COMMENT_BODY: &[&str] = &["comment", "body", "content"];
pub const COMMENT_AUTHOR: &[&str] = &["author", "user", "created_by"];
pub const COMMENT_CREATED: &[&str] = &["created", "created_at"];
pub const COMMENT_UPDATED: &[&str] = &["updated", "updated_at"];

pub const PROJECT_ID: &[&str] = &["id", "project_id"];
pub const PROJECT_KEY: &[&str] = &["key", "code", "id"];
pub const PROJECT_NAME: &[&str] = &["name", "title"];
pub const PROJECT_DESCRIPTION: &[&str] = &["description"];
pub const PROJECT_LEAD: &[&str] = &["lead", "owner"];

pub const TRANSITION_ID: &[&str] = &["id", "transition_id"];
pub const TRANSITION_NAME: &[&str] = &["name", "status", "to_status"];
pub const TRANSITION_TARGET: &[&str] = &["to_status", "target_status", "name"];

pub const CUSTOM_ISSUE_LIST: &[&str] = &["issues", "data", "results"];
pub const CUSTOM_COMMENT_LIST: &[&str] = &["comments", "data"];
pub const CUSTOM_PROJECT_LIST: &[&str] = &["projects", "data"];
pub const CUSTOM_TRANSITION_LIST: &[&str] = &["transitions", "data"];
pub const STANDARD_ISSUE_LIST: &[&str] = &["issues"];
pub const STANDARD_COMMENT_LIST: &[&str] = &["comments"];
pub const STANDARD_TRANSITION_LIST: &[&str] = &["transitions"];

const DEFAULT_ISSUE_TYPE: &str = "Task";
const UNKNOWN_AUTHOR: &str = "Unknown";

/// Normalize a standard issue response.
///
/// Everything but `id` and `key` lives under `fields`. A structured
/// description is flattened to plain text; a string description is kept.
pub fn issue_from_standard(raw: &Value) -> Issue {
  let data = RawObject::new(raw);
  let fields = data.child("fields");

  Issue {
    id: data.string("id").unwrap_or_default(),
    key: data.string("key").unwrap_or_default(),
    summary: fields.string("summary").unwrap_or_default(),
    description: plain_text(fields.get("description")),
    status: fields.child("status").string("name"),
    assignee: fields.child("assignee").string("displayName"),
    reporter: fields.child("reporter").string("displayName"),
    created: fields.string("created"),
    updated: fields.string("updated"),
    priority: fields.child("priority").string("name"),
    issue_type: fields.child("issuetype").string("name"),
    project: fields.child("project").string("key"),
    labels: fields.string_list(&["labels"]),
  }
}

/// Normalize a custom issue response.
pub fn issue_from_custom(raw: &Value) -> Issue {
  let data = RawObject::new(raw);

  Issue {
    id: data.first_string(ISSUE_ID).unwrap_or_default(),
    key: data.first_string(ISSUE_KEY).unwrap_or_default(),
    summary: data.first_string(ISSUE_SUMMARY).unwrap_or_default(),
    description: data.first_text(ISSUE_DESCRIPTION),
    status: data.first_string(ISSUE_STATUS),
    assignee: resolve_user(data.first(ISSUE_ASSIGNEE)),
    reporter: resolve_user(data.first(ISSUE_REPORTER)),
    created: data.first_string(ISSUE_CREATED),
    updated: data.first_string(ISSUE_UPDATED),
    priority: data.first_string(ISSUE_PRIORITY),
    issue_type: Some(
      data
        .first_string(ISSUE_TYPE)
        .unwrap_or_else(|| DEFAULT_ISSUE_TYPE.to_string()),
    ),
    project: data.first_string(ISSUE_PROJECT),
    labels: data.string_list(ISSUE_LABELS),
  }
}

/// Normalize a standard issue comment; the body is usually a structured
/// document.
pub fn comment_from_standard(raw: &Value) -> IssueComment {
  let data = RawObject::new(raw);

  IssueComment {
    id: data.string("id").unwrap_or_default(),
    author: data
      .child("author")
      .string("displayName")
      .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
    body: plain_text(data.get("body")).unwrap_or_default(),
    created: data.string("created").unwrap_or_default(),
    updated: data.string("updated"),
  }
}

/// Normalize a custom issue comment.
pub fn comment_from_custom(raw: &Value) -> IssueComment {
  let data = RawObject::new(raw);

  IssueComment {
    id: data.first_string(COMMENT_ID).unwrap_or_default(),
    author: resolve_user(data.first(COMMENT_AUTHOR)).unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
    body: data.first_text(COMMENT_BODY).unwrap_or_default(),
    created: data.first_string(COMMENT_CREATED).unwrap_or_default(),
    updated: data.first_string(COMMENT_UPDATED),
  }
}

pub fn project_from_standard(raw: &Value) -> Project {
  let data = RawObject::new(raw);

  Project {
    id: data.string("id").unwrap_or_default(),
    key: data.string("key").unwrap_or_default(),
    name: data.string("name").unwrap_or_default(),
    description: data.string("description"),
    lead: data.child("lead").string("displayName"),
  }
}

pub fn project_from_custom(raw: &Value) -> Project {
  let data = RawObject::new(raw);

  Project {
    id: data.first_string(PROJECT_ID).unwrap_or_default(),
    key: data.first_string(PROJECT_KEY).unwrap_or_default(),
    name: data.first_string(PROJECT_NAME).unwrap_or_default(),
    description: data.first_text(PROJECT_DESCRIPTION),
    lead: resolve_user(data.first(PROJECT_LEAD)),
  }
}

pub fn transition_from_standard(raw: &Value) -> Transition {
  let data = RawObject::new(raw);

  Transition {
    id: data.string("id").unwrap_or_default(),
    name: data.string("name").unwrap_or_default(),
    to_status: data.child("to").string("name").unwrap_or_default(),
  }
}

/// Normalize a custom transition. The name and the target status fall back
/// on each other.
pub fn transition_from_custom(raw: &Value) -> Transition {
  let data = RawObject::new(raw);

  Transition {
    id: data.first_string(TRANSITION_ID).unwrap_or_default(),
    name: data.first_string(TRANSITION_NAME).unwrap_or_default(),
    to_status: data.first_string(TRANSITION_TARGET).unwrap_or_default(),
  }
}

/// Normalize a standard issue search response.
///
/// `size` carries the server-reported total, which may exceed the number of
/// issues returned on this page.
pub fn issue_search_from_standard(raw: &Value, limit: u64, start: u64) -> SearchResult<Issue> {
  let data = RawObject::new(raw);

  SearchResult {
    results: list_items(raw, STANDARD_ISSUE_LIST)
      .iter()
      .map(issue_from_standard)
      .collect(),
    start: data.number("startAt").unwrap_or(start),
    limit: data.number("maxResults").unwrap_or(limit),
    size: data.number("total").unwrap_or(0),
  }
}

/// Normalize a custom issue search response; the total falls back to the
/// number of issues returned.
pub fn issue_search_from_custom(raw: &Value, limit: u64, start: u64) -> SearchResult<Issue> {
  let items = list_items(raw, CUSTOM_ISSUE_LIST);

  SearchResult {
    results: items.iter().map(issue_from_custom).collect(),
    start,
    limit,
    size: RawObject::new(raw).number("total").unwrap_or(items.len() as u64),
  }
}

fn plain_text(value: Option<&Value>) -> Option<String> {
  match value? {
    Value::Null => None,
    structured @ (Value::Object(_) | Value::Array(_)) => Some(extract_text(structured)),
    other => scalar_to_string(other),
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn standard_issue() -> Value {
    json!({
      "id": "10001",
      "key": "PROJ-1",
      "fields": {
        "summary": "Login fails on Safari",
        "description": {
          "type": "doc",
          "version": 1,
          "content": [{"type": "paragraph", "content": [
            {"type": "text", "text": "Steps"},
            {"type": "text", "text": "to reproduce"}
          ]}]
        },
        "status": {"name": "In Progress"},
        "assignee": {"displayName": "Grace"},
        "reporter": {"displayName": "Hal"},
        "created": "2024-04-01T08:00:00.000+0000",
        "updated": "2024-04-02T08:00:00.000+0000",
        "priority": {"name": "High"},
        "issuetype": {"name": "Bug"},
        "project": {"key": "PROJ"},
        "labels": ["frontend", "safari"]
      }
    })
  }

  #[test]
  fn test_standard_issue_reads_fields() {
    let issue = issue_from_standard(&standard_issue());
    assert_eq!(issue.id, "10001");
    assert_eq!(issue.key, "PROJ-1");
    assert_eq!(issue.summary, "Login fails on Safari");
    assert_eq!(issue.description.as_deref(), Some("Steps to reproduce"));
    assert_eq!(issue.status.as_deref(), Some("In Progress"));
    assert_eq!(issue.assignee.as_deref(), Some("Grace"));
    assert_eq!(issue.reporter.as_deref(), Some("Hal"));
    assert_eq!(issue.priority.as_deref(), Some("High"));
    assert_eq!(issue.issue_type.as_deref(), Some("Bug"));
    assert_eq!(issue.project.as_deref(), Some("PROJ"));
    assert_eq!(issue.labels, vec!["frontend", "safari"]);
  }

  #[test]
  fn test_standard_issue_keeps_string_description() {
    let issue = issue_from_standard(&json!({"key": "A-1", "fields": {"description": "plain words"}}));
    assert_eq!(issue.description.as_deref(), Some("plain words"));
  }

  #[test]
  fn test_issues_without_optional_fields() {
    for issue in [
      issue_from_standard(&json!({})),
      issue_from_standard(&json!({"fields": {"assignee": null, "labels": null}})),
      issue_from_custom(&json!({})),
    ] {
      assert_eq!(issue.key, "");
      assert_eq!(issue.description, None);
      assert_eq!(issue.assignee, None);
      assert!(issue.labels.is_empty());
    }
    assert_eq!(issue_from_standard(&json!({})).issue_type, None);
    assert_eq!(issue_from_custom(&json!({})).issue_type.as_deref(), Some("Task"));
  }

  #[test]
  fn test_custom_issue_alias_chain() {
    let raw = json!({
      "issue_id": 42,
      "number": "OPS-42",
      "name": "Rotate certificates",
      "body": "Before Friday",
      "state": "open",
      "assignee": {"email": "ivy@example.com"},
      "created_by": "jack",
      "created_at": "2024-06-01",
      "priority": "medium",
      "issue_type": "story",
      "project_key": "OPS",
      "tags": ["security"]
    });

    let issue = issue_from_custom(&raw);
    assert_eq!(issue.id, "42");
    assert_eq!(issue.key, "OPS-42");
    assert_eq!(issue.summary, "Rotate certificates");
    assert_eq!(issue.description.as_deref(), Some("Before Friday"));
    assert_eq!(issue.status.as_deref(), Some("open"));
    assert_eq!(issue.assignee.as_deref(), Some("ivy@example.com"));
    assert_eq!(issue.reporter.as_deref(), Some("jack"));
    assert_eq!(issue.created.as_deref(), Some("2024-06-01"));
    assert_eq!(issue.issue_type.as_deref(), Some("story"));
    assert_eq!(issue.project.as_deref(), Some("OPS"));
    assert_eq!(issue.labels, vec!["security"]);
  }

  #[test]
  fn test_custom_issue_key_falls_back_to_id() {
    let issue = issue_from_custom(&json!({"id": "99", "title": "t"}));
    assert_eq!(issue.id, "99");
    assert_eq!(issue.key, "99");
  }

  #[test]
  fn test_comments_in_both_shapes() {
    let standard = comment_from_standard(&json!({
      "id": "c-1",
      "author": {"displayName": "Kim"},
      "body": {"type": "doc", "content": [{"type": "paragraph", "content": [{"type": "text", "text": "Fixed"}]}]},
      "created": "t1"
    }));
    assert_eq!(standard.author, "Kim");
    assert_eq!(standard.body, "Fixed");
    assert_eq!(standard.created, "t1");
    assert_eq!(standard.updated, None);

    let empty = comment_from_standard(&json!({}));
    assert_eq!(empty.author, "Unknown");
    assert_eq!(empty.body, "");

    let custom = comment_from_custom(&json!({"id": 3, "content": "noted", "created_by": {"name": "lee"}}));
    assert_eq!(custom.id, "3");
    assert_eq!(custom.body, "noted");
    assert_eq!(custom.author, "lee");
    assert_eq!(custom.created, "");
  }

  #[test]
  fn test_projects_in_both_shapes() {
    let standard = project_from_standard(&json!({"id": "1", "key": "PROJ", "name": "Project", "lead": {"displayName": "Mo"}}));
    assert_eq!(standard.lead.as_deref(), Some("Mo"));
    assert_eq!(project_from_standard(&json!({"key": "X"})).lead, None);

    let custom = project_from_custom(&json!({"project_id": 5, "code": "OPS", "title": "Operations", "owner": "nia"}));
    assert_eq!(custom.id, "5");
    assert_eq!(custom.key, "OPS");
    assert_eq!(custom.name, "Operations");
    assert_eq!(custom.lead.as_deref(), Some("nia"));
  }

  #[test]
  fn test_transitions_in_both_shapes() {
    let standard = transition_from_standard(&json!({"id": "31", "name": "Done", "to": {"name": "Closed"}}));
    assert_eq!(standard.to_status, "Closed");
    assert_eq!(transition_from_standard(&json!({"id": "1"})).to_status, "");

    let custom = transition_from_custom(&json!({"transition_id": 7, "status": "Start"}));
    assert_eq!(custom.id, "7");
    assert_eq!(custom.name, "Start");
    assert_eq!(custom.to_status, "");

    let custom = transition_from_custom(&json!({"id": "8", "name": "Resolve"}));
    assert_eq!(custom.to_status, "Resolve");
  }

  #[test]
  fn test_issue_search_totals() {
    let standard = issue_search_from_standard(
      &json!({"issues": [standard_issue()], "total": 37, "maxResults": 1, "startAt": 10}),
      50,
      0,
    );
    assert_eq!(standard.results.len(), 1);
    assert_eq!(standard.size, 37);
    assert_eq!(standard.limit, 1);
    assert_eq!(standard.start, 10);

    let fallback = issue_search_from_standard(&json!({}), 50, 5);
    assert_eq!((fallback.size, fallback.limit, fallback.start), (0, 50, 5));

    let custom = issue_search_from_custom(&json!({"results": [{"key": "A-1"}, {"key": "A-2"}]}), 50, 0);
    assert_eq!(custom.size, 2);
    assert_eq!(custom.results[1].key, "A-2");

    let custom = issue_search_from_custom(&json!({"issues": [{"key": "A-1"}], "total": 12}), 50, 0);
    assert_eq!(custom.size, 12);
  }
}
