//! Test fixtures with sample backend responses
//!
//! Standard payloads follow the public REST schemas; custom payloads use the
//! loosely-named fields seen across custom deployments.

#![allow(dead_code)]

use serde_json::{Value, json};

// Sample standard content response
pub fn standard_page() -> Value {
  json!({
    "id": "123456",
    "type": "page",
    "status": "current",
    "title": "Release Notes",
    "space": {"key": "ENG", "name": "Engineering"},
    "body": {
      "storage": {
        "value": "<p>Version 2.1 ships on Friday.</p>",
        "representation": "storage"
      }
    },
    "version": {
      "number": 5,
      "when": "2026-03-02T10:00:00.000Z",
      "by": {"displayName": "Bob Builder"}
    },
    "history": {
      "createdDate": "2026-01-15T09:30:00.000Z",
      "createdBy": {"displayName": "Alice Author"}
    },
    "_links": {"webui": "/spaces/ENG/pages/123456/Release+Notes"}
  })
}

// Sample custom page response with an object container and a string author
pub fn custom_page() -> Value {
  json!({
    "page_id": "p-42",
    "name": "Runbook",
    "body": "Restart the service, then page oncall.",
    "space": {"key": "OPS", "name": "Operations"},
    "revision": "3",
    "created_at": "2026-02-01T08:00:00Z",
    "updated_at": "2026-02-03T08:00:00Z",
    "author": {"displayName": "Carol Ops", "email": "carol@example.com"},
    "link": "https://docs.internal/pages/p-42"
  })
}

// Sample standard content search response
pub fn standard_page_search() -> Value {
  json!({
    "results": [standard_page()],
    "start": 0,
    "limit": 10,
    "size": 1
  })
}

// Sample custom page search response
pub fn custom_page_search() -> Value {
  json!({
    "pages": [
      {"id": "p-1", "title": "Runbook Index", "space": "OPS"},
      {"id": "p-2", "title": "runbook", "space": "OPS", "status": "draft"}
    ]
  })
}

pub fn standard_spaces() -> Value {
  json!({
    "results": [
      {
        "key": "ENG",
        "name": "Engineering",
        "type": "global",
        "description": {"plain": {"value": "Engineering docs"}},
        "_links": {"webui": "/spaces/ENG"}
      },
      {"key": "~alice", "name": "Alice", "type": "personal"}
    ]
  })
}

pub fn custom_spaces() -> Value {
  json!({
    "spaces": [
      {"code": "OPS", "title": "Operations", "description": "Runbooks and oncall"},
      {"key": "HR", "name": "People", "type": "restricted"}
    ]
  })
}

pub fn standard_page_comments() -> Value {
  json!({
    "results": [{
      "id": "c-1",
      "type": "comment",
      "body": {"storage": {"value": "<p>Looks good</p>"}},
      "version": {"when": "2026-03-03T12:00:00.000Z", "by": {"displayName": "Dana Reviewer"}}
    }]
  })
}

pub fn custom_page_comments() -> Value {
  json!({
    "comments": [
      {"comment_id": 7, "content": "Ship it", "user": "erin", "created_at": "2026-03-04"},
      {"id": "8", "comment": "", "body": "Second thoughts"}
    ]
  })
}

// Sample standard issue response with a structured description
pub fn standard_issue() -> Value {
  json!({
    "id": "10001",
    "key": "PROJ-123",
    "fields": {
      "summary": "Login fails on Safari",
      "description": {
        "type": "doc",
        "version": 1,
        "content": [
          {"type": "paragraph", "content": [{"type": "text", "text": "Steps:"}]},
          {"type": "paragraph", "content": [{"type": "text", "text": "open the login page"}]}
        ]
      },
      "status": {"name": "In Progress"},
      "assignee": {"displayName": "Frank Dev"},
      "reporter": {"displayName": "Grace QA"},
      "created": "2026-04-01T10:00:00.000+0000",
      "updated": "2026-04-02T11:00:00.000+0000",
      "priority": {"name": "High"},
      "issuetype": {"name": "Bug"},
      "project": {"key": "PROJ"},
      "labels": ["frontend", "safari"]
    }
  })
}

// Sample custom issue response without labels
pub fn custom_issue() -> Value {
  json!({
    "issue_id": "i-9",
    "key": "OPS-9",
    "title": "Rotate certificates",
    "body": "Certificates expire next week.",
    "state": "open",
    "assignee": {"name": "henry", "displayName": "Henry H"},
    "created_by": "ivy@example.com",
    "created_at": "2026-05-01",
    "priority": "Medium",
    "project_key": "OPS"
  })
}

pub fn standard_issue_search() -> Value {
  json!({
    "startAt": 0,
    "maxResults": 2,
    "total": 17,
    "issues": [standard_issue()]
  })
}

pub fn custom_issue_search() -> Value {
  json!({
    "issues": [custom_issue(), {"key": "OPS-10", "summary": "Renew domain", "tags": ["billing"]}]
  })
}

pub fn standard_issue_comments() -> Value {
  json!({
    "comments": [{
      "id": "20001",
      "author": {"displayName": "Frank Dev"},
      "body": {
        "type": "doc",
        "content": [{"type": "paragraph", "content": [{"type": "text", "text": "Reproduced locally"}]}]
      },
      "created": "2026-04-03T09:00:00.000+0000",
      "updated": "2026-04-03T09:05:00.000+0000"
    }]
  })
}

pub fn custom_issue_comments() -> Value {
  json!({
    "data": [{"id": "c9", "body": "On it", "author": "henry", "created": "2026-05-02"}]
  })
}

// The standard project endpoint returns a bare array
pub fn standard_projects() -> Value {
  json!([
    {"id": "10000", "key": "PROJ", "name": "Project", "lead": {"displayName": "Jane Lead"}},
    {"id": "10001", "key": "OPS", "name": "Operations", "description": "Ops work"}
  ])
}

pub fn custom_projects() -> Value {
  json!({
    "projects": [{"project_id": "7", "code": "OPS", "title": "Operations", "owner": "kim"}]
  })
}

pub fn standard_transitions() -> Value {
  json!({
    "transitions": [
      {"id": "11", "name": "Start Progress", "to": {"name": "In Progress"}},
      {"id": "21", "name": "Resolve", "to": {"name": "Done"}}
    ]
  })
}

pub fn custom_transitions() -> Value {
  json!({
    "transitions": [{"transition_id": "close", "name": "Close"}]
  })
}
