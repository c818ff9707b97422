//! Tool and JSON-RPC server tests over fake backends.

mod common;

use std::sync::Arc;

use atlas_bridge::server::serve;
use atlas_bridge::tools::{ConfluenceTools, JiraTools, call_tool};
use atlas_bridge::transport::HttpMethod;
use common::fake_transport::{custom_confluence, custom_jira, standard_confluence, standard_jira};
use common::fixtures;
use serde_json::{Value, json};

#[tokio::test]
async fn test_page_by_title_miss_is_not_an_error() {
  let (transport, client) = custom_confluence();
  transport.respond(HttpMethod::Get, "/v1/pages/search", json!({"pages": []}));
  let tools = ConfluenceTools::new(Arc::new(client), 25);

  let outcome = call_tool(
    &tools,
    "confluence_get_page_by_title",
    Some(json!({"space_key": "OPS", "title": "Nope"})),
  )
  .await;

  assert!(!outcome.is_error);
  assert_eq!(outcome.text, "Page 'Nope' not found in space OPS");
}

#[tokio::test]
async fn test_delete_page_reports_success() {
  let (transport, client) = standard_confluence();
  transport.respond(HttpMethod::Delete, "/rest/api/content/123456", Value::Null);
  let tools = ConfluenceTools::new(Arc::new(client), 25);

  let outcome = call_tool(&tools, "confluence_delete_page", Some(json!({"page_id": "123456"}))).await;

  assert!(!outcome.is_error);
  assert_eq!(outcome.text, "Successfully deleted page 123456");
}

#[tokio::test]
async fn test_get_page_renders_canonical_json() {
  let (transport, client) = custom_confluence();
  transport.respond(HttpMethod::Get, "/v1/pages/p-42", fixtures::custom_page());
  let tools = ConfluenceTools::new(Arc::new(client), 25);

  let outcome = call_tool(&tools, "confluence_get_page", Some(json!({"page_id": "p-42"}))).await;
  assert!(!outcome.is_error);

  let page: Value = serde_json::from_str(&outcome.text).unwrap();
  assert_eq!(page["id"], "p-42");
  assert_eq!(page["space_key"], "OPS");
  assert_eq!(page["version"], 3);
  assert_eq!(page["created_by"], "Carol Ops");
}

#[tokio::test]
async fn test_missing_argument_names_the_field() {
  let (_transport, client) = standard_confluence();
  let tools = ConfluenceTools::new(Arc::new(client), 25);

  let outcome = call_tool(&tools, "confluence_get_page", Some(json!({}))).await;
  assert!(outcome.is_error);
  assert_eq!(
    outcome.text,
    "Error executing tool confluence_get_page: Invalid arguments: missing field `page_id`"
  );

  let outcome = call_tool(&tools, "confluence_get_space", None).await;
  assert!(outcome.is_error);
  assert!(outcome.text.contains("missing field `space_key`"));
}

#[tokio::test]
async fn test_backend_failure_becomes_error_text() {
  let (transport, client) = standard_confluence();
  transport.fail_with_status(HttpMethod::Get, "/rest/api/content/999", 404, "No content found");
  let tools = ConfluenceTools::new(Arc::new(client), 25);

  let outcome = call_tool(&tools, "confluence_get_page", Some(json!({"page_id": "999"}))).await;

  assert!(outcome.is_error);
  assert_eq!(
    outcome.text,
    "Error executing tool confluence_get_page: Failed to fetch page 999: request failed with status 404: No content found"
  );
}

#[tokio::test]
async fn test_unknown_tool_is_reported() {
  let (_transport, client) = standard_jira();
  let tools = JiraTools::new(Arc::new(client), 50);

  let outcome = call_tool(&tools, "jira_delete_everything", None).await;
  assert!(outcome.is_error);
  assert_eq!(
    outcome.text,
    "Error executing tool jira_delete_everything: Unknown tool: jira_delete_everything"
  );
}

#[tokio::test]
async fn test_issue_search_uses_tracker_paging_keys() {
  let (transport, client) = standard_jira();
  transport.respond(HttpMethod::Post, "/rest/api/3/search", fixtures::standard_issue_search());
  let tools = JiraTools::new(Arc::new(client), 50);

  let outcome = call_tool(
    &tools,
    "jira_search_issues",
    Some(json!({"jql": "project = PROJ", "max_results": 2})),
  )
  .await;
  assert!(!outcome.is_error);

  let page: Value = serde_json::from_str(&outcome.text).unwrap();
  assert_eq!(page["total"], 17);
  assert_eq!(page["maxResults"], 2);
  assert_eq!(page["startAt"], 0);
  assert_eq!(page["issues"][0]["key"], "PROJ-123");
  assert_eq!(page["issues"][0]["labels"], json!(["frontend", "safari"]));
}

#[tokio::test]
async fn test_created_issue_always_lists_labels() {
  let (transport, client) = custom_jira();
  transport.respond(HttpMethod::Post, "/v1/issues", fixtures::custom_issue());
  let tools = JiraTools::new(Arc::new(client), 50);

  let outcome = call_tool(
    &tools,
    "jira_create_issue",
    Some(json!({"project_key": "OPS", "summary": "Rotate certificates"})),
  )
  .await;
  assert!(!outcome.is_error);

  let issue: Value = serde_json::from_str(&outcome.text).unwrap();
  assert_eq!(issue["key"], "OPS-9");
  assert_eq!(issue["labels"], json!([]));
  assert_eq!(issue["issue_type"], "Task");
}

#[tokio::test]
async fn test_update_and_transition_report_success() {
  let (transport, client) = standard_jira();
  transport.respond(HttpMethod::Put, "/rest/api/3/issue/PROJ-123", Value::Null);
  transport.respond(HttpMethod::Post, "/rest/api/3/issue/PROJ-123/transitions", Value::Null);
  let tools = JiraTools::new(Arc::new(client), 50);

  let outcome = call_tool(
    &tools,
    "jira_update_issue",
    Some(json!({"issue_key": "PROJ-123", "summary": "Login fails on Safari 17"})),
  )
  .await;
  assert_eq!(outcome.text, "Successfully updated issue PROJ-123");

  let outcome = call_tool(
    &tools,
    "jira_transition_issue",
    Some(json!({"issue_key": "PROJ-123", "transition_id": "21"})),
  )
  .await;
  assert_eq!(outcome.text, "Successfully transitioned issue PROJ-123");
  assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn test_transitions_output() {
  let (transport, client) = standard_jira();
  transport.respond(
    HttpMethod::Get,
    "/rest/api/3/issue/PROJ-123/transitions",
    fixtures::standard_transitions(),
  );
  let tools = JiraTools::new(Arc::new(client), 50);

  let outcome = call_tool(&tools, "jira_get_transitions", Some(json!({"issue_key": "PROJ-123"}))).await;

  insta::assert_snapshot!(outcome.text, @r###"
  [
    {
      "id": "11",
      "name": "Start Progress",
      "to_status": "In Progress"
    },
    {
      "id": "21",
      "name": "Resolve",
      "to_status": "Done"
    }
  ]
  "###);
}

#[tokio::test]
async fn test_stdio_session() {
  let (transport, client) = custom_jira();
  transport.respond(HttpMethod::Get, "/v1/projects", fixtures::custom_projects());
  let tools = JiraTools::new(Arc::new(client), 50);

  let input = [
    r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
    r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
    "",
    r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
    r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"jira_get_projects"}}"#,
    r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"jira_get_issue","arguments":{}}}"#,
  ]
  .join("\n");

  let mut output = Vec::new();
  serve(&tools, input.as_bytes(), &mut output).await.unwrap();

  let responses: Vec<Value> = String::from_utf8(output)
    .unwrap()
    .lines()
    .map(|line| serde_json::from_str(line).unwrap())
    .collect();
  assert_eq!(responses.len(), 4);

  assert_eq!(responses[0]["id"], 1);
  assert_eq!(responses[0]["result"]["serverInfo"]["name"], "jira-mcp-server");

  assert_eq!(responses[1]["id"], 2);
  assert_eq!(responses[1]["result"]["tools"].as_array().map(Vec::len), Some(9));

  assert_eq!(responses[2]["id"], 3);
  assert!(responses[2]["result"].get("isError").is_none());
  let projects: Value = serde_json::from_str(responses[2]["result"]["content"][0]["text"].as_str().unwrap()).unwrap();
  assert_eq!(projects[0]["key"], "OPS");

  assert_eq!(responses[3]["id"], 4);
  assert_eq!(responses[3]["result"]["isError"], true);
  assert_eq!(
    responses[3]["result"]["content"][0]["text"],
    "Error executing tool jira_get_issue: Invalid arguments: missing field `issue_key`"
  );
}

#[tokio::test]
async fn test_stdio_session_continues_after_undecodable_line() {
  let (transport, client) = custom_jira();
  transport.respond(HttpMethod::Get, "/v1/projects", fixtures::custom_projects());
  let tools = JiraTools::new(Arc::new(client), 50);

  let mut input = Vec::new();
  input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"tools/list\"}\n");
  input.extend_from_slice(b"\xff\xfe garbage\n");
  input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"tools/call\",\"params\":{\"name\":\"jira_get_projects\"}}\n");

  let mut output = Vec::new();
  serve(&tools, input.as_slice(), &mut output).await.unwrap();

  let responses: Vec<Value> = String::from_utf8(output)
    .unwrap()
    .lines()
    .map(|line| serde_json::from_str(line).unwrap())
    .collect();
  assert_eq!(responses.len(), 3);
  assert_eq!(responses[0]["id"], 1);
  assert_eq!(responses[1]["id"], Value::Null);
  assert_eq!(responses[1]["error"]["code"], -32700);
  assert_eq!(responses[2]["id"], 2);
  assert!(responses[2]["result"].get("isError").is_none());
}

#[tokio::test]
async fn test_update_page_accepts_float_version() {
  let (transport, client) = custom_confluence();
  transport.respond(HttpMethod::Put, "/v1/pages/p-42", fixtures::custom_page());
  let tools = ConfluenceTools::new(Arc::new(client), 25);

  let outcome = call_tool(
    &tools,
    "confluence_update_page",
    Some(json!({"page_id": "p-42", "title": "Runbook", "content": "steps", "version": 5.0})),
  )
  .await;

  assert!(!outcome.is_error, "{}", outcome.text);
  assert_eq!(transport.last_request().body.unwrap()["version"], 6);
}

#[tokio::test]
async fn test_search_accepts_float_page_size() {
  let (transport, client) = standard_jira();
  transport.respond(HttpMethod::Post, "/rest/api/3/search", fixtures::standard_issue_search());
  let tools = JiraTools::new(Arc::new(client), 50);

  let outcome = call_tool(
    &tools,
    "jira_search_issues",
    Some(json!({"jql": "project = PROJ", "max_results": 2.0, "start_at": 0.0})),
  )
  .await;

  assert!(!outcome.is_error, "{}", outcome.text);
  let body = transport.last_request().body.unwrap();
  assert_eq!(body["maxResults"], 2);
  assert_eq!(body["startAt"], 0);
}
