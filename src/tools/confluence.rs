//! Content-service tools.

use std::sync::Arc;

use anyhow::{Result, bail};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{ToolDefinition, ToolSet, count_arg, number_arg, optional_count_arg, parse_args, render};
use crate::confluence::ConfluenceApi;

#[derive(Debug, Deserialize)]
struct PageIdArgs {
  page_id: String,
}

#[derive(Debug, Deserialize)]
struct GetPageArgs {
  page_id: String,
  #[serde(default)]
  expand: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct PageByTitleArgs {
  space_key: String,
  title: String,
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
  query: String,
  #[serde(default, deserialize_with = "optional_count_arg")]
  max_results: Option<usize>,
  #[serde(default, deserialize_with = "count_arg")]
  start_at: usize,
}

#[derive(Debug, Deserialize)]
struct CreatePageArgs {
  space_key: String,
  title: String,
  content: String,
  #[serde(default)]
  parent_page_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdatePageArgs {
  page_id: String,
  title: String,
  content: String,
  #[serde(deserialize_with = "number_arg")]
  version: u64,
}

#[derive(Debug, Deserialize)]
struct SpacesArgs {
  #[serde(default, deserialize_with = "optional_count_arg")]
  max_results: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct SpaceKeyArgs {
  space_key: String,
}

#[derive(Debug, Deserialize)]
struct AddCommentArgs {
  page_id: String,
  comment: String,
}

/// Tools backed by a content-service client.
pub struct ConfluenceTools {
  client: Arc<dyn ConfluenceApi>,
  max_results_default: usize,
}

impl ConfluenceTools {
  pub fn new(client: Arc<dyn ConfluenceApi>, max_results_default: usize) -> Self {
    Self {
      client,
      max_results_default,
    }
  }
}

fn string_prop(description: &str) -> Value {
  json!({"type": "string", "description": description})
}

#[async_trait]
impl ToolSet for ConfluenceTools {
  fn server_name(&self) -> &'static str {
    "confluence-mcp-server"
  }

  fn definitions(&self) -> Vec<ToolDefinition> {
    let max_results = json!({
      "type": "number",
      "description": "Maximum number of results to return",
      "default": self.max_results_default,
    });

    vec![
      ToolDefinition::new(
        "confluence_get_page",
        "Get a specific Confluence page by ID",
        json!({
          "page_id": string_prop("The Confluence page ID"),
          "expand": {
            "type": "array",
            "items": {"type": "string"},
            "description": "List of properties to expand (e.g., body.storage, version, space)",
            "default": ["body.storage", "version", "space"],
          },
        }),
        &["page_id"],
      ),
      ToolDefinition::new(
        "confluence_get_page_by_title",
        "Get a Confluence page by title in a specific space",
        json!({
          "space_key": string_prop("The space key"),
          "title": string_prop("The page title"),
        }),
        &["space_key", "title"],
      ),
      ToolDefinition::new(
        "confluence_search_content",
        "Search for Confluence content using CQL",
        json!({
          "query": string_prop("CQL (Confluence Query Language) or simple search query"),
          "max_results": max_results,
          "start_at": {"type": "number", "description": "Starting index for pagination", "default": 0},
        }),
        &["query"],
      ),
      ToolDefinition::new(
        "confluence_create_page",
        "Create a new Confluence page",
        json!({
          "space_key": string_prop("The space key where to create the page"),
          "title": string_prop("Page title"),
          "content": string_prop("Page content in Confluence storage format"),
          "parent_page_id": string_prop("ID of the parent page (optional)"),
        }),
        &["space_key", "title", "content"],
      ),
      ToolDefinition::new(
        "confluence_update_page",
        "Update an existing Confluence page",
        json!({
          "page_id": string_prop("The page ID to update"),
          "title": string_prop("New page title"),
          "content": string_prop("New page content in Confluence storage format"),
          "version": {"type": "number", "description": "Current version number of the page"},
        }),
        &["page_id", "title", "content", "version"],
      ),
      ToolDefinition::new(
        "confluence_delete_page",
        "Delete a Confluence page",
        json!({"page_id": string_prop("The page ID to delete")}),
        &["page_id"],
      ),
      ToolDefinition::new(
        "confluence_get_spaces",
        "Get all Confluence spaces",
        json!({"max_results": max_results}),
        &[],
      ),
      ToolDefinition::new(
        "confluence_get_space",
        "Get a specific Confluence space",
        json!({"space_key": string_prop("The space key")}),
        &["space_key"],
      ),
      ToolDefinition::new(
        "confluence_get_page_children",
        "Get child pages of a Confluence page",
        json!({"page_id": string_prop("The parent page ID")}),
        &["page_id"],
      ),
      ToolDefinition::new(
        "confluence_add_comment",
        "Add a comment to a Confluence page",
        json!({
          "page_id": string_prop("The page ID"),
          "comment": string_prop("Comment text to add"),
        }),
        &["page_id", "comment"],
      ),
      ToolDefinition::new(
        "confluence_get_comments",
        "Get all comments for a Confluence page",
        json!({"page_id": string_prop("The page ID")}),
        &["page_id"],
      ),
    ]
  }

  async fn call(&self, name: &str, arguments: Value) -> Result<String> {
    match name {
      "confluence_get_page" => {
        let args: GetPageArgs = parse_args(arguments)?;
        let page = self.client.get_page(&args.page_id, args.expand.as_deref()).await?;
        render(&page)
      }
      "confluence_get_page_by_title" => {
        let args: PageByTitleArgs = parse_args(arguments)?;
        match self.client.get_page_by_title(&args.space_key, &args.title).await? {
          Some(page) => render(&page),
          None => Ok(format!("Page '{}' not found in space {}", args.title, args.space_key)),
        }
      }
      "confluence_search_content" => {
        let args: SearchArgs = parse_args(arguments)?;
        let result = self
          .client
          .search_content(&args.query, args.max_results, args.start_at)
          .await?;
        render(&result)
      }
      "confluence_create_page" => {
        let args: CreatePageArgs = parse_args(arguments)?;
        let page = self
          .client
          .create_page(&args.space_key, &args.title, &args.content, args.parent_page_id.as_deref())
          .await?;
        render(&page)
      }
      "confluence_update_page" => {
        let args: UpdatePageArgs = parse_args(arguments)?;
        let page = self
          .client
          .update_page(&args.page_id, &args.title, &args.content, args.version)
          .await?;
        render(&page)
      }
      "confluence_delete_page" => {
        let args: PageIdArgs = parse_args(arguments)?;
        self.client.delete_page(&args.page_id).await?;
        Ok(format!("Successfully deleted page {}", args.page_id))
      }
      "confluence_get_spaces" => {
        let args: SpacesArgs = parse_args(arguments)?;
        render(&self.client.get_spaces(args.max_results).await?)
      }
      "confluence_get_space" => {
        let args: SpaceKeyArgs = parse_args(arguments)?;
        render(&self.client.get_space(&args.space_key).await?)
      }
      "confluence_get_page_children" => {
        let args: PageIdArgs = parse_args(arguments)?;
        render(&self.client.get_page_children(&args.page_id).await?)
      }
      "confluence_add_comment" => {
        let args: AddCommentArgs = parse_args(arguments)?;
        render(&self.client.add_comment(&args.page_id, &args.comment).await?)
      }
      "confluence_get_comments" => {
        let args: PageIdArgs = parse_args(arguments)?;
        render(&self.client.get_comments(&args.page_id).await?)
      }
      other => bail!("Unknown tool: {other}"),
    }
  }
}
