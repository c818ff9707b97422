//! Content-service client dispatching to the standard or custom API.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::warn;

use super::api::ConfluenceApi;
use crate::config::{BackendMode, ClientOptions, Config};
use crate::models::{ContentComment, ContentPage, ContentSpace, SearchResult};
use crate::normalize::confluence::{
  CUSTOM_CHILDREN_LIST, CUSTOM_COMMENT_LIST, CUSTOM_PAGE_LIST, CUSTOM_SPACE_LIST, PAGE_TITLE, STANDARD_LIST,
  comment_from_custom, comment_from_standard, page_from_custom, page_from_standard, page_search_from_custom,
  page_search_from_standard, space_from_custom, space_from_standard,
};
use crate::normalize::{RawObject, content_query_terms, list_items};
use crate::transport::{ApiRequest, HttpTransport, REQUEST_TIMEOUT_SECS, Transport};

const DEFAULT_PAGE_EXPAND: &str = "body.storage,version,space";
const SEARCH_EXPAND: &str = "body.storage,space,version";
const SPACE_EXPAND: &str = "description,homepage";
const COMMENT_EXPAND: &str = "body.storage,version";

/// Content-service client.
#[derive(Clone)]
pub struct ConfluenceClient {
  transport: Arc<dyn Transport>,
  options: ClientOptions,
}

impl ConfluenceClient {
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

  async fn custom_children(&self, page_id: &str) -> Result<Vec<ContentPage>> {
    let raw = self
      .transport
      .send(ApiRequest::get(self.custom(&format!("/pages/{page_id}/children"))))
      .await?;
    Ok(list_items(&raw, CUSTOM_CHILDREN_LIST).iter().map(page_from_custom).collect())
  }

  async fn custom_comments(&self, page_id: &str) -> Result<Vec<ContentComment>> {
    let raw = self
      .transport
      .send(ApiRequest::get(self.custom(&format!("/pages/{page_id}/comments"))))
      .await?;
    Ok(list_items(&raw, CUSTOM_COMMENT_LIST).iter().map(comment_from_custom).collect())
  }
}

fn storage_body(value: &str) -> Value {
  json!({
    "storage": {
      "value": value,
      "representation": "storage"
    }
  })
}

#[async_trait]
impl ConfluenceApi for ConfluenceClient {
  async fn get_page(&self, page_id: &str, expand: Option<&[String]>) -> Result<ContentPage> {
    let page = match self.options.mode {
      BackendMode::Custom => {
        let raw = self
          .transport
          .send(ApiRequest::get(self.custom(&format!("/pages/{page_id}"))))
          .await
          .with_context(|| format!("Failed to fetch page {page_id}"))?;
        page_from_custom(&raw)
      }
      BackendMode::Standard => {
        let expand = expand.map_or_else(|| DEFAULT_PAGE_EXPAND.to_string(), |fields| fields.join(","));
        let raw = self
          .transport
          .send(ApiRequest::get(format!("/rest/api/content/{page_id}")).query("expand", expand))
          .await
          .with_context(|| format!("Failed to fetch page {page_id}"))?;
        page_from_standard(&raw)
      }
    };

    Ok(page)
  }

  async fn get_page_by_title(&self, space_key: &str, title: &str) -> Result<Option<ContentPage>> {
    if self.is_custom() {
      let request = ApiRequest::get(self.custom("/pages/search"))
        .query("q", title)
        .query("space", space_key)
        .query("limit", 1);
      let raw = self
        .transport
        .send(request)
        .await
        .with_context(|| format!("Failed to look up page '{title}' in space {space_key}"))?;

      let wanted = title.to_lowercase();
      let page = list_items(&raw, CUSTOM_PAGE_LIST)
        .iter()
        .find(|item| {
          RawObject::new(item)
            .first_string(PAGE_TITLE)
            .is_some_and(|candidate| candidate.to_lowercase() == wanted)
        })
        .map(page_from_custom);
      return Ok(page);
    }

    let request = ApiRequest::get("/rest/api/content")
      .query("spaceKey", space_key)
      .query("title", title)
      .query("expand", DEFAULT_PAGE_EXPAND);
    let raw = self
      .transport
      .send(request)
      .await
      .with_context(|| format!("Failed to look up page '{title}' in space {space_key}"))?;

    Ok(list_items(&raw, STANDARD_LIST).first().map(page_from_standard))
  }

  async fn search_content(&self, query: &str, limit: Option<usize>, start: usize) -> Result<SearchResult<ContentPage>> {
    let limit = self.options.page_size(limit);

    if self.is_custom() {
      let request = ApiRequest::get(self.custom("/pages/search"))
        .query("q", content_query_terms(query))
        .query("limit", limit)
        .query("offset", start);
      let raw = self.transport.send(request).await.context("Failed to search content")?;
      return Ok(page_search_from_custom(&raw, limit as u64, start as u64));
    }

    let request = ApiRequest::get("/rest/api/content/search")
      .query("cql", query)
      .query("limit", limit)
      .query("start", start)
      .query("expand", SEARCH_EXPAND);
    let raw = self.transport.send(request).await.context("Failed to search content")?;
    Ok(page_search_from_standard(&raw, limit as u64, start as u64))
  }

  async fn create_page(
    &self,
    space_key: &str,
    title: &str,
    content: &str,
    parent_id: Option<&str>,
  ) -> Result<ContentPage> {
    let parent_id = parent_id.filter(|id| !id.is_empty());

    if self.is_custom() {
      let mut payload = json!({
        "title": title,
        "content": content,
        "space": space_key,
      });
      if let Some(parent_id) = parent_id {
        payload["parent_id"] = json!(parent_id);
      }

      let raw = self
        .transport
        .send(ApiRequest::post(self.custom("/pages"), payload))
        .await
        .with_context(|| format!("Failed to create page '{title}' in space {space_key}"))?;
      return Ok(page_from_custom(&raw));
    }

    let mut payload = json!({
      "type": "page",
      "title": title,
      "space": {"key": space_key},
      "body": storage_body(content),
    });
    if let Some(parent_id) = parent_id {
      payload["ancestors"] = json!([{"id": parent_id}]);
    }

    let raw = self
      .transport
      .send(ApiRequest::post("/rest/api/content", payload))
      .await
      .with_context(|| format!("Failed to create page '{title}' in space {space_key}"))?;
    Ok(page_from_standard(&raw))
  }

  async fn update_page(&self, page_id: &str, title: &str, content: &str, version: u64) -> Result<ContentPage> {
    let next_version = version.saturating_add(1);

    if self.is_custom() {
      let payload = json!({
        "title": title,
        "content": content,
        "version": next_version,
      });
      let raw = self
        .transport
        .send(ApiRequest::put(self.custom(&format!("/pages/{page_id}")), payload))
        .await
        .with_context(|| format!("Failed to update page {page_id}"))?;
      return Ok(page_from_custom(&raw));
    }

    let payload = json!({
      "version": {"number": next_version},
      "title": title,
      "type": "page",
      "body": storage_body(content),
    });
    let raw = self
      .transport
      .send(ApiRequest::put(format!("/rest/api/content/{page_id}"), payload))
      .await
      .with_context(|| format!("Failed to update page {page_id}"))?;
    Ok(page_from_standard(&raw))
  }

  async fn delete_page(&self, page_id: &str) -> Result<()> {
    let path = match self.options.mode {
      BackendMode::Custom => self.custom(&format!("/pages/{page_id}")),
      BackendMode::Standard => format!("/rest/api/content/{page_id}"),
    };

    self
      .transport
      .send(ApiRequest::delete(path))
      .await
      .with_context(|| format!("Failed to delete page {page_id}"))?;
    Ok(())
  }

  async fn get_spaces(&self, limit: Option<usize>) -> Result<Vec<ContentSpace>> {
    let limit = self.options.page_size(limit);

    if self.is_custom() {
      let raw = self
        .transport
        .send(ApiRequest::get(self.custom("/spaces")).query("limit", limit))
        .await
        .context("Failed to list spaces")?;
      return Ok(list_items(&raw, CUSTOM_SPACE_LIST).iter().map(space_from_custom).collect());
    }

    let raw = self
      .transport
      .send(ApiRequest::get("/rest/api/space").query("limit", limit))
      .await
      .context("Failed to list spaces")?;
    Ok(list_items(&raw, STANDARD_LIST).iter().map(space_from_standard).collect())
  }

  async fn get_space(&self, space_key: &str) -> Result<ContentSpace> {
    if self.is_custom() {
      let spaces = self.get_spaces(None).await?;
      return match spaces
        .into_iter()
        .find(|space| space.key == space_key || space.name == space_key)
      {
        Some(space) => Ok(space),
        None => bail!("Space {space_key} not found"),
      };
    }

    let raw = self
      .transport
      .send(ApiRequest::get(format!("/rest/api/space/{space_key}")).query("expand", SPACE_EXPAND))
      .await
      .with_context(|| format!("Failed to fetch space {space_key}"))?;
    Ok(space_from_standard(&raw))
  }

  async fn get_page_children(&self, page_id: &str) -> Result<Vec<ContentPage>> {
    if self.is_custom() {
      return match self.custom_children(page_id).await {
        Ok(children) => Ok(children),
        Err(err) => {
          warn!("Ignoring failure listing children of page {page_id}: {err:#}");
          Ok(Vec::new())
        }
      };
    }

    let request =
      ApiRequest::get(format!("/rest/api/content/{page_id}/child/page")).query("expand", SEARCH_EXPAND);
    let raw = self
      .transport
      .send(request)
      .await
      .with_context(|| format!("Failed to list children of page {page_id}"))?;
    Ok(list_items(&raw, STANDARD_LIST).iter().map(page_from_standard).collect())
  }

  async fn add_comment(&self, page_id: &str, comment: &str) -> Result<ContentComment> {
    if self.is_custom() {
      let raw = self
        .transport
        .send(ApiRequest::post(
          self.custom(&format!("/pages/{page_id}/comments")),
          json!({"comment": comment}),
        ))
        .await
        .with_context(|| format!("Failed to comment on page {page_id}"))?;
      return Ok(comment_from_custom(&raw));
    }

    let payload = json!({
      "type": "comment",
      "container": {"id": page_id},
      "body": storage_body(comment),
    });
    let raw = self
      .transport
      .send(ApiRequest::post("/rest/api/content", payload))
      .await
      .with_context(|| format!("Failed to comment on page {page_id}"))?;
    Ok(comment_from_standard(&raw))
  }

  async fn get_comments(&self, page_id: &str) -> Result<Vec<ContentComment>> {
    if self.is_custom() {
      return match self.custom_comments(page_id).await {
        Ok(comments) => Ok(comments),
        Err(err) => {
          warn!("Ignoring failure listing comments of page {page_id}: {err:#}");
          Ok(Vec::new())
        }
      };
    }

    let request =
      ApiRequest::get(format!("/rest/api/content/{page_id}/child/comment")).query("expand", COMMENT_EXPAND);
    let raw = self
      .transport
      .send(request)
      .await
      .with_context(|| format!("Failed to list comments of page {page_id}"))?;
    Ok(list_items(&raw, STANDARD_LIST).iter().map(comment_from_standard).collect())
  }
}
