//! Trait definitions for the content service.

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{ContentComment, ContentPage, ContentSpace, SearchResult};

/// Content-service operations, independent of the backend schema (enables
/// testing with fake implementations).
#[async_trait]
pub trait ConfluenceApi: Send + Sync {
  /// Fetch a page by ID.
  ///
  /// # Arguments
  /// * `page_id` - Identifier of the page to retrieve.
  /// * `expand` - Fields to expand on the standard API; `None` uses
  ///   `body.storage,version,space`. Ignored by the custom API.
  async fn get_page(&self, page_id: &str, expand: Option<&[String]>) -> Result<ContentPage>;

  /// Look a page up by exact title inside a space.
  ///
  /// # Returns
  /// `Ok(None)` when no page matches.
  async fn get_page_by_title(&self, space_key: &str, title: &str) -> Result<Option<ContentPage>>;

  /// Search pages. The custom API receives a bag of terms derived from
  /// `query`.
  async fn search_content(&self, query: &str, limit: Option<usize>, start: usize) -> Result<SearchResult<ContentPage>>;

  /// Create a page, optionally under `parent_id`.
  async fn create_page(
    &self,
    space_key: &str,
    title: &str,
    content: &str,
    parent_id: Option<&str>,
  ) -> Result<ContentPage>;

  /// Replace a page's title and body.
  ///
  /// # Arguments
  /// * `version` - The version the caller last read; the request carries
  ///   `version + 1`.
  async fn update_page(&self, page_id: &str, title: &str, content: &str, version: u64) -> Result<ContentPage>;

  async fn delete_page(&self, page_id: &str) -> Result<()>;

  /// List spaces, up to `limit` (default page size when `None`).
  async fn get_spaces(&self, limit: Option<usize>) -> Result<Vec<ContentSpace>>;

  /// Fetch a space by key.
  ///
  /// # Errors
  /// On the custom API, fails with `Space <key> not found` when no listed
  /// space has a matching key or name.
  async fn get_space(&self, space_key: &str) -> Result<ContentSpace>;

  /// Direct children of a page. On the custom API a failed request yields an
  /// empty list.
  async fn get_page_children(&self, page_id: &str) -> Result<Vec<ContentPage>>;

  async fn add_comment(&self, page_id: &str, comment: &str) -> Result<ContentComment>;

  /// Comments on a page. On the custom API a failed request yields an empty
  /// list.
  async fn get_comments(&self, page_id: &str) -> Result<Vec<ContentComment>>;
}
