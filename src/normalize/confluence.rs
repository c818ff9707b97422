//! Normalizers for content pages, spaces and comments.
//!
//! Standard responses follow the documented REST schema and are read from
//! fixed paths. Custom responses are resolved through the alias tables below,
//! in order.

use serde_json::Value;

use super::fields::{RawObject, list_items, scalar_to_string};
use super::user::resolve_user;
use crate::models::{ContentComment, ContentPage, ContentSpace, SearchResult};

pub const PAGE_ID: &[&str] = &["id", "page_id"];
pub const PAGE_TITLE: &[&str] = &["title", "name"];
pub const PAGE_CONTENT: &[&str] = &["content", "body", "text"];
pub const PAGE_CONTAINER: &[&str] = &["space", "space_key", "namespace"];
pub const PAGE_STATUS: &[&str] = &["status"];
pub const PAGE_VERSION: &[&str] = &["version", "revision"];
pub const PAGE_CREATED: &[&str] = &["created", "created_at"];
pub const PAGE_UPDATED: &[&str] = &["updated", "updated_at"];
pub const PAGE_CREATED_BY: &[&str] = &["created_by", "author"];
pub const PAGE_UPDATED_BY: &[&str] = &["updated_by", "author"];
pub const PAGE_URL: &[&str] = &["url", "link"];

pub const SPACE_KEY: &[&str] = &["key", "id", "code"];
pub const SPACE_NAME: &[&str] = &["name", "title"];
pub const SPACE_DESCRIPTION: &[&str] = &["description"];
pub const SPACE_TYPE: &[&str] = &["type"];
pub const SPACE_URL: &[&str] = &["url", "link"];

pub const COMMENT_ID: &[&str] = &["id", "comment_id"];
pub const COMMENT_CONTENT: &[&str] = &["comment", "body", "content"];
pub const COMMENT_AUTHOR: &[&str] = &["author", "user", "created_by"];
pub const COMMENT_CREATED: &[&str] = &["created", "created_at"];
pub const COMMENT_UPDATED: &[&str] = &["updated", "updated_at"];

/// List keys of custom page collections (search results, title lookups).
pub const CUSTOM_PAGE_LIST: &[&str] = &["pages", "data", "results"];
pub const CUSTOM_CHILDREN_LIST: &[&str] = &["children", "data"];
pub const CUSTOM_SPACE_LIST: &[&str] = &["spaces", "data"];
pub const CUSTOM_COMMENT_LIST: &[&str] = &["comments", "data"];
/// List key of every standard collection.
pub const STANDARD_LIST: &[&str] = &["results"];

const DEFAULT_PAGE_STATUS: &str = "current";
const DEFAULT_SPACE_TYPE: &str = "global";
const UNKNOWN_AUTHOR: &str = "Unknown";

/// Normalize a standard content response.
pub fn page_from_standard(raw: &Value) -> ContentPage {
  let data = RawObject::new(raw);
  let space = data.child("space");
  let version = data.child("version");
  let history = data.child("history");

  ContentPage {
    id: data.string("id").unwrap_or_default(),
    title: data.string("title").unwrap_or_default(),
    content: Some(data.path(&["body", "storage"]).string("value").unwrap_or_default()),
    space_key: space.string("key"),
    space_name: space.string("name"),
    status: data.string("status"),
    version: version.number("number"),
    created: history.string("createdDate"),
    updated: version.string("when"),
    created_by: history.child("createdBy").string("displayName"),
    updated_by: version.child("by").string("displayName"),
    url: data.child("_links").string("webui"),
  }
}

/// Normalize a custom page response.
///
/// The container may be a bare key (used as both key and name) or an object
/// with `key` and `name`.
pub fn page_from_custom(raw: &Value) -> ContentPage {
  let data = RawObject::new(raw);

  let (space_key, space_name) = match data.first(PAGE_CONTAINER) {
    Some(container @ Value::Object(_)) => {
      let container = RawObject::new(container);
      (container.string("key"), container.string("name"))
    }
    Some(container) => {
      let key = scalar_to_string(container);
      (key.clone(), key)
    }
    None => (None, None),
  };

  ContentPage {
    id: data.first_string(PAGE_ID).unwrap_or_default(),
    title: data.first_string(PAGE_TITLE).unwrap_or_default(),
    content: Some(data.first_text(PAGE_CONTENT).unwrap_or_default()),
    space_key,
    space_name,
    status: Some(
      data
        .first_string(PAGE_STATUS)
        .unwrap_or_else(|| DEFAULT_PAGE_STATUS.to_string()),
    ),
    version: data.first_number(PAGE_VERSION),
    created: data.first_string(PAGE_CREATED),
    updated: data.first_string(PAGE_UPDATED),
    created_by: resolve_user(data.first(PAGE_CREATED_BY)),
    updated_by: resolve_user(data.first(PAGE_UPDATED_BY)),
    url: data.first_string(PAGE_URL),
  }
}

/// Normalize a standard space response.
pub fn space_from_standard(raw: &Value) -> ContentSpace {
  let data = RawObject::new(raw);

  ContentSpace {
    key: data.string("key").unwrap_or_default(),
    name: data.string("name").unwrap_or_default(),
    description: data.path(&["description", "plain"]).string("value"),
    space_type: data.string("type"),
    url: data.child("_links").string("webui"),
  }
}

/// Normalize a custom space response.
pub fn space_from_custom(raw: &Value) -> ContentSpace {
  let data = RawObject::new(raw);

  ContentSpace {
    key: data.first_string(SPACE_KEY).unwrap_or_default(),
    name: data.first_string(SPACE_NAME).unwrap_or_default(),
    description: data.first_text(SPACE_DESCRIPTION),
    space_type: Some(
      data
        .first_string(SPACE_TYPE)
        .unwrap_or_else(|| DEFAULT_SPACE_TYPE.to_string()),
    ),
    url: data.first_string(SPACE_URL),
  }
}

/// Normalize a standard comment response.
///
/// The API only exposes the last-modified stamp, so it fills both `created`
/// and `updated`.
pub fn comment_from_standard(raw: &Value) -> ContentComment {
  let data = RawObject::new(raw);
  let version = data.child("version");

  ContentComment {
    id: data.string("id").unwrap_or_default(),
    content: data.path(&["body", "storage"]).string("value").unwrap_or_default(),
    author: version
      .child("by")
      .string("displayName")
      .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
    created: version.string("when").unwrap_or_default(),
    updated: version.string("when"),
  }
}

/// Normalize a custom comment response.
pub fn comment_from_custom(raw: &Value) -> ContentComment {
  let data = RawObject::new(raw);

  ContentComment {
    id: data.first_string(COMMENT_ID).unwrap_or_default(),
    content: data.first_text(COMMENT_CONTENT).unwrap_or_default(),
    author: resolve_user(data.first(COMMENT_AUTHOR)).unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
    created: data.first_string(COMMENT_CREATED).unwrap_or_default(),
    updated: data.first_string(COMMENT_UPDATED),
  }
}

/// Normalize a standard content search response.
///
/// Paging fields reported by the server win over the requested ones.
pub fn page_search_from_standard(raw: &Value, limit: u64, start: u64) -> SearchResult<ContentPage> {
  let data = RawObject::new(raw);

  SearchResult {
    results: list_items(raw, STANDARD_LIST).iter().map(page_from_standard).collect(),
    start: data.number("start").unwrap_or(start),
    limit: data.number("limit").unwrap_or(limit),
    size: data.number("size").unwrap_or(0),
  }
}

/// Normalize a custom page search response; `size` is the number of pages
/// returned.
pub fn page_search_from_custom(raw: &Value, limit: u64, start: u64) -> SearchResult<ContentPage> {
  let results: Vec<ContentPage> = list_items(raw, CUSTOM_PAGE_LIST).iter().map(page_from_custom).collect();
  let size = results.len() as u64;

  SearchResult {
    results,
    start,
    limit,
    size,
  }
}
