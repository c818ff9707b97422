//! Dual-schema normalization.
//!
//! Every entity has a `*_from_standard` normalizer reading the documented REST
//! schema and a `*_from_custom` normalizer resolving alias chains over the
//! looser custom schema. Normalizers never fail: missing fields become
//! `None`, `""` or an empty list.

pub mod confluence;
pub mod fields;
pub mod jira;
pub mod query;
pub mod rich_text;
pub mod user;

pub use fields::{RawObject, is_present, list_items};
pub use query::{CURRENT_USER, IssueFilters, content_query_terms, issue_query_filters};
pub use rich_text::{extract_text, text_document};
pub use user::{UserRef, resolve_user};
