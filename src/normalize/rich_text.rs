//! Plain-text extraction from structured documents.
//!
//! Issue descriptions and comments may arrive as a recursive node tree
//! (`{"type": "doc", "content": [...]}`) instead of a string. Extraction
//! walks the tree depth-first, left to right, and joins the text leaves with
//! single spaces. It is total: malformed or empty input yields `""`.

use serde_json::{Value, json};

/// Concatenate every text leaf of `document`, separated by single spaces.
///
/// A node is a text leaf when its `type` is `"text"`, or when it has a string
/// `text` field and no `content`. Containers contribute the text of their
/// `content` array; scalars contribute nothing.
pub fn extract_text(document: &Value) -> String {
  let mut parts: Vec<&str> = Vec::new();
  let mut stack: Vec<&Value> = vec![document];

  while let Some(node) = stack.pop() {
    match node {
      Value::Object(map) => {
        let text = map.get("text").and_then(Value::as_str);
        let content = map.get("content");
        let is_leaf = map.get("type").and_then(Value::as_str) == Some("text") || (text.is_some() && content.is_none());

        if is_leaf {
          if let Some(text) = text
            && !text.is_empty()
          {
            parts.push(text);
          }
        } else if let Some(Value::Array(children)) = content {
          stack.extend(children.iter().rev());
        }
      }
      Value::Array(items) => stack.extend(items.iter().rev()),
      _ => {}
    }
  }

  parts.join(" ")
}

/// Wrap plain text in a single-paragraph document.
pub fn text_document(text: &str) -> Value {
  json!({
    "type": "doc",
    "version": 1,
    "content": [{
      "type": "paragraph",
      "content": [{"type": "text", "text": text}]
    }]
  })
}
