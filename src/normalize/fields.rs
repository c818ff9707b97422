//! Ordered alias lookups over loosely-shaped JSON objects.
//!
//! Custom backends disagree on field names across deployments, so each
//! canonical field is described by an ordered list of alias keys. The first
//! alias holding a *present* value wins. A value is present unless it is
//! `null`, `false`, an empty string, or an empty array/object; numbers are
//! always present.

use serde_json::{Map, Value};

use super::rich_text::extract_text;

/// Read-only view over a JSON object.
///
/// Any non-object value (including a missing one) behaves like an empty
/// object, so lookups never fail.
#[derive(Debug, Clone, Copy)]
pub struct RawObject<'a> {
  map: Option<&'a Map<String, Value>>,
}

impl<'a> RawObject<'a> {
  pub fn new(value: &'a Value) -> Self {
    Self { map: value.as_object() }
  }

  fn empty() -> Self {
    Self { map: None }
  }

  /// Raw value stored under `key`.
  pub fn get(&self, key: &str) -> Option<&'a Value> {
    self.map.and_then(|map| map.get(key))
  }

  /// Nested object under `key`; empty when absent or not an object.
  pub fn child(&self, key: &str) -> RawObject<'a> {
    self.get(key).map(RawObject::new).unwrap_or_else(RawObject::empty)
  }

  /// Nested object reached by following `keys`.
  pub fn path(&self, keys: &[&str]) -> RawObject<'a> {
    keys.iter().fold(*self, |obj, key| obj.child(key))
  }

  /// Scalar under exactly `key`, rendered as a string.
  pub fn string(&self, key: &str) -> Option<String> {
    self.get(key).and_then(scalar_to_string)
  }

  /// Non-negative integer under exactly `key`.
  pub fn number(&self, key: &str) -> Option<u64> {
    self.get(key).and_then(scalar_to_u64)
  }

  /// First present value among `aliases`.
  pub fn first(&self, aliases: &[&str]) -> Option<&'a Value> {
    aliases
      .iter()
      .find_map(|key| self.get(key).filter(|value| is_present(value)))
  }

  /// First present scalar among `aliases`, rendered as a string.
  ///
  /// Aliases holding objects or arrays are skipped.
  pub fn first_string(&self, aliases: &[&str]) -> Option<String> {
    aliases.iter().find_map(|key| {
      self
        .get(key)
        .filter(|value| is_present(value))
        .and_then(scalar_to_string)
    })
  }

  /// First present integer among `aliases`; numeric strings are accepted.
  pub fn first_number(&self, aliases: &[&str]) -> Option<u64> {
    aliases.iter().find_map(|key| {
      self
        .get(key)
        .filter(|value| is_present(value))
        .and_then(scalar_to_u64)
    })
  }

  /// First present value among `aliases` as plain text.
  ///
  /// Strings and numbers are taken as-is; structured documents are flattened
  /// with [`extract_text`].
  pub fn first_text(&self, aliases: &[&str]) -> Option<String> {
    self.first(aliases).map(|value| match value {
      Value::Object(_) | Value::Array(_) => extract_text(value),
      other => scalar_to_string(other).unwrap_or_default(),
    })
  }

  /// Items of the first alias that holds an array, present or not.
  ///
  /// Mirrors `data.get(a, data.get(b, []))`: an existing but empty array
  /// under an earlier alias still wins.
  pub fn first_array(&self, aliases: &[&str]) -> &'a [Value] {
    aliases
      .iter()
      .find_map(|key| self.get(key).and_then(Value::as_array))
      .map(Vec::as_slice)
      .unwrap_or(&[])
  }

  /// Strings of the first present array among `aliases`.
  pub fn string_list(&self, aliases: &[&str]) -> Vec<String> {
    aliases
      .iter()
      .find_map(|key| self.get(key).filter(|value| is_present(value)).and_then(Value::as_array))
      .map(|items| items.iter().filter_map(scalar_to_string).collect())
      .unwrap_or_default()
  }
}

/// Items of a list response.
///
/// A top-level array is returned directly; otherwise the first of
/// `aliases` holding an array is used.
pub fn list_items<'a>(raw: &'a Value, aliases: &[&str]) -> &'a [Value] {
  match raw {
    Value::Array(items) => items,
    other => RawObject::new(other).first_array(aliases),
  }
}

/// Whether a value counts as present for alias resolution.
pub fn is_present(value: &Value) -> bool {
  match value {
    Value::Null => false,
    Value::Bool(flag) => *flag,
    Value::Number(_) => true,
    Value::String(s) => !s.is_empty(),
    Value::Array(items) => !items.is_empty(),
    Value::Object(map) => !map.is_empty(),
  }
}

/// Render a string or number as a `String`.
pub fn scalar_to_string(value: &Value) -> Option<String> {
  match value {
    Value::String(s) => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    _ => None,
  }
}

fn scalar_to_u64(value: &Value) -> Option<u64> {
  match value {
    Value::Number(n) => n.as_u64(),
    Value::String(s) => s.trim().parse().ok(),
    _ => None,
  }
}
