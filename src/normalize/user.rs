//! Resolution of user references (assignee, reporter, lead, author).

use serde_json::Value;

use super::fields::{RawObject, scalar_to_string};

/// A user reference as it arrives from a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRef {
  Absent,
  /// A bare name or email.
  Plain(String),
  /// An object carrying some of `name`, `displayName`, `email`.
  Structured {
    name: Option<String>,
    display_name: Option<String>,
    email: Option<String>,
  },
}

impl UserRef {
  pub fn from_value(value: Option<&Value>) -> Self {
    match value {
      None | Some(Value::Null) => Self::Absent,
      Some(Value::String(s)) if s.is_empty() => Self::Absent,
      Some(object @ Value::Object(_)) => {
        let obj = RawObject::new(object);
        Self::Structured {
          name: obj.first_string(&["name"]),
          display_name: obj.first_string(&["displayName"]),
          email: obj.first_string(&["email"]),
        }
      }
      Some(other) => scalar_to_string(other).map(Self::Plain).unwrap_or(Self::Absent),
    }
  }

  /// The best available name: the string itself, or the first of
  /// `name`, `displayName`, `email`.
  pub fn resolve(self) -> Option<String> {
    match self {
      Self::Absent => None,
      Self::Plain(name) => Some(name),
      Self::Structured {
        name,
        display_name,
        email,
      } => name.or(display_name).or(email),
    }
  }
}

/// Resolve a raw user reference to a display string.
pub fn resolve_user(value: Option<&Value>) -> Option<String> {
  UserRef::from_value(value).resolve()
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_plain_string_resolves_to_itself() {
    assert_eq!(resolve_user(Some(&json!("alice"))), Some("alice".to_string()));
  }

  #[test]
  fn test_structured_prefers_name_then_display_name_then_email() {
    let user = json!({"email": "a@example.com", "displayName": "Alice A", "name": "alice"});
    assert_eq!(resolve_user(Some(&user)), Some("alice".to_string()));

    let user = json!({"email": "a@example.com", "displayName": "Alice A"});
    assert_eq!(resolve_user(Some(&user)), Some("Alice A".to_string()));

    let user = json!({"email": "a@example.com", "name": ""});
    assert_eq!(resolve_user(Some(&user)), Some("a@example.com".to_string()));
  }

  #[test]
  fn test_absent_values_resolve_to_none() {
    assert_eq!(resolve_user(None), None);
    assert_eq!(resolve_user(Some(&Value::Null)), None);
    assert_eq!(resolve_user(Some(&json!(""))), None);
    assert_eq!(resolve_user(Some(&json!({}))), None);
    assert_eq!(resolve_user(Some(&json!(false))), None);
  }

  #[test]
  fn test_from_value_tags_the_shape() {
    assert_eq!(UserRef::from_value(Some(&json!("bob"))), UserRef::Plain("bob".to_string()));
    assert_eq!(
      UserRef::from_value(Some(&json!({"displayName": "Bob"}))),
      UserRef::Structured {
        name: None,
        display_name: Some("Bob".to_string()),
        email: None,
      }
    );
  }
}
