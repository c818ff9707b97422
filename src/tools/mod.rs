//! Named tools exposed over the JSON-RPC server.
//!
//! Each service contributes a [`ToolSet`]. Tool arguments arrive as a loose
//! JSON object and are deserialized into per-tool argument structs; results
//! are returned as text (pretty-printed JSON or a short status line).

pub mod confluence;
pub mod jira;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};
use tracing::error;

pub use confluence::ConfluenceTools;
pub use jira::JiraTools;

/// Declaration of a tool as advertised by `tools/list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
  pub name: String,
  pub description: String,
  #[serde(rename = "inputSchema")]
  pub input_schema: Value,
}

impl ToolDefinition {
  /// Build a definition with an object schema.
  ///
  /// # Arguments
  /// * `properties` - JSON schema of each argument
  /// * `required` - Names of the mandatory arguments
  pub fn new(name: &str, description: &str, properties: Value, required: &[&str]) -> Self {
    let mut input_schema = json!({
      "type": "object",
      "properties": properties,
    });
    if !required.is_empty() {
      input_schema["required"] = json!(required);
    }

    Self {
      name: name.to_string(),
      description: description.to_string(),
      input_schema,
    }
  }
}

/// A family of tools backed by one service client.
#[async_trait]
pub trait ToolSet: Send + Sync {
  /// Name reported in the `initialize` handshake.
  fn server_name(&self) -> &'static str;

  fn definitions(&self) -> Vec<ToolDefinition>;

  /// Run `name` with `arguments` and render its result as text.
  ///
  /// # Errors
  /// Fails on unknown tools, invalid arguments and backend failures.
  async fn call(&self, name: &str, arguments: Value) -> Result<String>;
}

/// Result of a tool invocation as reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutcome {
  pub text: String,
  pub is_error: bool,
}

/// Invoke a tool, turning any failure into an error outcome.
pub async fn call_tool(tools: &dyn ToolSet, name: &str, arguments: Option<Value>) -> ToolOutcome {
  match tools.call(name, arguments.unwrap_or(Value::Null)).await {
    Ok(text) => ToolOutcome { text, is_error: false },
    Err(err) => {
      let text = format!("Error executing tool {name}: {err:#}");
      error!("{text}");
      ToolOutcome { text, is_error: true }
    }
  }
}

/// Deserialize tool arguments; a missing argument object counts as `{}`.
pub(crate) fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T> {
  let arguments = match arguments {
    Value::Null => json!({}),
    other => other,
  };
  serde_json::from_value(arguments).context("Invalid arguments")
}

/// Whole number from an integer or an integral float such as `5.0`.
fn whole_number(value: &Value) -> Option<u64> {
  value.as_u64().or_else(|| {
    value
      .as_f64()
      .filter(|n| n.fract() == 0.0 && *n >= 0.0 && *n <= u64::MAX as f64)
      .map(|n| n as u64)
  })
}

fn expect_whole_number<E: de::Error>(value: &Value) -> Result<u64, E> {
  whole_number(value).ok_or_else(|| E::custom(format!("expected a non-negative whole number, found {value}")))
}

/// Deserialize a numeric argument declared as a JSON schema `number`.
pub(crate) fn number_arg<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
  expect_whole_number(&Value::deserialize(deserializer)?)
}

/// Like [`number_arg`], for counts and offsets.
pub(crate) fn count_arg<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
  let value = Value::deserialize(deserializer)?;
  usize::try_from(expect_whole_number::<D::Error>(&value)?).map_err(de::Error::custom)
}

/// Like [`count_arg`]; `null` counts as absent.
pub(crate) fn optional_count_arg<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<usize>, D::Error> {
  match Value::deserialize(deserializer)? {
    Value::Null => Ok(None),
    value => usize::try_from(expect_whole_number::<D::Error>(&value)?)
      .map(Some)
      .map_err(de::Error::custom),
  }
}

/// Pretty-print a result for the caller.
pub(crate) fn render<T: Serialize>(value: &T) -> Result<String> {
  serde_json::to_string_pretty(value).context("Failed to serialize tool result")
}
