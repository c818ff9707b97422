//! Line-delimited JSON-RPC 2.0 server exposing a [`ToolSet`].
//!
//! Each input line is one request; each response is written as one line.
//! Requests without an `id` are notifications and get no response. Logging
//! goes through `tracing` (stderr) because stdout carries the protocol.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, trace, warn};

use crate::tools::{ToolSet, call_tool};

pub const PROTOCOL_VERSION: &str = "2024-11-05";

const PARSE_ERROR: i32 = -32700;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;
const INTERNAL_ERROR: i32 = -32603;

#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
  #[serde(default)]
  id: Option<Value>,
  method: String,
  #[serde(default)]
  params: Option<Value>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct JsonRpcResponse {
  jsonrpc: &'static str,
  id: Option<Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  result: Option<Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct JsonRpcError {
  pub code: i32,
  pub message: String,
}

impl JsonRpcError {
  fn new(code: i32, message: impl Into<String>) -> Self {
    Self {
      code,
      message: message.into(),
    }
  }
}

impl JsonRpcResponse {
  fn reply(id: Option<Value>, outcome: Result<Value, JsonRpcError>) -> Self {
    let (result, error) = match outcome {
      Ok(value) => (Some(value), None),
      Err(error) => (None, Some(error)),
    };
    Self {
      jsonrpc: "2.0",
      id,
      result,
      error,
    }
  }
}

#[derive(Debug, Deserialize)]
struct CallToolParams {
  name: String,
  #[serde(default)]
  arguments: Option<Value>,
}

#[derive(Debug, Serialize)]
struct CallToolResult {
  content: Vec<Content>,
  #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
  is_error: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum Content {
  #[serde(rename = "text")]
  Text { text: String },
}

fn initialize(tools: &dyn ToolSet) -> Value {
  json!({
    "protocolVersion": PROTOCOL_VERSION,
    "capabilities": {"tools": {}},
    "serverInfo": {
      "name": tools.server_name(),
      "version": env!("CARGO_PKG_VERSION"),
    },
  })
}

fn list_tools(tools: &dyn ToolSet) -> Value {
  json!({"tools": tools.definitions()})
}

async fn call(tools: &dyn ToolSet, params: Option<Value>) -> Result<Value, JsonRpcError> {
  let params: CallToolParams = serde_json::from_value(params.unwrap_or(Value::Null))
    .map_err(|e| JsonRpcError::new(INVALID_PARAMS, format!("Invalid params: {e}")))?;

  debug!("Calling tool {}", params.name);
  let outcome = call_tool(tools, &params.name, params.arguments).await;

  let result = CallToolResult {
    content: vec![Content::Text { text: outcome.text }],
    is_error: outcome.is_error.then_some(true),
  };
  serde_json::to_value(result).map_err(|e| JsonRpcError::new(INTERNAL_ERROR, format!("Internal error: {e}")))
}

/// Handle one request line.
///
/// # Returns
/// The response to write, or `None` for notifications.
pub async fn handle_request(line: &str, tools: &dyn ToolSet) -> Option<JsonRpcResponse> {
  let request: JsonRpcRequest = match serde_json::from_str(line) {
    Ok(request) => request,
    Err(e) => {
      return Some(JsonRpcResponse::reply(
        None,
        Err(JsonRpcError::new(PARSE_ERROR, format!("Parse error: {e}"))),
      ));
    }
  };

  let outcome = match request.method.as_str() {
    "initialize" => Ok(initialize(tools)),
    "tools/list" => Ok(list_tools(tools)),
    "tools/call" => call(tools, request.params).await,
    method => Err(JsonRpcError::new(METHOD_NOT_FOUND, format!("Method not found: {method}"))),
  };

  match request.id {
    Some(id) => Some(JsonRpcResponse::reply(Some(id), outcome)),
    None => {
      trace!("Notification {} handled", request.method);
      None
    }
  }
}

/// Serve requests from `reader` until end of input.
///
/// A line that is not valid UTF-8 is answered with a parse error and the
/// loop keeps going.
///
/// # Errors
/// Returns an error if reading or writing the streams fails.
pub async fn serve<R, W>(tools: &dyn ToolSet, mut reader: R, mut writer: W) -> Result<()>
where
  R: AsyncBufRead + Unpin,
  W: AsyncWrite + Unpin,
{
  info!("Serving {} tools over stdio", tools.definitions().len());

  let mut buf = Vec::new();
  loop {
    buf.clear();
    let read = reader
      .read_until(b'\n', &mut buf)
      .await
      .context("Failed to read request")?;
    if read == 0 {
      break;
    }

    let response = match std::str::from_utf8(&buf) {
      Ok(line) => {
        let trimmed = line.trim();
        if trimmed.is_empty() {
          continue;
        }
        trace!("Received: {trimmed}");
        handle_request(trimmed, tools).await
      }
      Err(e) => {
        warn!("Discarding request line that is not valid UTF-8: {e}");
        Some(JsonRpcResponse::reply(
          None,
          Err(JsonRpcError::new(PARSE_ERROR, format!("Parse error: {e}"))),
        ))
      }
    };

    let Some(response) = response else {
      continue;
    };
    let encoded = serde_json::to_string(&response).context("Failed to encode response")?;
    trace!("Sending: {encoded}");

    writer.write_all(encoded.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
  }

  info!("Input closed, shutting down");
  Ok(())
}

/// Serve requests on the process's stdin/stdout.
pub async fn serve_stdio(tools: &dyn ToolSet) -> Result<()> {
  let stdin = tokio::io::BufReader::new(tokio::io::stdin());
  serve(tools, stdin, tokio::io::stdout()).await
}
