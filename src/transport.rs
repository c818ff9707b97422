//! HTTP transport shared by the service clients.
//!
//! Clients describe requests as [`ApiRequest`] values and hand them to a
//! [`Transport`]. The production implementation is [`HttpTransport`]; tests
//! substitute a fake that records requests and replays canned bodies.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::auth::Auth;

/// Timeout applied to every request, in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// HTTP verbs used by the clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
  Get,
  Post,
  Put,
  Delete,
}

impl HttpMethod {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Get => "GET",
      Self::Post => "POST",
      Self::Put => "PUT",
      Self::Delete => "DELETE",
    }
  }
}

impl fmt::Display for HttpMethod {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A single request relative to the backend base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
  pub method: HttpMethod,
  /// Path beginning with `/`, appended verbatim to the base URL.
  pub path: String,
  /// Query parameters in insertion order.
  pub query: Vec<(String, String)>,
  /// JSON payload, if any.
  pub body: Option<Value>,
}

impl ApiRequest {
  fn new(method: HttpMethod, path: impl Into<String>, body: Option<Value>) -> Self {
    Self {
      method,
      path: path.into(),
      query: Vec::new(),
      body,
    }
  }

  pub fn get(path: impl Into<String>) -> Self {
    Self::new(HttpMethod::Get, path, None)
  }

  pub fn post(path: impl Into<String>, body: Value) -> Self {
    Self::new(HttpMethod::Post, path, Some(body))
  }

  pub fn put(path: impl Into<String>, body: Value) -> Self {
    Self::new(HttpMethod::Put, path, Some(body))
  }

  pub fn delete(path: impl Into<String>) -> Self {
    Self::new(HttpMethod::Delete, path, None)
  }

  /// Append a query parameter.
  pub fn query(mut self, key: &str, value: impl ToString) -> Self {
    self.query.push((key.to_string(), value.to_string()));
    self
  }

  /// Value of the last query parameter named `key`.
  pub fn query_param(&self, key: &str) -> Option<&str> {
    self
      .query
      .iter()
      .rev()
      .find(|(k, _)| k == key)
      .map(|(_, v)| v.as_str())
  }
}

/// Failure of a single request. No retries are attempted for any variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
  /// The server answered with a non-2xx status.
  Status { status: u16, body: String },
  /// The request never produced a response (connection, TLS, timeout).
  Transport(String),
  /// The response body was not valid JSON.
  Decode(String),
}

impl fmt::Display for RequestError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Status { status, body } => write!(f, "request failed with status {status}: {body}"),
      Self::Transport(msg) => write!(f, "request failed: {msg}"),
      Self::Decode(msg) => write!(f, "failed to decode response body: {msg}"),
    }
  }
}

impl std::error::Error for RequestError {}

/// Sends requests to a backend and returns decoded JSON bodies.
#[async_trait]
pub trait Transport: Send + Sync {
  /// Perform one request/response round trip.
  ///
  /// # Returns
  /// The decoded JSON body, or `Value::Null` when the body is empty.
  ///
  /// # Errors
  /// Returns a [`RequestError`] (wrapped in `anyhow`) on non-2xx responses,
  /// network failures, or undecodable bodies.
  async fn send(&self, request: ApiRequest) -> Result<Value>;
}

/// `reqwest`-backed transport with static credentials.
pub struct HttpTransport {
  base_url: String,
  auth: Auth,
  client: reqwest::Client,
}

impl HttpTransport {
  /// Create a new transport.
  ///
  /// # Arguments
  /// * `base_url` - Backend root, e.g. `https://example.atlassian.net/wiki`
  /// * `auth` - Credentials attached to every request
  /// * `timeout_secs` - Request timeout in seconds
  ///
  /// # Errors
  /// Returns an error if the underlying `reqwest::Client` cannot be built.
  pub fn new(base_url: impl Into<String>, auth: Auth, timeout_secs: u64) -> Result<Self> {
    let base_url = base_url.into().trim_end_matches('/').to_string();

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(timeout_secs))
      .user_agent(format!("atlas-bridge/{}", env!("CARGO_PKG_VERSION")))
      .build()
      .context("Failed to create HTTP client")?;

    Ok(Self { base_url, auth, client })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url, path)
  }
}

#[async_trait]
impl Transport for HttpTransport {
  async fn send(&self, request: ApiRequest) -> Result<Value> {
    let url = self.url(&request.path);
    debug!("{} {}", request.method, url);

    let method = match request.method {
      HttpMethod::Get => reqwest::Method::GET,
      HttpMethod::Post => reqwest::Method::POST,
      HttpMethod::Put => reqwest::Method::PUT,
      HttpMethod::Delete => reqwest::Method::DELETE,
    };

    let mut builder = self
      .client
      .request(method, &url)
      .header("Authorization", self.auth.header_value())
      .header("Accept", "application/json")
      .header("Content-Type", "application/json");

    if !request.query.is_empty() {
      builder = builder.query(&request.query);
    }
    if let Some(body) = &request.body {
      builder = builder.json(body);
    }

    let response = builder
      .send()
      .await
      .map_err(|e| RequestError::Transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
      let body = response
        .text()
        .await
        .unwrap_or_else(|_| String::from("(no error details)"));
      return Err(
        RequestError::Status {
          status: status.as_u16(),
          body,
        }
        .into(),
      );
    }

    let bytes = response
      .bytes()
      .await
      .map_err(|e| RequestError::Transport(e.to_string()))?;

    if bytes.iter().all(u8::is_ascii_whitespace) {
      return Ok(Value::Null);
    }

    let body = serde_json::from_slice(&bytes).map_err(|e| RequestError::Decode(e.to_string()))?;
    Ok(body)
  }
}
