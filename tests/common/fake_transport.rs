//! Fake transport for testing
//!
//! Replays canned JSON bodies keyed by method and path (query parameters are
//! ignored for matching) and records every request it receives. Requests with
//! no canned body fail with a 404.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use atlas_bridge::config::ClientOptions;
use atlas_bridge::confluence::ConfluenceClient;
use atlas_bridge::jira::JiraClient;
use atlas_bridge::transport::{ApiRequest, HttpMethod, RequestError, Transport};
use serde_json::Value;

type RouteKey = (HttpMethod, String);

#[derive(Default)]
pub struct FakeTransport {
  responses: Mutex<HashMap<RouteKey, Value>>,
  failures: Mutex<HashMap<RouteKey, RequestError>>,
  requests: Mutex<Vec<ApiRequest>>,
}

#[allow(dead_code)]
impl FakeTransport {
  pub fn new() -> Arc<Self> {
    Arc::new(Self::default())
  }

  /// Reply to `method path` with `body`.
  pub fn respond(&self, method: HttpMethod, path: &str, body: Value) {
    self
      .responses
      .lock()
      .unwrap()
      .insert((method, path.to_string()), body);
  }

  /// Fail `method path` with an HTTP status.
  pub fn fail_with_status(&self, method: HttpMethod, path: &str, status: u16, body: &str) {
    self.failures.lock().unwrap().insert(
      (method, path.to_string()),
      RequestError::Status {
        status,
        body: body.to_string(),
      },
    );
  }

  /// Fail `method path` as if the network were down.
  pub fn fail_with_transport_error(&self, method: HttpMethod, path: &str) {
    self.failures.lock().unwrap().insert(
      (method, path.to_string()),
      RequestError::Transport("connection refused".to_string()),
    );
  }

  pub fn requests(&self) -> Vec<ApiRequest> {
    self.requests.lock().unwrap().clone()
  }

  pub fn last_request(&self) -> ApiRequest {
    self
      .requests
      .lock()
      .unwrap()
      .last()
      .cloned()
      .expect("no request was sent")
  }
}

#[async_trait]
impl Transport for FakeTransport {
  async fn send(&self, request: ApiRequest) -> Result<Value> {
    let key = (request.method, request.path.clone());
    self.requests.lock().unwrap().push(request);

    if let Some(error) = self.failures.lock().unwrap().get(&key) {
      return Err(error.clone().into());
    }

    match self.responses.lock().unwrap().get(&key) {
      Some(body) => Ok(body.clone()),
      None => Err(
        RequestError::Status {
          status: 404,
          body: format!("no canned response for {} {}", key.0, key.1),
        }
        .into(),
      ),
    }
  }
}

#[allow(dead_code)]
pub fn standard_confluence() -> (Arc<FakeTransport>, ConfluenceClient) {
  let transport = FakeTransport::new();
  let client = ConfluenceClient::new(transport.clone(), ClientOptions::standard(25));
  (transport, client)
}

#[allow(dead_code)]
pub fn custom_confluence() -> (Arc<FakeTransport>, ConfluenceClient) {
  let transport = FakeTransport::new();
  let client = ConfluenceClient::new(transport.clone(), ClientOptions::custom("v1", 25));
  (transport, client)
}

#[allow(dead_code)]
pub fn standard_jira() -> (Arc<FakeTransport>, JiraClient) {
  let transport = FakeTransport::new();
  let client = JiraClient::new(transport.clone(), ClientOptions::standard(50));
  (transport, client)
}

#[allow(dead_code)]
pub fn custom_jira() -> (Arc<FakeTransport>, JiraClient) {
  let transport = FakeTransport::new();
  let client = JiraClient::new(transport.clone(), ClientOptions::custom("v1", 50));
  (transport, client)
}
