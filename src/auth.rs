//! Authorization schemes attached to every outgoing request.
//!
//! The scheme is chosen once from configuration and stays constant for the
//! lifetime of the process: standard deployments use either HTTP Basic
//! (username + API token) or a personal access token, custom deployments
//! always send their API key as a bearer token.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

/// Static credentials for a single backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
  /// HTTP Basic authentication with a username (usually an email) and API
  /// token.
  Basic { username: String, token: String },
  /// `Authorization: Bearer <token>`.
  Bearer(String),
}

impl Auth {
  /// Get the `Authorization` header value for these credentials.
  pub fn header_value(&self) -> String {
    match self {
      Self::Basic { username, token } => {
        let credentials = format!("{username}:{token}");
        format!("Basic {}", BASE64.encode(credentials.as_bytes()))
      }
      Self::Bearer(token) => format!("Bearer {token}"),
    }
  }

  /// Name of the scheme as it appears in the header.
  pub fn scheme(&self) -> &'static str {
    match self {
      Self::Basic { .. } => "Basic",
      Self::Bearer(_) => "Bearer",
    }
  }

  /// The secret part of the credentials, masked for display.
  ///
  /// Long secrets keep their first four characters so users can tell tokens
  /// apart; short ones are masked entirely.
  pub fn masked_secret(&self) -> String {
    let secret = match self {
      Self::Basic { token, .. } => token,
      Self::Bearer(token) => token,
    };

    let len = secret.chars().count();
    if len > 8 {
      let prefix: String = secret.chars().take(4).collect();
      format!("{prefix}{}", "*".repeat(len - 4))
    } else {
      "*".repeat(len)
    }
  }
}
