//! Startup configuration resolved from environment variables.
//!
//! Configuration is read once, validated eagerly, and then handed to the
//! clients explicitly. Every missing variable for the selected backend mode is
//! reported in a single error so operators can fix their environment in one
//! pass.

use std::fmt;

use clap::ValueEnum;
use url::Url;

use crate::auth::Auth;

/// Default custom API version segment (`<base>/<version>/...`).
pub const DEFAULT_CUSTOM_API_VERSION: &str = "v1";

/// Default log level when `LOG_LEVEL` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "INFO";

/// The remote service a process talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Service {
  /// Wiki-style content service.
  Confluence,
  /// Issue tracker.
  Jira,
}

impl Service {
  /// Prefix used for the service-specific environment variables.
  pub fn env_prefix(&self) -> &'static str {
    match self {
      Service::Confluence => "CONFLUENCE_",
      Service::Jira => "JIRA_",
    }
  }

  /// Page size used when a caller does not ask for one.
  pub fn default_max_results(&self) -> usize {
    match self {
      Service::Confluence => 25,
      Service::Jira => 50,
    }
  }

  /// Whether standard-mode auth defaults to a bearer token.
  pub fn default_bearer(&self) -> bool {
    match self {
      Service::Confluence => true,
      Service::Jira => false,
    }
  }

  /// Human-readable name.
  pub fn display_name(&self) -> &'static str {
    match self {
      Service::Confluence => "Confluence",
      Service::Jira => "Jira",
    }
  }
}

/// Which request/response shape the backend speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
  /// The platform's documented REST API.
  Standard,
  /// An alternate API with a looser JSON shape under `<base>/<version>`.
  Custom,
}

impl fmt::Display for BackendMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Standard => write!(f, "standard"),
      Self::Custom => write!(f, "custom"),
    }
  }
}

/// Fully resolved configuration for one service.
#[derive(Debug, Clone)]
pub struct Config {
  pub service: Service,
  pub mode: BackendMode,
  /// Base URL without a trailing slash.
  pub base_url: String,
  pub auth: Auth,
  pub custom_api_version: String,
  pub max_results_default: usize,
  pub log_level: String,
}

/// Settings the service clients need beyond the transport itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
  pub mode: BackendMode,
  pub custom_api_version: String,
  pub max_results_default: usize,
}

impl ClientOptions {
  /// Options for a standard-API client.
  pub fn standard(max_results_default: usize) -> Self {
    Self {
      mode: BackendMode::Standard,
      custom_api_version: DEFAULT_CUSTOM_API_VERSION.to_string(),
      max_results_default,
    }
  }

  /// Options for a custom-API client.
  pub fn custom(custom_api_version: impl Into<String>, max_results_default: usize) -> Self {
    Self {
      mode: BackendMode::Custom,
      custom_api_version: custom_api_version.into(),
      max_results_default,
    }
  }

  /// Path under the versioned custom API root, e.g. `/v1/pages/42`.
  pub fn custom_path(&self, path: &str) -> String {
    format!("/{}{}", self.custom_api_version.trim_matches('/'), path)
  }

  /// Requested page size, or the configured default.
  pub fn page_size(&self, requested: Option<usize>) -> usize {
    requested.unwrap_or(self.max_results_default)
  }
}

impl From<&Config> for ClientOptions {
  fn from(config: &Config) -> Self {
    Self {
      mode: config.mode,
      custom_api_version: config.custom_api_version.clone(),
      max_results_default: config.max_results_default,
    }
  }
}

/// Errors raised while resolving configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
  /// One or more required variables are absent or empty.
  Missing(Vec<String>),
  /// A variable is present but unusable.
  Invalid { name: String, reason: String },
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Missing(names) => write!(f, "Missing required environment variables: {}", names.join(", ")),
      Self::Invalid { name, reason } => write!(f, "Invalid value for {name}: {reason}"),
    }
  }
}

impl std::error::Error for ConfigError {}

impl Config {
  /// Resolve configuration from an arbitrary variable lookup.
  ///
  /// # Arguments
  /// * `service` - Service whose prefixed variables should be read.
  /// * `lookup` - Returns the raw value of a variable, if set.
  ///
  /// # Errors
  /// Returns [`ConfigError::Missing`] listing every required variable that is
  /// absent for the selected mode, or [`ConfigError::Invalid`] when a base URL
  /// or page size cannot be parsed.
  pub fn from_lookup<F>(service: Service, lookup: F) -> Result<Self, ConfigError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get = |name: &str| lookup(name).map(|value| value.trim().to_string()).filter(|v| !v.is_empty());
    let flag = |name: &str, default: bool| get(name).map(|v| v.eq_ignore_ascii_case("true")).unwrap_or(default);

    let prefix = service.env_prefix();
    let use_custom_api = flag("USE_CUSTOM_API", false);
    let use_bearer_token = flag("USE_BEARER_TOKEN", service.default_bearer());

    let mut missing = Vec::new();
    let mut require = |name: &str| {
      let value = get(name);
      if value.is_none() {
        missing.push(name.to_string());
      }
      value.unwrap_or_default()
    };

    let (mode, base_url_var, raw_base_url, auth) = if use_custom_api {
      let base_url = require("CUSTOM_API_BASE_URL");
      let api_key = require("CUSTOM_API_KEY");
      (BackendMode::Custom, "CUSTOM_API_BASE_URL".to_string(), base_url, Auth::Bearer(api_key))
    } else {
      let base_url_var = format!("{prefix}BASE_URL");
      let base_url = require(&base_url_var);
      let auth = if use_bearer_token {
        Auth::Bearer(require(&format!("{prefix}ACCESS_TOKEN")))
      } else {
        let username = require(&format!("{prefix}USERNAME"));
        let token = require(&format!("{prefix}API_TOKEN"));
        Auth::Basic { username, token }
      };
      (BackendMode::Standard, base_url_var, base_url, auth)
    };

    if !missing.is_empty() {
      return Err(ConfigError::Missing(missing));
    }

    let base_url = normalize_base_url(&raw_base_url).map_err(|reason| ConfigError::Invalid {
      name: base_url_var,
      reason,
    })?;

    let max_results_default = match get("MAX_RESULTS_DEFAULT") {
      Some(raw) => raw.parse::<usize>().map_err(|e| ConfigError::Invalid {
        name: "MAX_RESULTS_DEFAULT".to_string(),
        reason: e.to_string(),
      })?,
      None => service.default_max_results(),
    };

    Ok(Self {
      service,
      mode,
      base_url,
      auth,
      custom_api_version: get("CUSTOM_API_VERSION").unwrap_or_else(|| DEFAULT_CUSTOM_API_VERSION.to_string()),
      max_results_default,
      log_level: get("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
    })
  }
}

/// Normalize a base URL by adding `https://` if no scheme is present and
/// removing any trailing slash.
fn normalize_base_url(raw: &str) -> Result<String, String> {
  let trimmed = raw.trim();

  let parsed = match Url::parse(trimmed) {
    Ok(parsed) if parsed.has_host() => parsed,
    _ => Url::parse(&format!("https://{trimmed}")).map_err(|e| format!("invalid URL: {e}"))?,
  };

  Ok(parsed.as_str().trim_end_matches('/').to_string())
}
