//! Command-line interface definitions for atlas-bridge.
//!
//! Configuration comes from the environment; the command line only picks the
//! service and the presentation options.

use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::warn;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::color::ColorScheme;
use crate::commands::check::handle_check_command;
use crate::commands::serve::handle_serve_command;
use crate::config::{Config, Service};

/// Exit code for configuration errors.
pub const EXIT_CONFIG_ERROR: i32 = 3;

/// atlas-bridge - Tool server for wiki and issue-tracker backends
#[derive(Debug, Parser)]
#[command(
  name = "atlas-bridge",
  version,
  about = "Expose wiki and issue-tracker operations as JSON-RPC tools",
  long_about = "Serves content-service or issue-tracker operations over a line-delimited JSON-RPC\n\
                stdio channel, speaking either the standard REST API or a custom API.\n\
                Configuration is read from environment variables.",
  styles = get_clap_styles()
)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Command,

  #[command(flatten)]
  pub behavior: BehaviorOptions,

  #[command(flatten)]
  pub settings: SettingsOptions,
}

#[derive(Debug, Subcommand)]
pub enum Command {
  /// Serve the service's tools over stdin/stdout
  Serve {
    #[arg(value_enum)]
    service: Service,
  },

  /// Validate configuration and print a summary
  Check {
    #[arg(value_enum)]
    service: Service,
  },
}

impl Command {
  pub fn service(&self) -> Service {
    match self {
      Command::Serve { service } | Command::Check { service } => *service,
    }
  }
}

/// Behavior options
#[derive(Debug, Parser)]
pub struct BehaviorOptions {
  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, global = true, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all log output except errors
  #[arg(short, long, global = true, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Colorize output
  #[arg(long, global = true, value_enum, default_value = "auto", value_name = "WHEN")]
  pub color: ColorOption,
}

/// Backend settings, normally supplied through the environment.
///
/// Values stay raw strings here; [`Config::from_lookup`] validates them so
/// every missing variable is reported at once.
#[derive(Debug, Default, Parser)]
pub struct SettingsOptions {
  /// Confluence base URL
  #[arg(long, global = true, env = "CONFLUENCE_BASE_URL", value_name = "URL")]
  pub confluence_base_url: Option<String>,

  /// Confluence username for basic auth
  #[arg(long, global = true, env = "CONFLUENCE_USERNAME", value_name = "USER")]
  pub confluence_username: Option<String>,

  /// Confluence API token for basic auth
  #[arg(long, global = true, env = "CONFLUENCE_API_TOKEN", value_name = "TOKEN", hide_env_values = true)]
  pub confluence_api_token: Option<String>,

  /// Confluence personal access token
  #[arg(long, global = true, env = "CONFLUENCE_ACCESS_TOKEN", value_name = "TOKEN", hide_env_values = true)]
  pub confluence_access_token: Option<String>,

  /// Jira base URL
  #[arg(long, global = true, env = "JIRA_BASE_URL", value_name = "URL")]
  pub jira_base_url: Option<String>,

  /// Jira username for basic auth
  #[arg(long, global = true, env = "JIRA_USERNAME", value_name = "USER")]
  pub jira_username: Option<String>,

  /// Jira API token for basic auth
  #[arg(long, global = true, env = "JIRA_API_TOKEN", value_name = "TOKEN", hide_env_values = true)]
  pub jira_api_token: Option<String>,

  /// Jira personal access token
  #[arg(long, global = true, env = "JIRA_ACCESS_TOKEN", value_name = "TOKEN", hide_env_values = true)]
  pub jira_access_token: Option<String>,

  /// Talk to the custom API instead of the standard one ("true" to enable)
  #[arg(long, global = true, env = "USE_CUSTOM_API", value_name = "BOOL")]
  pub use_custom_api: Option<String>,

  /// Authenticate standard requests with an access token ("true" or "false")
  #[arg(long, global = true, env = "USE_BEARER_TOKEN", value_name = "BOOL")]
  pub use_bearer_token: Option<String>,

  /// Custom API base URL
  #[arg(long, global = true, env = "CUSTOM_API_BASE_URL", value_name = "URL")]
  pub custom_api_base_url: Option<String>,

  /// Custom API key
  #[arg(long, global = true, env = "CUSTOM_API_KEY", value_name = "KEY", hide_env_values = true)]
  pub custom_api_key: Option<String>,

  /// Custom API version path segment [default: v1]
  #[arg(long, global = true, env = "CUSTOM_API_VERSION", value_name = "VERSION")]
  pub custom_api_version: Option<String>,

  /// Page size when a tool call does not specify one
  #[arg(long, global = true, env = "MAX_RESULTS_DEFAULT", value_name = "N")]
  pub max_results_default: Option<String>,

  /// Log level (TRACE, DEBUG, INFO, WARNING, ERROR) [default: INFO]
  #[arg(long, global = true, env = "LOG_LEVEL", value_name = "LEVEL")]
  pub log_level: Option<String>,
}

impl SettingsOptions {
  /// Raw value of the setting known by environment variable `name`.
  pub fn lookup(&self, name: &str) -> Option<String> {
    let value = match name {
      "CONFLUENCE_BASE_URL" => &self.confluence_base_url,
      "CONFLUENCE_USERNAME" => &self.confluence_username,
      "CONFLUENCE_API_TOKEN" => &self.confluence_api_token,
      "CONFLUENCE_ACCESS_TOKEN" => &self.confluence_access_token,
      "JIRA_BASE_URL" => &self.jira_base_url,
      "JIRA_USERNAME" => &self.jira_username,
      "JIRA_API_TOKEN" => &self.jira_api_token,
      "JIRA_ACCESS_TOKEN" => &self.jira_access_token,
      "USE_CUSTOM_API" => &self.use_custom_api,
      "USE_BEARER_TOKEN" => &self.use_bearer_token,
      "CUSTOM_API_BASE_URL" => &self.custom_api_base_url,
      "CUSTOM_API_KEY" => &self.custom_api_key,
      "CUSTOM_API_VERSION" => &self.custom_api_version,
      "MAX_RESULTS_DEFAULT" => &self.max_results_default,
      "LOG_LEVEL" => &self.log_level,
      _ => return None,
    };
    value.clone()
  }
}

/// Color output options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorOption {
  Auto,
  Always,
  Never,
}

/// Parse CLI arguments, resolve configuration, and dispatch to the chosen
/// command.
pub async fn run() {
  let cli = Cli::parse();
  let colors = ColorScheme::new(cli.behavior.color);
  let service = cli.command.service();

  let config = match Config::from_lookup(service, |name| cli.settings.lookup(name)) {
    Ok(config) => config,
    Err(e) => {
      eprintln!("{} {}", colors.error("Configuration error:"), e);
      eprintln!(
        "{}",
        colors.dimmed(format!("Run 'atlas-bridge check {}' after fixing the environment", service_arg(service)))
      );
      process::exit(EXIT_CONFIG_ERROR);
    }
  };

  init_tracing(&cli.behavior, &config.log_level);

  match cli.command {
    Command::Serve { .. } => {
      if let Err(e) = handle_serve_command(&config).await {
        eprintln!("{} {e:#}", colors.error("Error:"));
        process::exit(1);
      }
    }
    Command::Check { .. } => handle_check_command(&config, &colors),
  }
}

fn service_arg(service: Service) -> &'static str {
  match service {
    Service::Confluence => "confluence",
    Service::Jira => "jira",
  }
}

/// Map a configured level name to a filter.
///
/// Accepts the conventional names case-insensitively, plus `WARNING` and
/// `CRITICAL` as aliases for `WARN` and `ERROR`.
pub fn level_from_name(name: &str) -> Option<LevelFilter> {
  match name.trim().to_ascii_uppercase().as_str() {
    "TRACE" => Some(LevelFilter::TRACE),
    "DEBUG" => Some(LevelFilter::DEBUG),
    "INFO" => Some(LevelFilter::INFO),
    "WARN" | "WARNING" => Some(LevelFilter::WARN),
    "ERROR" | "CRITICAL" => Some(LevelFilter::ERROR),
    "OFF" => Some(LevelFilter::OFF),
    _ => None,
  }
}

/// Pick the default log level: `-q`, then `-v`, then the configured name.
pub fn resolve_level(behavior: &BehaviorOptions, configured: &str) -> LevelFilter {
  if behavior.quiet {
    return LevelFilter::ERROR;
  }

  match behavior.verbose {
    0 => level_from_name(configured).unwrap_or(LevelFilter::INFO),
    1 => LevelFilter::INFO,
    2 => LevelFilter::DEBUG,
    _ => LevelFilter::TRACE,
  }
}

fn init_tracing(behavior: &BehaviorOptions, configured: &str) {
  let level = resolve_level(behavior, configured);

  let env_filter = EnvFilter::builder()
    .with_default_directive(level.into())
    .from_env_lossy();

  let _ = tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .try_init();

  if level_from_name(configured).is_none() {
    warn!("Unknown LOG_LEVEL {configured:?}, using INFO");
  }
}

/// Get custom styles for clap help output
fn get_clap_styles() -> clap::builder::Styles {
  use clap::builder::styling::{AnsiColor, Effects};

  clap::builder::Styles::styled()
    .header(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
    .usage(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
    .literal(AnsiColor::BrightGreen.on_default())
    .placeholder(AnsiColor::BrightCyan.on_default())
    .error(AnsiColor::BrightRed.on_default() | Effects::BOLD)
    .valid(AnsiColor::BrightGreen.on_default())
    .invalid(AnsiColor::BrightRed.on_default())
}
