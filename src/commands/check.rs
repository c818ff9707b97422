//! `atlas-bridge check`: print the resolved configuration.
//!
//! Secrets are masked. Nothing is sent to the backend.

use crate::auth::Auth;
use crate::color::ColorScheme;
use crate::config::{BackendMode, Config};

/// Render the configuration summary.
pub fn render_summary(config: &Config, colors: &ColorScheme) -> String {
  let mut lines = vec![
    format!(
      "{} {}",
      colors.success("✓"),
      colors.success(format!("{} configuration is valid", config.service.display_name()))
    ),
    format!("  {}: {}", colors.emphasis("Mode"), config.mode),
    format!("  {}: {}", colors.emphasis("Base URL"), colors.link(&config.base_url)),
    format!(
      "  {}: {} {}",
      colors.emphasis("Auth"),
      config.auth.scheme(),
      colors.dimmed(config.auth.masked_secret())
    ),
  ];

  if let Auth::Basic { username, .. } = &config.auth {
    lines.push(format!("  {}: {}", colors.emphasis("Username"), username));
  }

  if config.mode == BackendMode::Custom {
    lines.push(format!(
      "  {}: {}",
      colors.emphasis("API version"),
      config.custom_api_version
    ));
  }

  lines.push(format!(
    "  {}: {}",
    colors.emphasis("Page size"),
    colors.number(config.max_results_default)
  ));
  lines.push(format!("  {}: {}", colors.emphasis("Log level"), config.log_level));

  lines.join("\n")
}

pub(crate) fn handle_check_command(config: &Config, colors: &ColorScheme) {
  println!("{}", render_summary(config, colors));
}
