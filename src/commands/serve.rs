//! `atlas-bridge serve`: run the tool server on stdio.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::config::{Config, Service};
use crate::confluence::ConfluenceClient;
use crate::jira::JiraClient;
use crate::server::serve_stdio;
use crate::tools::{ConfluenceTools, JiraTools, ToolSet};

/// Build the tool set for the configured service.
///
/// # Errors
/// Returns an error if the HTTP client cannot be created.
pub fn build_tools(config: &Config) -> Result<Box<dyn ToolSet>> {
  let tools: Box<dyn ToolSet> = match config.service {
    Service::Confluence => Box::new(ConfluenceTools::new(
      Arc::new(ConfluenceClient::from_config(config)?),
      config.max_results_default,
    )),
    Service::Jira => Box::new(JiraTools::new(
      Arc::new(JiraClient::from_config(config)?),
      config.max_results_default,
    )),
  };
  Ok(tools)
}

pub(crate) async fn handle_serve_command(config: &Config) -> Result<()> {
  info!(
    "Starting {} tool server ({} API at {})",
    config.service.display_name(),
    config.mode,
    config.base_url
  );

  let tools = build_tools(config)?;
  serve_stdio(tools.as_ref()).await
}
