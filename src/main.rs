//! atlas-bridge - Tool server for wiki and issue-tracker backends
//!
//! This is the main entry point for the CLI application.

#[tokio::main]
async fn main() {
  atlas_bridge::cli::run().await;
}
