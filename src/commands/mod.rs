//! CLI subcommand handlers.

pub mod check;
pub mod serve;
