//! atlas-bridge library
//!
//! Normalizes two backend shapes (a platform's standard REST API and a looser
//! custom API) of a wiki-style content service and an issue tracker into one
//! set of canonical entities, and exposes their operations as named tools.

pub mod auth;
pub mod cli;
pub mod color;
pub mod commands;
pub mod config;
pub mod confluence;
pub mod jira;
pub mod models;
pub mod normalize;
pub mod server;
pub mod tools;
pub mod transport;
