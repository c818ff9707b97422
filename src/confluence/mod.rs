//! Content service: the API trait and the dual-backend client.

pub mod api;
pub mod client;

pub use api::ConfluenceApi;
pub use client::ConfluenceClient;
