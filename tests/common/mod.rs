//! Shared helpers for integration tests.

pub mod fake_transport;
pub mod fixtures;
