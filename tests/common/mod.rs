//! Shared test utilities for Briefly
//!
//! - Mounted workspace fixtures over the in-memory backend
//! - A fake HTTP backend for the reqwest client
//! - TUI terminal testing helpers

pub mod fake_backend;
pub mod fixtures;
pub mod terminal;
