//! Integration tests for Briefly
//!
//! These tests drive the workspace, the HTTP client and the CLI together.

#[path = "../common/mod.rs"]
pub mod common;

pub mod chat_pipeline;
pub mod cli;
pub mod http_client;
pub mod layout_properties;
pub mod poll_race;
pub mod poller;
pub mod session_flow;
