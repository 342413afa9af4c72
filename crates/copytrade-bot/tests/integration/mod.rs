//! Integration tests for copytrade-bot.
//!
//! These tests drive the full stack (webhook router, orchestrator, signed
//! HTTP client) against a fake exchange running on a local port.

pub mod common;
