//! Shared utilities for the idobata relay server.
//!
//! Keeps logging setup and time handling in one place so the server binary
//! and the test suites agree on both.

pub mod logger;
pub mod time;
