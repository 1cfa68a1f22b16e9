//! Utility functions and helpers for promptcraft.
//!
//! This module provides cross-cutting concerns: structured logging with
//! secret redaction, and retrying with exponential backoff.
//!
//! # Submodules
//!
//! - `logging`: Tracing initialization and log sanitization.
//! - `retry`: Sequential retry with a doubling delay.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod logging;
pub mod retry;
