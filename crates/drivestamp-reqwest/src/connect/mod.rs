//! Reqwest client module.
//!
//! This module provides the Drive client and its configuration.

mod client;
mod config;

pub use client::{DriveClient, TRACING_TARGET};
pub use config::{DEFAULT_DRIVE_API_URL, DEFAULT_HTTP_TIMEOUT_SECS, ReqwestConfig};
