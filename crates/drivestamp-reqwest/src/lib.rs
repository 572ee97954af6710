#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod auth;
mod connect;
mod error;
mod service;

#[cfg(test)]
mod testing;

pub use crate::auth::{
    Credentials, DEFAULT_TOKEN_URI, DRIVE_SCOPE, JWT_BEARER_GRANT_TYPE, ServiceAccountKey,
    TRACING_TARGET as AUTH_TRACING_TARGET,
};
pub use crate::connect::{
    DEFAULT_DRIVE_API_URL, DEFAULT_HTTP_TIMEOUT_SECS, DriveClient, ReqwestConfig, TRACING_TARGET,
};
pub use crate::error::{Error, Result};
