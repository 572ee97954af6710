#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
mod provider;
mod timestamp;

pub mod lister;
#[cfg(test)]
mod mock;
pub mod mutator;
pub mod retry;
pub mod traversal;
pub mod types;

pub use error::{BoxedError, Error, ErrorKind, Result};
pub use lister::{Listing, PaginatedLister};
pub use mutator::RetryingMutator;
pub use provider::{DriveProvider, DriveService};
pub use retry::{Attempted, RetryConfig};
pub use timestamp::{ModifiedTime, TIMESTAMP_EXAMPLE, validate_timestamp};
pub use traversal::{TraversalEngine, TraversalOptions};
pub use types::{
    AppliedUpdate, ListPage, ListRequest, ObjectKind, RemoteObject, TraversalReport,
    UpdateOutcome, UpdateRequest,
};
