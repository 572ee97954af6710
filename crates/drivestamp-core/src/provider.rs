//! The remote service boundary.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::Result;
use crate::types::{ListPage, ListRequest, RemoteObject, UpdateRequest};

/// Tracing target for remote calls.
pub const TRACING_TARGET: &str = "drivestamp_core::provider";

/// Core trait for the two remote calls the engine needs.
///
/// Implementations issue exactly one remote call per method invocation and
/// perform no retries of their own; HTTP failures surface as errors
/// classified with [`ErrorKind::from_status`](crate::ErrorKind::from_status).
#[async_trait::async_trait]
pub trait DriveProvider: Send + Sync {
    /// Sets an object's `modifiedTime` and returns the updated snapshot.
    async fn update_modified_time(&self, request: &UpdateRequest) -> Result<RemoteObject>;

    /// Fetches one page of a container's direct, non-trashed children.
    async fn list_page(&self, request: &ListRequest) -> Result<ListPage>;
}

/// Drive service wrapper with observability.
///
/// This wrapper adds structured logging to any [`DriveProvider`].
/// The inner provider is wrapped in `Arc` for cheap cloning.
#[derive(Clone)]
pub struct DriveService {
    inner: Arc<dyn DriveProvider>,
}

impl fmt::Debug for DriveService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriveService").finish_non_exhaustive()
    }
}

impl DriveService {
    /// Create a new Drive service wrapper.
    pub fn new<P>(provider: P) -> Self
    where
        P: DriveProvider + 'static,
    {
        Self {
            inner: Arc::new(provider),
        }
    }

    /// Sets an object's `modifiedTime`.
    pub async fn update_modified_time(&self, request: &UpdateRequest) -> Result<RemoteObject> {
        let started_at = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET,
            object_id = %request.object_id,
            modified_time = %request.modified_time,
            "Updating object"
        );

        let result = self.inner.update_modified_time(request).await;

        match &result {
            Ok(object) => tracing::debug!(
                target: TRACING_TARGET,
                object_id = %object.id,
                modified_time = ?object.modified_time,
                elapsed_ms = started_at.elapsed().as_millis(),
                "Update call completed"
            ),
            Err(error) => tracing::debug!(
                target: TRACING_TARGET,
                object_id = %request.object_id,
                error = %error,
                elapsed_ms = started_at.elapsed().as_millis(),
                "Update call failed"
            ),
        }

        result
    }

    /// Fetches one page of a container's children.
    pub async fn list_page(&self, request: &ListRequest) -> Result<ListPage> {
        let started_at = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET,
            parent_id = %request.parent_id,
            has_page_token = request.page_token.is_some(),
            "Listing children"
        );

        let result = self.inner.list_page(request).await;

        match &result {
            Ok(page) => tracing::debug!(
                target: TRACING_TARGET,
                parent_id = %request.parent_id,
                objects = page.objects.len(),
                has_more = page.continuation().is_some(),
                elapsed_ms = started_at.elapsed().as_millis(),
                "List call completed"
            ),
            Err(error) => tracing::debug!(
                target: TRACING_TARGET,
                parent_id = %request.parent_id,
                error = %error,
                elapsed_ms = started_at.elapsed().as_millis(),
                "List call failed"
            ),
        }

        result
    }
}
