//! Single-object `modifiedTime` updates with bounded retries.

use crate::retry::RetryConfig;
use crate::types::{AppliedUpdate, UpdateOutcome, UpdateRequest};
use crate::{DriveService, Error, ModifiedTime, Result};

/// Tracing target for mutations.
pub const TRACING_TARGET: &str = "drivestamp_core::mutator";

/// Applies one metadata update per call, retrying transient failures.
#[derive(Debug, Clone)]
pub struct RetryingMutator {
    service: DriveService,
    retry: RetryConfig,
    dry_run: bool,
}

impl RetryingMutator {
    /// Creates a mutator that sends updates through `service`.
    pub fn new(service: DriveService, retry: RetryConfig) -> Self {
        Self {
            service,
            retry,
            dry_run: false,
        }
    }

    /// Enable or disable dry-run mode.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Returns whether this mutator is in dry-run mode.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Sets `modifiedTime` on one object.
    ///
    /// In dry-run mode nothing is sent and [`UpdateOutcome::Skipped`] is returned.
    ///
    /// # Errors
    ///
    /// Returns non-retryable failures as soon as they occur and a
    /// [`RetryExhausted`](crate::ErrorKind::RetryExhausted) error when every
    /// attempt failed transiently.
    pub async fn update(
        &self,
        object_id: &str,
        modified_time: &ModifiedTime,
    ) -> Result<UpdateOutcome> {
        if object_id.is_empty() {
            return Err(Error::invalid_input().with_message("object id must not be empty"));
        }

        if self.dry_run {
            tracing::info!(
                target: TRACING_TARGET,
                object_id,
                modified_time = %modified_time,
                "[dry-run] Would update modifiedTime"
            );
            return Ok(UpdateOutcome::Skipped);
        }

        let request = UpdateRequest::new(object_id, modified_time.clone());
        let attempted = self
            .retry
            .run("update modifiedTime", || {
                self.service.update_modified_time(&request)
            })
            .await?;

        tracing::debug!(
            target: TRACING_TARGET,
            object_id,
            name = %attempted.value.name,
            modified_time = ?attempted.value.modified_time,
            attempts = attempted.attempts,
            "Updated modifiedTime"
        );

        Ok(UpdateOutcome::Applied(AppliedUpdate {
            object: attempted.value,
            attempts: attempted.attempts,
        }))
    }
}
