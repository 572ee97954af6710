//! Breadth-first traversal that stamps a folder tree.
//!
//! The root is updated first, unconditionally. Containers are then expanded
//! in FIFO order: each dequeued container is listed once and every child is
//! updated. With recursion enabled, child containers are enqueued for
//! expansion; the visited set is consulted at dequeue time, so a container
//! reachable through several parents (or enqueued repeatedly) is expanded at
//! most once.

use std::collections::{HashSet, VecDeque};
use std::time::Instant;

use crate::lister::PaginatedLister;
use crate::mutator::RetryingMutator;
use crate::retry::RetryConfig;
use crate::types::{ObjectKind, TraversalReport};
use crate::{DriveService, ModifiedTime, Result};

/// Tracing target for traversal progress.
pub const TRACING_TARGET: &str = "drivestamp_core::traversal";

/// Options controlling a traversal run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraversalOptions {
    /// Descend into nested containers.
    pub recursive: bool,
    /// Log intended updates without sending them.
    pub dry_run: bool,
    /// Retry policy shared by updates and listings.
    pub retry: RetryConfig,
}

impl TraversalOptions {
    /// Enable or disable recursion.
    #[must_use]
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Enable or disable dry-run mode.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

/// Drives the mutator and lister over a folder tree.
#[derive(Debug, Clone)]
pub struct TraversalEngine {
    mutator: RetryingMutator,
    lister: PaginatedLister,
    recursive: bool,
}

impl TraversalEngine {
    /// Creates an engine over `service`.
    pub fn new(service: DriveService, options: TraversalOptions) -> Self {
        let mutator =
            RetryingMutator::new(service.clone(), options.retry.clone()).with_dry_run(options.dry_run);
        let lister = PaginatedLister::new(service, options.retry);

        Self {
            mutator,
            lister,
            recursive: options.recursive,
        }
    }

    /// Replaces the lister, e.g. to use a smaller page size.
    #[must_use]
    pub fn with_lister(mut self, lister: PaginatedLister) -> Self {
        self.lister = lister;
        self
    }

    /// Stamps `root_id` and everything beneath it with `modified_time`.
    ///
    /// The run aborts on the first fatal error; objects already updated stay updated.
    pub async fn run(&self, root_id: &str, modified_time: &ModifiedTime) -> Result<TraversalReport> {
        let started_at = Instant::now();
        let mut report = TraversalReport::default();

        tracing::info!(
            target: TRACING_TARGET,
            root_id,
            modified_time = %modified_time,
            recursive = self.recursive,
            dry_run = self.mutator.is_dry_run(),
            "Updating folder"
        );

        let outcome = self.mutator.update(root_id, modified_time).await?;
        if let Some(applied) = outcome.applied() {
            tracing::info!(
                target: TRACING_TARGET,
                name = %applied.object.name,
                modified_time = ?applied.object.modified_time,
                "Updated folder"
            );
        }
        report.record(&outcome, true);

        let mut queue = VecDeque::from([root_id.to_owned()]);
        let mut visited = HashSet::new();

        while let Some(container_id) = queue.pop_front() {
            if !visited.insert(container_id.clone()) {
                report.duplicates_discarded += 1;
                continue;
            }

            let listing = self.lister.list(&container_id).await?;
            report.containers_expanded += 1;
            report.list_calls += listing.pages;

            if listing.children.is_empty() {
                tracing::debug!(
                    target: TRACING_TARGET,
                    container_id = %container_id,
                    "No children in folder"
                );
                continue;
            }

            for child in listing.children {
                tracing::info!(
                    target: TRACING_TARGET,
                    kind = %child.kind,
                    name = %child.name,
                    object_id = %child.id,
                    "Updating modifiedTime"
                );

                let outcome = self.mutator.update(&child.id, modified_time).await?;
                report.record(&outcome, child.is_container());

                if child.kind == ObjectKind::Container && self.recursive {
                    queue.push_back(child.id);
                }
            }
        }

        report.elapsed = started_at.elapsed();

        tracing::info!(
            target: TRACING_TARGET,
            containers_updated = report.containers_updated,
            items_updated = report.items_updated,
            skipped = report.skipped,
            containers_expanded = report.containers_expanded,
            list_calls = report.list_calls,
            elapsed_ms = report.elapsed.as_millis(),
            "All done"
        );

        Ok(report)
    }
}
