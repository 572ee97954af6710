//! Results returned by providers and by the engine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::RemoteObject;

/// One page of a children listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    /// Objects on this page.
    pub objects: Vec<RemoteObject>,
    /// Token for the next page, absent on the last page.
    pub next_page_token: Option<String>,
}

impl ListPage {
    /// Creates a page.
    pub fn new(objects: Vec<RemoteObject>, next_page_token: Option<String>) -> Self {
        Self {
            objects,
            next_page_token,
        }
    }

    /// Returns the continuation token, treating an empty token as absent.
    pub fn continuation(&self) -> Option<&str> {
        self.next_page_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// An update that reached the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedUpdate {
    /// Snapshot returned by the service.
    pub object: RemoteObject,
    /// Number of attempts used, including the successful one.
    pub attempts: u32,
}

/// Result of a single mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The service applied the update.
    Applied(AppliedUpdate),
    /// Dry run; nothing was sent.
    Skipped,
}

impl UpdateOutcome {
    /// Returns whether the update was applied.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// Returns the applied update, if any.
    pub fn applied(&self) -> Option<&AppliedUpdate> {
        match self {
            Self::Applied(update) => Some(update),
            Self::Skipped => None,
        }
    }
}

/// Summary of a traversal run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalReport {
    /// Containers updated, root included.
    pub containers_updated: u64,
    /// Items updated.
    pub items_updated: u64,
    /// Objects skipped by a dry run.
    pub skipped: u64,
    /// Containers whose children were listed.
    pub containers_expanded: u64,
    /// Dequeued containers discarded because they were already expanded.
    pub duplicates_discarded: u64,
    /// List calls issued, one per page.
    pub list_calls: u64,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

impl TraversalReport {
    /// Total objects touched, applied or skipped.
    pub fn total_objects(&self) -> u64 {
        self.containers_updated + self.items_updated + self.skipped
    }

    pub(crate) fn record(&mut self, outcome: &UpdateOutcome, is_container: bool) {
        match outcome {
            UpdateOutcome::Skipped => self.skipped += 1,
            UpdateOutcome::Applied(_) if is_container => self.containers_updated += 1,
            UpdateOutcome::Applied(_) => self.items_updated += 1,
        }
    }
}
