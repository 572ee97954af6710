//! Exhaustive listing of a container's direct children.

use std::collections::HashSet;

use crate::retry::RetryConfig;
use crate::types::{DEFAULT_PAGE_SIZE, ListRequest, RemoteObject};
use crate::{DriveService, Error, Result};

/// Tracing target for listings.
pub const TRACING_TARGET: &str = "drivestamp_core::lister";

/// Children of one container, aggregated across every page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Direct children, in the order the service returned them, without duplicates.
    pub children: Vec<RemoteObject>,
    /// Number of list calls issued, one per page.
    pub pages: u64,
}

/// Lists direct, non-trashed children, following continuation tokens.
///
/// Each page request goes through the same [`RetryConfig`] as mutations, so a
/// transient failure only repeats the page that failed.
#[derive(Debug, Clone)]
pub struct PaginatedLister {
    service: DriveService,
    retry: RetryConfig,
    page_size: u32,
}

impl PaginatedLister {
    /// Creates a lister that reads through `service`.
    pub fn new(service: DriveService, retry: RetryConfig) -> Self {
        Self {
            service,
            retry,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Sets the page size requested per call.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, DEFAULT_PAGE_SIZE);
        self
    }

    /// Returns every direct child of `container_id`.
    ///
    /// Callers never observe partial pages: either all pages are fetched or
    /// the first error is returned.
    pub async fn list_children(&self, container_id: &str) -> Result<Vec<RemoteObject>> {
        Ok(self.list(container_id).await?.children)
    }

    /// Returns every direct child of `container_id` along with the number of pages read.
    pub async fn list(&self, container_id: &str) -> Result<Listing> {
        if container_id.is_empty() {
            return Err(Error::invalid_input().with_message("container id must not be empty"));
        }

        let mut listing = Listing::default();
        let mut seen = HashSet::new();
        let mut page_token: Option<String> = None;

        loop {
            let request = ListRequest::new(container_id)
                .with_page_size(self.page_size)
                .with_page_token(page_token.take());

            let page = self
                .retry
                .run("list children", || self.service.list_page(&request))
                .await?
                .value;
            listing.pages += 1;

            for object in page.objects.iter() {
                if seen.insert(object.id.clone()) {
                    listing.children.push(object.clone());
                } else {
                    tracing::debug!(
                        target: TRACING_TARGET,
                        container_id,
                        object_id = %object.id,
                        "Dropping duplicate listing entry"
                    );
                }
            }

            match page.continuation() {
                Some(token) => page_token = Some(token.to_owned()),
                None => break,
            }
        }

        tracing::debug!(
            target: TRACING_TARGET,
            container_id,
            children = listing.children.len(),
            pages = listing.pages,
            "Listed children"
        );

        Ok(listing)
    }
}
