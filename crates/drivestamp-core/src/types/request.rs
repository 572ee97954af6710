//! Requests sent to a [`DriveProvider`](crate::DriveProvider).

use crate::ModifiedTime;

/// Response fields requested from an update call.
pub const UPDATE_FIELDS: &str = "id, name, modifiedTime";

/// Response fields requested from a list call.
pub const LIST_FIELDS: &str = "nextPageToken, files(id, name, mimeType)";

/// Largest page size the service accepts for list calls.
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// A single `modifiedTime` update for one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    /// Object to update.
    pub object_id: String,
    /// New modification time.
    pub modified_time: ModifiedTime,
    /// Fields the service should echo back.
    pub fields: &'static str,
    /// Whether the call applies to shared drives.
    pub supports_all_drives: bool,
}

impl UpdateRequest {
    /// Creates an update request with the default response fields.
    pub fn new(object_id: impl Into<String>, modified_time: ModifiedTime) -> Self {
        Self {
            object_id: object_id.into(),
            modified_time,
            fields: UPDATE_FIELDS,
            supports_all_drives: true,
        }
    }
}

/// One page of a children listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    /// Container whose direct children are listed.
    pub parent_id: String,
    /// Maximum number of results per page.
    pub page_size: u32,
    /// Continuation token from the previous page.
    pub page_token: Option<String>,
    /// Fields the service should return.
    pub fields: &'static str,
    /// Whether the call applies to shared drives.
    pub supports_all_drives: bool,
}

impl ListRequest {
    /// Creates a request for the first page of a container's children.
    pub fn new(parent_id: impl Into<String>) -> Self {
        Self {
            parent_id: parent_id.into(),
            page_size: DEFAULT_PAGE_SIZE,
            page_token: None,
            fields: LIST_FIELDS,
            supports_all_drives: true,
        }
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the continuation token.
    pub fn with_page_token(mut self, page_token: Option<String>) -> Self {
        self.page_token = page_token;
        self
    }

    /// Search query selecting direct, non-trashed children of the parent.
    pub fn query(&self) -> String {
        let parent = self.parent_id.replace('\\', "\\\\").replace('\'', "\\'");
        format!("'{parent}' in parents and trashed=false")
    }
}
