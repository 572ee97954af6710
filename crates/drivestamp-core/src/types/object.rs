//! Snapshots of remote Drive objects.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// MIME type Drive assigns to folders.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Placeholder used when the service omits an object's name.
pub const UNKNOWN_NAME: &str = "<unknown>";

/// Whether a remote object can have children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ObjectKind {
    /// A folder-like object that can have children.
    Container,
    /// A file.
    Item,
}

impl ObjectKind {
    /// Derives the kind from a Drive MIME type; anything but a folder is an item.
    pub fn from_mime_type(mime_type: Option<&str>) -> Self {
        match mime_type {
            Some(FOLDER_MIME_TYPE) => Self::Container,
            _ => Self::Item,
        }
    }

    /// Returns whether this kind can have children.
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Container)
    }
}

/// A transient, read-only snapshot of a remote object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteObject {
    /// Globally unique, opaque identifier.
    pub id: String,
    /// Display name, informational only.
    pub name: String,
    /// Container or item.
    pub kind: ObjectKind,
    /// Raw MIME type, if the service returned one.
    pub mime_type: Option<String>,
    /// Modification time, if the service returned one.
    pub modified_time: Option<String>,
}

impl RemoteObject {
    /// Creates a snapshot from the fields a listing returns.
    pub fn new(id: impl Into<String>, name: Option<String>, mime_type: Option<String>) -> Self {
        Self {
            id: id.into(),
            name: name.unwrap_or_else(|| UNKNOWN_NAME.to_owned()),
            kind: ObjectKind::from_mime_type(mime_type.as_deref()),
            mime_type,
            modified_time: None,
        }
    }

    /// Creates a folder snapshot.
    pub fn container(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, Some(name.into()), Some(FOLDER_MIME_TYPE.to_owned()))
    }

    /// Creates a file snapshot with a generic MIME type.
    pub fn item(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, Some(name.into()), Some("application/octet-stream".to_owned()))
    }

    /// Sets the modification time.
    pub fn with_modified_time(mut self, modified_time: impl Into<String>) -> Self {
        self.modified_time = Some(modified_time.into());
        self
    }

    /// Returns whether this object is a container.
    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }
}
