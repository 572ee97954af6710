//! Data types shared by providers and the traversal engine.

mod object;
mod request;
mod response;

pub use object::{FOLDER_MIME_TYPE, ObjectKind, RemoteObject, UNKNOWN_NAME};
pub use request::{DEFAULT_PAGE_SIZE, LIST_FIELDS, ListRequest, UPDATE_FIELDS, UpdateRequest};
pub use response::{AppliedUpdate, ListPage, TraversalReport, UpdateOutcome};
