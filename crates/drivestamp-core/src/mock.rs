//! In-memory mock of the Drive service for testing.
//!
//! [`MockDriveProvider`] serves a folder tree from memory, paginates listings,
//! replays scripted failure statuses and records every call it receives.
//! Clones share state, so a test can keep one handle for assertions while
//! the engine owns another.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::types::{ListPage, ListRequest, RemoteObject, UpdateRequest};
use crate::{DriveProvider, DriveService, Error, Result};

/// A call received by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    /// An update for the given object id.
    Update(String),
    /// A list call for the given parent and continuation token.
    List {
        /// Container being listed.
        parent_id: String,
        /// Continuation token sent with the call.
        page_token: Option<String>,
    },
}

#[derive(Debug, Default)]
struct MockState {
    objects: HashMap<String, RemoteObject>,
    children: HashMap<String, Vec<String>>,
    update_failures: HashMap<String, VecDeque<u16>>,
    list_failures: HashMap<String, VecDeque<u16>>,
    page_size: Option<usize>,
    repeat_across_pages: bool,
    calls: Vec<MockCall>,
}

/// In-memory [`DriveProvider`] for tests.
#[derive(Debug, Clone, Default)]
pub struct MockDriveProvider {
    state: Arc<Mutex<MockState>>,
}

impl MockDriveProvider {
    /// Creates an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a root container with no parent.
    #[must_use]
    pub fn with_root(self, id: impl Into<String>) -> Self {
        let id = id.into();
        self.state()
            .objects
            .insert(id.clone(), RemoteObject::container(id.clone(), id));
        self
    }

    /// Appends children to a container, registering each child object.
    ///
    /// The same child may be attached to several parents.
    #[must_use]
    pub fn with_children(
        self,
        parent_id: impl Into<String>,
        children: impl IntoIterator<Item = RemoteObject>,
    ) -> Self {
        let parent_id = parent_id.into();
        {
            let mut state = self.state();
            for child in children {
                state
                    .children
                    .entry(parent_id.clone())
                    .or_default()
                    .push(child.id.clone());
                state.objects.insert(child.id.clone(), child);
            }
        }
        self
    }

    /// Scripts failure statuses for the next update calls on an object.
    #[must_use]
    pub fn fail_update(self, id: impl Into<String>, statuses: impl IntoIterator<Item = u16>) -> Self {
        self.state()
            .update_failures
            .entry(id.into())
            .or_default()
            .extend(statuses);
        self
    }

    /// Scripts failure statuses for the next list calls on a container.
    #[must_use]
    pub fn fail_list(self, id: impl Into<String>, statuses: impl IntoIterator<Item = u16>) -> Self {
        self.state()
            .list_failures
            .entry(id.into())
            .or_default()
            .extend(statuses);
        self
    }

    /// Caps the page size below whatever the request asks for.
    #[must_use]
    pub fn with_page_size(self, page_size: usize) -> Self {
        self.state().page_size = Some(page_size.max(1));
        self
    }

    /// Repeats the last object of each page at the start of the next page.
    #[must_use]
    pub fn with_repeats_across_pages(self) -> Self {
        self.state().repeat_across_pages = true;
        self
    }

    /// Converts this mock into a [`DriveService`].
    pub fn into_service(self) -> DriveService {
        DriveService::new(self)
    }

    /// Returns every call received so far, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.state().calls.clone()
    }

    /// Returns the ids of every update call received, in order.
    pub fn updated_ids(&self) -> Vec<String> {
        self.state()
            .calls
            .iter()
            .filter_map(|call| match call {
                MockCall::Update(id) => Some(id.clone()),
                MockCall::List { .. } => None,
            })
            .collect()
    }

    /// Returns the parent ids of every list call received, in order.
    pub fn listed_ids(&self) -> Vec<String> {
        self.state()
            .calls
            .iter()
            .filter_map(|call| match call {
                MockCall::List { parent_id, .. } => Some(parent_id.clone()),
                MockCall::Update(_) => None,
            })
            .collect()
    }

    /// Returns the current `modifiedTime` of an object, if it was ever set.
    pub fn modified_time(&self, id: &str) -> Option<String> {
        self.state()
            .objects
            .get(id)
            .and_then(|object| object.modified_time.clone())
    }
}

#[async_trait::async_trait]
impl DriveProvider for MockDriveProvider {
    async fn update_modified_time(&self, request: &UpdateRequest) -> Result<RemoteObject> {
        let mut state = self.state();
        state.calls.push(MockCall::Update(request.object_id.clone()));

        if let Some(status) = state
            .update_failures
            .get_mut(&request.object_id)
            .and_then(VecDeque::pop_front)
        {
            return Err(Error::from_status(status).with_message("scripted failure"));
        }

        let object = state
            .objects
            .get_mut(&request.object_id)
            .ok_or_else(|| Error::from_status(404).with_message("File not found"))?;
        object.modified_time = Some(request.modified_time.to_string());
        Ok(object.clone())
    }

    async fn list_page(&self, request: &ListRequest) -> Result<ListPage> {
        let mut state = self.state();
        state.calls.push(MockCall::List {
            parent_id: request.parent_id.clone(),
            page_token: request.page_token.clone(),
        });

        if let Some(status) = state
            .list_failures
            .get_mut(&request.parent_id)
            .and_then(VecDeque::pop_front)
        {
            return Err(Error::from_status(status).with_message("scripted failure"));
        }

        let offset = match request.page_token.as_deref() {
            None => 0,
            Some(token) => token
                .strip_prefix("offset:")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| Error::from_status(400).with_message("Invalid page token"))?,
        };

        let page_size = state
            .page_size
            .unwrap_or(usize::MAX)
            .min(request.page_size.max(1) as usize);
        let ids = state
            .children
            .get(&request.parent_id)
            .cloned()
            .unwrap_or_default();

        let start = if state.repeat_across_pages && offset > 0 {
            offset - 1
        } else {
            offset
        };
        let end = offset.saturating_add(page_size).min(ids.len());
        let objects = ids
            .get(start.min(end)..end)
            .unwrap_or_default()
            .iter()
            .filter_map(|id| state.objects.get(id))
            .map(|object| RemoteObject {
                modified_time: None,
                ..object.clone()
            })
            .collect();

        let next_page_token = (end < ids.len()).then(|| format!("offset:{end}"));
        Ok(ListPage::new(objects, next_page_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, ModifiedTime};

    fn time() -> ModifiedTime {
        ModifiedTime::parse("2025-10-20T09:20:25.000Z").unwrap()
    }

    #[tokio::test]
    async fn update_sets_modified_time() {
        let mock = MockDriveProvider::new().with_root("root");
        let object = mock
            .update_modified_time(&UpdateRequest::new("root", time()))
            .await
            .unwrap();

        assert_eq!(object.modified_time.as_deref(), Some(time().as_str()));
        assert_eq!(mock.modified_time("root").as_deref(), Some(time().as_str()));
        assert_eq!(mock.updated_ids(), ["root"]);
    }

    #[tokio::test]
    async fn update_unknown_object_is_not_found() {
        let mock = MockDriveProvider::new();
        let error = mock
            .update_modified_time(&UpdateRequest::new("missing", time()))
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn scripted_failures_are_replayed_in_order() {
        let mock = MockDriveProvider::new().with_root("root").fail_update("root", [429, 500]);
        let request = UpdateRequest::new("root", time());

        assert_eq!(
            mock.update_modified_time(&request).await.unwrap_err().status(),
            Some(429)
        );
        assert_eq!(
            mock.update_modified_time(&request).await.unwrap_err().status(),
            Some(500)
        );
        assert!(mock.update_modified_time(&request).await.is_ok());
    }

    #[tokio::test]
    async fn list_paginates() {
        let mock = MockDriveProvider::new()
            .with_root("root")
            .with_children(
                "root",
                (0..5).map(|i| RemoteObject::item(format!("f{i}"), format!("f{i}.txt"))),
            )
            .with_page_size(2);

        let first = mock.list_page(&ListRequest::new("root")).await.unwrap();
        assert_eq!(first.objects.len(), 2);
        assert_eq!(first.continuation(), Some("offset:2"));

        let last = mock
            .list_page(&ListRequest::new("root").with_page_token(Some("offset:4".to_owned())))
            .await
            .unwrap();
        assert_eq!(last.objects.len(), 1);
        assert_eq!(last.continuation(), None);
    }

    #[tokio::test]
    async fn list_rejects_unknown_token() {
        let mock = MockDriveProvider::new().with_root("root");
        let error = mock
            .list_page(&ListRequest::new("root").with_page_token(Some("bogus".to_owned())))
            .await
            .unwrap_err();
        assert_eq!(error.status(), Some(400));
    }
}
