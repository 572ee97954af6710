//! Drive v3 implementation of [`DriveProvider`] for [`DriveClient`].

use drivestamp_core::types::{ListPage, ListRequest, RemoteObject, UpdateRequest};
use drivestamp_core::{DriveProvider, Error as CoreError};
use reqwest::Response;
use serde::{Deserialize, Serialize};

use crate::connect::{DriveClient, TRACING_TARGET};
use crate::error::Error;

/// A file resource as returned by the Drive API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileResource {
    id: String,
    name: Option<String>,
    mime_type: Option<String>,
    modified_time: Option<String>,
}

impl From<FileResource> for RemoteObject {
    fn from(file: FileResource) -> Self {
        let object = RemoteObject::new(file.id, file.name, file.mime_type);
        match file.modified_time {
            Some(modified_time) => object.with_modified_time(modified_time),
            None => object,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    #[serde(default)]
    files: Vec<FileResource>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateBody<'a> {
    modified_time: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateQuery<'a> {
    fields: &'a str,
    supports_all_drives: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery<'a> {
    q: String,
    fields: &'a str,
    page_size: u32,
    supports_all_drives: bool,
    include_items_from_all_drives: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_token: Option<&'a str>,
}

impl<'a> From<&'a ListRequest> for ListQuery<'a> {
    fn from(request: &'a ListRequest) -> Self {
        Self {
            q: request.query(),
            fields: request.fields,
            page_size: request.page_size,
            supports_all_drives: request.supports_all_drives,
            include_items_from_all_drives: request.supports_all_drives,
            page_token: request.page_token.as_deref(),
        }
    }
}

/// Turns a non-success response into an error classified by its status.
async fn error_for_status(response: Response) -> drivestamp_core::Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_owned()
        });

    Err(CoreError::from_status(status.as_u16()).with_message(message))
}

#[async_trait::async_trait]
impl DriveProvider for DriveClient {
    async fn update_modified_time(
        &self,
        request: &UpdateRequest,
    ) -> drivestamp_core::Result<RemoteObject> {
        let url = self.files_url(Some(&request.object_id))?;
        let token = self.bearer_token().await?;

        tracing::trace!(
            target: TRACING_TARGET,
            url = %url,
            "Sending update"
        );

        let response = self
            .http()
            .patch(url)
            .bearer_auth(token)
            .query(&UpdateQuery {
                fields: request.fields,
                supports_all_drives: request.supports_all_drives,
            })
            .json(&UpdateBody {
                modified_time: request.modified_time.as_str(),
            })
            .send()
            .await
            .map_err(Error::from)?;

        let file: FileResource = error_for_status(response)
            .await?
            .json()
            .await
            .map_err(Error::from)?;

        Ok(file.into())
    }

    async fn list_page(&self, request: &ListRequest) -> drivestamp_core::Result<ListPage> {
        let url = self.files_url(None)?;
        let token = self.bearer_token().await?;

        tracing::trace!(
            target: TRACING_TARGET,
            url = %url,
            parent_id = %request.parent_id,
            "Sending list"
        );

        let response = self
            .http()
            .get(url)
            .bearer_auth(token)
            .query(&ListQuery::from(request))
            .send()
            .await
            .map_err(Error::from)?;

        let list: FileList = error_for_status(response)
            .await?
            .json()
            .await
            .map_err(Error::from)?;

        let objects = list.files.into_iter().map(RemoteObject::from).collect();
        Ok(ListPage::new(objects, list.next_page_token))
    }
}
