//! Storage client capability and its Dropbox API v2 implementation.
//!
//! ```text
//! upload:       POST {content}/2/files/upload
//!               Dropbox-API-Arg: <CommitInfo json>, body = raw bytes
//! create link:  POST {api}/2/sharing/create_shared_link_with_settings
//! list links:   POST {api}/2/sharing/list_shared_links
//! ```
//!
//! Every non-2xx answer becomes [`ClientError::Api`] carrying the provider's
//! `error_summary`, which is what the already-exists check looks at.

use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder,
    header::{CONTENT_TYPE, HeaderValue},
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ClientError;
use crate::types::{
    ApiErrorBody, CommitInfo, CreateSharedLinkArg, FileMetadata, ListSharedLinksArg,
    ListSharedLinksResult, SharedLinkMetadata,
};

pub const DEFAULT_API_URL: &str = "https://api.dropboxapi.com";
pub const DEFAULT_CONTENT_URL: &str = "https://content.dropboxapi.com";

const API_ARG_HEADER: &str = "Dropbox-API-Arg";

/// The three storage operations the uploader needs.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Writes `content` according to `commit`.
    async fn upload(
        &self,
        commit: &CommitInfo,
        content: Vec<u8>,
    ) -> Result<FileMetadata, ClientError>;

    /// Creates a public shared link for an existing file.
    async fn create_shared_link_with_settings(
        &self,
        arg: &CreateSharedLinkArg,
    ) -> Result<SharedLinkMetadata, ClientError>;

    /// Lists the shared links matching `arg`.
    async fn list_shared_links(
        &self,
        arg: &ListSharedLinksArg,
    ) -> Result<ListSharedLinksResult, ClientError>;
}

/// [`StorageClient`] talking to the Dropbox HTTP API with a bearer token.
#[derive(Debug, Clone)]
pub struct DropboxClient {
    http: Client,
    access_token: String,
    api_url: String,
    content_url: String,
}

impl DropboxClient {
    pub fn new(access_token: impl Into<String>, http: Client) -> Self {
        Self {
            http,
            access_token: access_token.into(),
            api_url: DEFAULT_API_URL.to_string(),
            content_url: DEFAULT_CONTENT_URL.to_string(),
        }
    }

    /// Points the client at different API and content hosts.
    pub fn with_base_urls(mut self, api_url: &str, content_url: &str) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self.content_url = content_url.trim_end_matches('/').to_string();
        self
    }

    fn rpc(&self, endpoint: &str) -> RequestBuilder {
        self.http
            .post(format!("{}/2/{endpoint}", self.api_url))
            .bearer_auth(&self.access_token)
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let summary = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|err| err.error_summary)
                .unwrap_or(body);
            return Err(ClientError::Api { status, summary });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl StorageClient for DropboxClient {
    async fn upload(
        &self,
        commit: &CommitInfo,
        content: Vec<u8>,
    ) -> Result<FileMetadata, ClientError> {
        let arg = header_safe_json(&serde_json::to_string(commit)?);
        debug!(path = %commit.path, bytes = content.len(), "files/upload");

        let request = self
            .http
            .post(format!("{}/2/files/upload", self.content_url))
            .bearer_auth(&self.access_token)
            .header(API_ARG_HEADER, HeaderValue::from_str(&arg)?)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(content);

        Self::send(request).await
    }

    async fn create_shared_link_with_settings(
        &self,
        arg: &CreateSharedLinkArg,
    ) -> Result<SharedLinkMetadata, ClientError> {
        debug!(path = %arg.path, "sharing/create_shared_link_with_settings");
        Self::send(self.rpc("sharing/create_shared_link_with_settings").json(arg)).await
    }

    async fn list_shared_links(
        &self,
        arg: &ListSharedLinksArg,
    ) -> Result<ListSharedLinksResult, ClientError> {
        debug!(path = %arg.path, "sharing/list_shared_links");
        Self::send(self.rpc("sharing/list_shared_links").json(arg)).await
    }
}

/// Escapes non-ASCII characters and DEL so JSON fits in an HTTP header value.
fn header_safe_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() && c != '\u{7f}' {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    out
}
