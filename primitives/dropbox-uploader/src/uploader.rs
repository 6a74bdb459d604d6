//! Upload sequence: write the file, then resolve a public link for it.
//!
//! ```text
//! upload(path, bytes)
//!   ├─ files/upload (overwrite)                 ── error → return it
//!   └─ create_shared_link_with_settings
//!        ├─ ok                                   → link url
//!        ├─ shared_link_already_exists/...
//!        │    └─ list_shared_links(path)
//!        │         ├─ first link                 → link url
//!        │         └─ no links                   → SharedLinkNotFound
//!        └─ anything else                        → return it
//! ```

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::Client;
use tracing::{debug, info};

use crate::client::{DropboxClient, StorageClient};
use crate::error::{UploadError, is_shared_link_already_exists};
use crate::types::{CommitInfo, CreateSharedLinkArg, ListSharedLinksArg};

/// A file to place at a remote path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    remote_file_path: String,
    content: Vec<u8>,
}

impl UploadRequest {
    /// Fails with [`UploadError::EmptyPath`] if `remote_file_path` is empty.
    pub fn new(remote_file_path: impl Into<String>, content: Vec<u8>) -> Result<Self, UploadError> {
        let remote_file_path = remote_file_path.into();
        if remote_file_path.is_empty() {
            return Err(UploadError::EmptyPath);
        }
        Ok(Self {
            remote_file_path,
            content,
        })
    }

    pub fn remote_file_path(&self) -> &str {
        &self.remote_file_path
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

/// Outcome of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    public_url: String,
}

impl UploadResult {
    /// Fails with [`UploadError::EmptyUrl`] if `public_url` is empty.
    pub fn new(public_url: String) -> Result<Self, UploadError> {
        if public_url.is_empty() {
            return Err(UploadError::EmptyUrl);
        }
        Ok(Self { public_url })
    }

    pub fn public_url(&self) -> &str {
        &self.public_url
    }

    pub fn into_public_url(self) -> String {
        self.public_url
    }
}

/// Places files in remote storage and hands back a public URL for them.
#[async_trait]
pub trait Uploader: Send + Sync {
    /// Uploads `content` to `remote_file_path`, replacing any existing file.
    async fn upload(
        &self,
        remote_file_path: &str,
        content: Vec<u8>,
    ) -> Result<UploadResult, UploadError>;

    /// Decodes standard base64 `content_base64` and uploads the bytes.
    ///
    /// Line breaks are ignored so wrapped `base64` output is accepted; any
    /// other invalid byte fails the decode. Nothing is sent if decoding fails.
    async fn upload_base64(
        &self,
        remote_file_path: &str,
        content_base64: &str,
    ) -> Result<UploadResult, UploadError> {
        let content = decode_base64(content_base64)?;
        self.upload(remote_file_path, content).await
    }
}

/// Standard base64 decode that skips `\r` and `\n`.
fn decode_base64(content_base64: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let unwrapped: Vec<u8> = content_base64
        .bytes()
        .filter(|b| !matches!(b, b'\r' | b'\n'))
        .collect();
    STANDARD.decode(unwrapped)
}

/// [`Uploader`] backed by a Dropbox-shaped [`StorageClient`].
#[derive(Debug, Clone)]
pub struct DropboxUploader<C> {
    client: C,
}

impl DropboxUploader<DropboxClient> {
    /// Uploader using the Dropbox API with `access_token`.
    pub fn new(access_token: impl Into<String>, http: Client) -> Self {
        Self::with_client(DropboxClient::new(access_token, http))
    }
}

impl<C: StorageClient> DropboxUploader<C> {
    pub fn with_client(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    async fn resolve_shared_link(&self, path: &str) -> Result<String, UploadError> {
        let arg = CreateSharedLinkArg {
            path: path.to_string(),
        };

        let err = match self.client.create_shared_link_with_settings(&arg).await {
            Ok(link) => return Ok(link.url),
            Err(err) if is_shared_link_already_exists(&err) => err,
            Err(err) => return Err(UploadError::CreateLink(err)),
        };

        debug!(path, error = %err, "shared link exists, looking it up");

        let links = self
            .client
            .list_shared_links(&ListSharedLinksArg::for_path(path))
            .await
            .map_err(UploadError::ListLinks)?;

        links
            .links
            .into_iter()
            .next()
            .map(|link| link.url)
            .ok_or(UploadError::SharedLinkNotFound)
    }
}

#[async_trait]
impl<C: StorageClient> Uploader for DropboxUploader<C> {
    async fn upload(
        &self,
        remote_file_path: &str,
        content: Vec<u8>,
    ) -> Result<UploadResult, UploadError> {
        let request = UploadRequest::new(remote_file_path, content)?;
        let commit = CommitInfo::overwrite(request.remote_file_path());

        let metadata = self
            .client
            .upload(&commit, request.content)
            .await
            .map_err(UploadError::Upload)?;

        let path = metadata
            .path_lower
            .unwrap_or(request.remote_file_path);
        debug!(path = %path, "file written");

        let url = self.resolve_shared_link(&path).await?;
        info!(path = %path, url = %url, "shared link resolved");

        UploadResult::new(url)
    }
}
