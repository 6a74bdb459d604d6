//! Dropbox Uploader - Upload and Share
//!
//! Uploads a file to Dropbox in overwrite mode and returns a public shared
//! link for it. Dropbox refuses to create a second shared link for the same
//! path, so when one already exists the uploader looks it up and reuses it.
//!
//! # Usage
//!
//! ```no_run
//! use dropbox_uploader::{DropboxUploader, Uploader};
//!
//! # async fn run() -> Result<(), dropbox_uploader::UploadError> {
//! let uploader = DropboxUploader::new("access-token", reqwest::Client::new());
//! let result = uploader.upload_base64("/failures/example.png", "iVBORw0KGgo=").await?;
//! println!("{}", result.public_url());
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
#[cfg(test)]
mod fake;
mod types;
mod uploader;

pub use client::{DEFAULT_API_URL, DEFAULT_CONTENT_URL, DropboxClient, StorageClient};
pub use error::{ClientError, UploadError, is_shared_link_already_exists};
pub use types::{
    CommitInfo, CreateSharedLinkArg, FileMetadata, ListSharedLinksArg, ListSharedLinksResult,
    SharedLinkMetadata, WriteMode,
};
pub use uploader::{DropboxUploader, UploadRequest, UploadResult, Uploader};
