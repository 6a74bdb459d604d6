use reqwest::StatusCode;
use thiserror::Error;

/// Error summary prefix Dropbox uses when a shared link for the path exists.
const SHARED_LINK_ALREADY_EXISTS: &str = "shared_link_already_exists";

/// Errors raised by a [`StorageClient`](crate::StorageClient).
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status. `summary` is the
    /// provider's `error_summary` or, failing that, the raw body.
    #[error("{summary} (status {status})")]
    Api { status: StatusCode, summary: String },

    #[error("invalid dropbox json: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid request header: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

impl ClientError {
    /// The provider's error summary, if this is an API error.
    pub fn summary(&self) -> Option<&str> {
        match self {
            ClientError::Api { summary, .. } => Some(summary.as_str()),
            _ => None,
        }
    }
}

/// Whether link creation failed because a link for the path already exists.
pub fn is_shared_link_already_exists(err: &ClientError) -> bool {
    err.summary()
        .is_some_and(|summary| summary.starts_with(SHARED_LINK_ALREADY_EXISTS))
}

/// Errors raised by an [`Uploader`](crate::Uploader).
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("remote file path must not be empty")]
    EmptyPath,

    #[error(transparent)]
    Decode(#[from] base64::DecodeError),

    #[error(transparent)]
    Upload(ClientError),

    #[error(transparent)]
    CreateLink(ClientError),

    #[error(transparent)]
    ListLinks(ClientError),

    #[error("shared link already existed, but could not retrieve it")]
    SharedLinkNotFound,

    #[error("dropbox returned an empty shared link url")]
    EmptyUrl,
}
