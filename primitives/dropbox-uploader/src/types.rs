//! Dropbox API v2 request and response bodies used by the uploader.
//!
//! Only the fields the uploader reads are modelled; everything else in the
//! provider's responses is ignored.

use serde::{Deserialize, Serialize};

/// How a write treats an existing file at the target path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = ".tag", rename_all = "snake_case")]
pub enum WriteMode {
    /// Never overwrite; the provider renames or rejects on conflict.
    Add,
    /// Replace whatever is stored at the path.
    Overwrite,
}

/// Arguments for `files/upload`, sent in the `Dropbox-API-Arg` header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitInfo {
    pub path: String,
    pub mode: WriteMode,
    pub autorename: bool,
    pub mute: bool,
}

impl CommitInfo {
    /// Commit info for `path` that replaces any existing file.
    pub fn overwrite(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mode: WriteMode::Overwrite,
            autorename: false,
            mute: false,
        }
    }
}

/// Metadata returned for an uploaded file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FileMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub path_lower: Option<String>,
    #[serde(default)]
    pub path_display: Option<String>,
    #[serde(default)]
    pub size: u64,
}

/// Arguments for `sharing/create_shared_link_with_settings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateSharedLinkArg {
    pub path: String,
}

/// Arguments for `sharing/list_shared_links`, scoped to a single path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListSharedLinksArg {
    pub path: String,
    pub direct_only: bool,
}

impl ListSharedLinksArg {
    /// Query for links that point directly at `path`.
    pub fn for_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            direct_only: true,
        }
    }
}

/// A shared link as described by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SharedLinkMetadata {
    pub url: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path_lower: Option<String>,
}

/// Page of shared links returned by `sharing/list_shared_links`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListSharedLinksResult {
    #[serde(default)]
    pub links: Vec<SharedLinkMetadata>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub cursor: Option<String>,
}

/// Error body of a non-2xx API response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error_summary: String,
}
