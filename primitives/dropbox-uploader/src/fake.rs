//! In-memory [`StorageClient`] that records calls and replays canned results.

use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::client::StorageClient;
use crate::error::ClientError;
use crate::types::{
    CommitInfo, CreateSharedLinkArg, FileMetadata, ListSharedLinksArg, ListSharedLinksResult,
    SharedLinkMetadata,
};

/// Records the arguments of each call and returns one queued result.
pub(crate) struct Spy<A, R> {
    calls: Mutex<Vec<A>>,
    result: Mutex<Option<Result<R, ClientError>>>,
}

impl<A: Clone, R> Spy<A, R> {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            result: Mutex::new(None),
        }
    }

    pub(crate) fn returns(&self, result: Result<R, ClientError>) {
        *self.result.lock().unwrap() = Some(result);
    }

    pub(crate) fn calls(&self) -> Vec<A> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, arg: A) -> Result<R, ClientError> {
        self.calls.lock().unwrap().push(arg);
        self.result
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| {
                Err(ClientError::Api {
                    status: StatusCode::NOT_IMPLEMENTED,
                    summary: "fake client has no result queued".to_string(),
                })
            })
    }
}

pub(crate) struct FakeClient {
    pub(crate) upload: Spy<(CommitInfo, Vec<u8>), FileMetadata>,
    pub(crate) create_shared_link: Spy<CreateSharedLinkArg, SharedLinkMetadata>,
    pub(crate) list_shared_links: Spy<ListSharedLinksArg, ListSharedLinksResult>,
}

impl FakeClient {
    pub(crate) fn new() -> Self {
        Self {
            upload: Spy::new(),
            create_shared_link: Spy::new(),
            list_shared_links: Spy::new(),
        }
    }
}

#[async_trait]
impl StorageClient for FakeClient {
    async fn upload(
        &self,
        commit: &CommitInfo,
        content: Vec<u8>,
    ) -> Result<FileMetadata, ClientError> {
        self.upload.record((commit.clone(), content))
    }

    async fn create_shared_link_with_settings(
        &self,
        arg: &CreateSharedLinkArg,
    ) -> Result<SharedLinkMetadata, ClientError> {
        self.create_shared_link.record(arg.clone())
    }

    async fn list_shared_links(
        &self,
        arg: &ListSharedLinksArg,
    ) -> Result<ListSharedLinksResult, ClientError> {
        self.list_shared_links.record(arg.clone())
    }
}
