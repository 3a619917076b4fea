//! Folder contents service.

use super::encode_segment;
use crate::auth::AuthMode;
use crate::client::RequestExecutor;
use crate::errors::LucidchartResult;
use crate::pagination::Page;
use crate::transport::HttpMethod;
use crate::types::ContentItem;
use std::sync::Arc;

/// Service for walking the folder hierarchy.
#[derive(Clone)]
pub struct FoldersService {
    executor: Arc<RequestExecutor>,
}

impl FoldersService {
    /// Creates a new folders service.
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Lists one page of the account's root folder contents.
    pub async fn root_contents(&self, page_token: Option<&str>) -> LucidchartResult<Page<ContentItem>> {
        self.list("/folders/root/contents", page_token).await
    }

    /// Lists one page of a folder's contents.
    pub async fn contents(
        &self,
        folder_id: &str,
        page_token: Option<&str>,
    ) -> LucidchartResult<Page<ContentItem>> {
        let path = format!("/folders/{}/contents", encode_segment(folder_id));
        self.list(&path, page_token).await
    }

    async fn list(&self, path: &str, page_token: Option<&str>) -> LucidchartResult<Page<ContentItem>> {
        let request = self
            .executor
            .request(HttpMethod::Get, path, AuthMode::ApiKey)?
            .page_token(page_token);
        self.executor.execute_page(&request).await
    }
}
