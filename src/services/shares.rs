//! Collaborator (shares) service.
//!
//! Folders and documents expose the same user-collaboration sub-resource;
//! [`ShareTarget`] picks the collection.

use super::encode_segment;
use crate::auth::AuthMode;
use crate::client::RequestExecutor;
use crate::errors::LucidchartResult;
use crate::pagination::Page;
use crate::transport::HttpMethod;
use crate::types::{CollaboratorRole, ShareTarget, UpsertCollaboratorRequest, UserCollaboration};
use std::sync::Arc;

/// Service for user collaborations on folders and documents.
#[derive(Clone)]
pub struct SharesService {
    executor: Arc<RequestExecutor>,
}

impl SharesService {
    /// Creates a new shares service.
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Lists one page of user collaborators on a folder or document.
    pub async fn list_user_collaborators(
        &self,
        target: ShareTarget,
        id: &str,
        page_token: Option<&str>,
    ) -> LucidchartResult<Page<UserCollaboration>> {
        let path = collaborators_path(target, id);
        let request = self
            .executor
            .request(HttpMethod::Get, &path, AuthMode::ApiKey)?
            .page_token(page_token);
        self.executor.execute_page(&request).await
    }

    /// Creates or replaces a user's role on a folder or document.
    pub async fn upsert_user_collaborator(
        &self,
        target: ShareTarget,
        id: &str,
        user_id: i64,
        role: CollaboratorRole,
    ) -> LucidchartResult<UserCollaboration> {
        let path = collaborator_path(target, id, user_id);
        let request = self
            .executor
            .request(HttpMethod::Put, &path, AuthMode::ApiKey)?
            .json(&UpsertCollaboratorRequest { role })?;
        self.executor.execute_json(&request).await
    }

    /// Removes a user's collaboration on a folder or document.
    pub async fn delete_user_collaborator(
        &self,
        target: ShareTarget,
        id: &str,
        user_id: i64,
    ) -> LucidchartResult<()> {
        let path = collaborator_path(target, id, user_id);
        let request = self
            .executor
            .request(HttpMethod::Delete, &path, AuthMode::ApiKey)?;
        self.executor.execute_empty(&request).await
    }
}

fn collaborators_path(target: ShareTarget, id: &str) -> String {
    format!("/{}/{}/shares/users", target.path_segment(), encode_segment(id))
}

fn collaborator_path(target: ShareTarget, id: &str, user_id: i64) -> String {
    format!("{}/{}", collaborators_path(target, id), user_id)
}
