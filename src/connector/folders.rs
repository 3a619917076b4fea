//! Folder syncer.
//!
//! The first listing (no parent, no cursor) yields only the synthetic root
//! folder. Every later listing walks one folder's contents and keeps the
//! folder items.

use super::collaboration::{role_entitlements, Collaborations};
use super::model::{
    Entitlement, Grant, Resource, ResourceId, ResourceType, RevokeOutcome, DOCUMENT_RESOURCE_TYPE,
    FOLDER_RESOURCE_TYPE, ROOT_FOLDER_ID,
};
use super::{GrantProvisioner, ResourceSyncer};
use crate::errors::LucidchartResult;
use crate::pagination::Page;
use crate::services::{FoldersService, SharesService};
use crate::types::{ContentItem, ShareTarget};
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// Lists folders and manages folder collaborations.
#[derive(Clone)]
pub struct FolderSyncer {
    folders: FoldersService,
    collaborations: Collaborations,
}

impl FolderSyncer {
    /// Creates a folder syncer.
    pub fn new(folders: FoldersService, shares: SharesService) -> Self {
        Self {
            folders,
            collaborations: Collaborations::new(shares, ShareTarget::Folder, FOLDER_RESOURCE_TYPE),
        }
    }
}

#[async_trait]
impl ResourceSyncer for FolderSyncer {
    fn resource_type(&self) -> &ResourceType {
        &FOLDER_RESOURCE_TYPE
    }

    async fn list(
        &self,
        parent: Option<&ResourceId>,
        page_token: Option<&str>,
    ) -> LucidchartResult<Page<Resource>> {
        let parent = match parent {
            Some(parent) => parent,
            None if page_token.map_or(true, str::is_empty) => {
                info!("Listing synthetic root folder");
                let root = folder_resource(ROOT_FOLDER_ID, ROOT_FOLDER_ID, None);
                return Ok(Page::new(vec![root], None));
            }
            None => {
                warn!(page_token, "Folder listing continued without a parent");
                return Ok(Page::empty());
            }
        };

        let page = list_contents(&self.folders, parent, page_token).await?;
        let items = page
            .items
            .into_iter()
            .filter(ContentItem::is_folder)
            .map(|item| folder_resource(&item.id(), &item.name, Some(parent.clone())))
            .collect::<Vec<_>>();

        debug!(parent = %parent.resource, count = items.len(), "Listed folders");

        Ok(Page::new(items, page.next_page_token))
    }

    async fn entitlements(&self, resource: &Resource) -> LucidchartResult<Vec<Entitlement>> {
        Ok(role_entitlements(resource))
    }

    async fn grants(
        &self,
        resource: &Resource,
        page_token: Option<&str>,
    ) -> LucidchartResult<Page<Grant>> {
        self.collaborations.grants(resource, page_token).await
    }

    fn provisioner(&self) -> Option<&dyn GrantProvisioner> {
        Some(self as &dyn GrantProvisioner)
    }
}

#[async_trait]
impl GrantProvisioner for FolderSyncer {
    async fn grant(&self, principal: &Resource, entitlement: &Entitlement) -> LucidchartResult<Grant> {
        self.collaborations.grant(principal, entitlement).await
    }

    async fn revoke(&self, grant: &Grant) -> LucidchartResult<RevokeOutcome> {
        self.collaborations.revoke(grant).await
    }
}

/// Lists one page of `parent`'s contents, using the dedicated endpoint for the root.
pub(crate) async fn list_contents(
    folders: &FoldersService,
    parent: &ResourceId,
    page_token: Option<&str>,
) -> LucidchartResult<Page<ContentItem>> {
    if parent.resource == ROOT_FOLDER_ID {
        folders.root_contents(page_token).await
    } else {
        folders.contents(&parent.resource, page_token).await
    }
}

/// A folder resource that may contain folders and documents.
pub fn folder_resource(id: &str, name: &str, parent: Option<ResourceId>) -> Resource {
    Resource::new(&FOLDER_RESOURCE_TYPE, id, name)
        .with_parent(parent)
        .with_child_type(&FOLDER_RESOURCE_TYPE)
        .with_child_type(&DOCUMENT_RESOURCE_TYPE)
}
