//! Document syncer.

use super::collaboration::{role_entitlements, Collaborations};
use super::folders::list_contents;
use super::model::{
    Entitlement, Grant, Resource, ResourceId, ResourceType, RevokeOutcome, DOCUMENT_RESOURCE_TYPE,
};
use super::{GrantProvisioner, ResourceSyncer};
use crate::errors::LucidchartResult;
use crate::pagination::Page;
use crate::services::{FoldersService, SharesService};
use crate::types::{ContentItem, ShareTarget};
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// Lists documents and manages document collaborations.
///
/// Documents are only ever listed under a folder. The parentless first call
/// returns nothing so the synthetic root is never enumerated as a document.
#[derive(Clone)]
pub struct DocumentSyncer {
    folders: FoldersService,
    collaborations: Collaborations,
}

impl DocumentSyncer {
    /// Creates a document syncer.
    pub fn new(folders: FoldersService, shares: SharesService) -> Self {
        Self {
            folders,
            collaborations: Collaborations::new(
                shares,
                ShareTarget::Document,
                DOCUMENT_RESOURCE_TYPE,
            ),
        }
    }
}

#[async_trait]
impl ResourceSyncer for DocumentSyncer {
    fn resource_type(&self) -> &ResourceType {
        &DOCUMENT_RESOURCE_TYPE
    }

    async fn list(
        &self,
        parent: Option<&ResourceId>,
        page_token: Option<&str>,
    ) -> LucidchartResult<Page<Resource>> {
        let parent = match parent {
            Some(parent) => parent,
            None if page_token.map_or(true, str::is_empty) => {
                info!("Ignoring document listing without a parent folder");
                return Ok(Page::empty());
            }
            None => {
                warn!(page_token, "Document listing continued without a parent");
                return Ok(Page::empty());
            }
        };

        let page = list_contents(&self.folders, parent, page_token).await?;
        let items = page
            .items
            .into_iter()
            .filter(ContentItem::is_document)
            .map(|item| document_resource(&item, parent.clone()))
            .collect::<Vec<_>>();

        debug!(parent = %parent.resource, count = items.len(), "Listed documents");

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
impl GrantProvisioner for DocumentSyncer {
    async fn grant(&self, principal: &Resource, entitlement: &Entitlement) -> LucidchartResult<Grant> {
        self.collaborations.grant(principal, entitlement).await
    }

    async fn revoke(&self, grant: &Grant) -> LucidchartResult<RevokeOutcome> {
        self.collaborations.revoke(grant).await
    }
}

fn document_resource(item: &ContentItem, parent: ResourceId) -> Resource {
    Resource::new(&DOCUMENT_RESOURCE_TYPE, item.id(), item.name.clone()).with_parent(Some(parent))
}
