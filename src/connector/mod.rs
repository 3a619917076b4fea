//! Identity-governance connector over the Lucidchart API.
//!
//! The host drives synchronization through [`ResourceSyncer`]: it lists
//! resources of each type page by page, asks each resource for its
//! entitlements and grants, and applies or revokes grants through the
//! syncer's [`GrantProvisioner`].
//!
//! # Example
//!
//! ```no_run
//! use integrations_lucidchart::connector::Connector;
//! use integrations_lucidchart::LucidchartConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let connector = Connector::new(LucidchartConfig::from_env()?)?;
//!
//! for syncer in connector.resource_syncers() {
//!     let page = syncer.list(None, None).await?;
//!     println!("{}: {} resources", syncer.resource_type().id, page.len());
//! }
//! # Ok(())
//! # }
//! ```

mod collaboration;
mod documents;
mod folders;
mod model;
mod users;

pub use collaboration::{
    collaboration_grant, parse_role_slug, role_entitlement, role_entitlements, role_slug,
    USER_ENTITLEMENT_PREFIX,
};
pub use documents::DocumentSyncer;
pub use folders::{folder_resource, FolderSyncer};
pub use model::*;
pub use users::{user_resource, UserSyncer};

use crate::client::LucidchartClient;
use crate::config::LucidchartConfig;
use crate::errors::LucidchartResult;
use crate::pagination::Page;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Synchronizes one resource type.
#[async_trait]
pub trait ResourceSyncer: Send + Sync {
    /// The resource type this syncer produces.
    fn resource_type(&self) -> &ResourceType;

    /// Lists one page of resources under `parent`.
    async fn list(
        &self,
        parent: Option<&ResourceId>,
        page_token: Option<&str>,
    ) -> LucidchartResult<Page<Resource>>;

    /// Lists the entitlements offered by `resource`.
    async fn entitlements(&self, resource: &Resource) -> LucidchartResult<Vec<Entitlement>>;

    /// Lists one page of grants on `resource`.
    async fn grants(
        &self,
        resource: &Resource,
        page_token: Option<&str>,
    ) -> LucidchartResult<Page<Grant>>;

    /// Grant mutation support, if the resource type has any.
    fn provisioner(&self) -> Option<&dyn GrantProvisioner> {
        None
    }
}

/// Applies and revokes grants.
#[async_trait]
pub trait GrantProvisioner: Send + Sync {
    /// Grants `entitlement` to `principal` and returns the resulting grant.
    async fn grant(&self, principal: &Resource, entitlement: &Entitlement) -> LucidchartResult<Grant>;

    /// Revokes `grant`. A grant upstream no longer has is reported as
    /// [`RevokeOutcome::AlreadyRevoked`].
    async fn revoke(&self, grant: &Grant) -> LucidchartResult<RevokeOutcome>;
}

/// Connector description shown by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorMetadata {
    /// Display name.
    pub display_name: String,
    /// Description.
    pub description: String,
}

/// Lucidchart connector.
pub struct Connector {
    client: LucidchartClient,
}

impl Connector {
    /// Creates a connector. No upstream call is made until the first sync.
    pub fn new(config: LucidchartConfig) -> LucidchartResult<Self> {
        Ok(Self::with_client(LucidchartClient::new(config)?))
    }

    /// Creates a connector over an existing client.
    pub fn with_client(client: LucidchartClient) -> Self {
        Self { client }
    }

    /// Connector description.
    pub fn metadata(&self) -> ConnectorMetadata {
        ConnectorMetadata {
            display_name: "Lucidchart".to_string(),
            description: "Lucidchart connector".to_string(),
        }
    }

    /// The resource types this connector synchronizes.
    pub fn resource_types(&self) -> Vec<ResourceType> {
        vec![USER_RESOURCE_TYPE, FOLDER_RESOURCE_TYPE, DOCUMENT_RESOURCE_TYPE]
    }

    /// One syncer per resource type.
    pub fn resource_syncers(&self) -> Vec<Box<dyn ResourceSyncer>> {
        vec![
            Box::new(self.users()),
            Box::new(self.folders()),
            Box::new(self.documents()),
        ]
    }

    /// The user syncer.
    pub fn users(&self) -> UserSyncer {
        UserSyncer::new(self.client.users())
    }

    /// The folder syncer.
    pub fn folders(&self) -> FolderSyncer {
        FolderSyncer::new(self.client.folders(), self.client.shares())
    }

    /// The document syncer.
    pub fn documents(&self) -> DocumentSyncer {
        DocumentSyncer::new(self.client.folders(), self.client.shares())
    }

    /// The underlying API client.
    pub fn client(&self) -> &LucidchartClient {
        &self.client
    }
}
