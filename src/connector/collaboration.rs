//! Role entitlements and collaboration grants shared by folders and documents.

use super::model::{
    Entitlement, Grant, Resource, ResourceId, ResourceType, RevokeOutcome, USER_RESOURCE_TYPE,
};
use crate::errors::{LucidchartError, LucidchartResult, ResponseError};
use crate::pagination::Page;
use crate::services::SharesService;
use crate::types::{CollaboratorRole, ShareTarget, UserCollaboration};
use serde_json::{Map, Value};
use tracing::{debug, info};

/// Slug prefix of user role entitlements.
pub const USER_ENTITLEMENT_PREFIX: &str = "user/";

/// Entitlement slug for a role, e.g. `user/editandshare`.
pub fn role_slug(role: CollaboratorRole) -> String {
    format!("{}{}", USER_ENTITLEMENT_PREFIX, role)
}

/// Parses the role out of an entitlement slug.
pub fn parse_role_slug(slug: &str) -> LucidchartResult<CollaboratorRole> {
    let parts: Vec<&str> = slug.split('/').collect();
    if parts.len() != 2 {
        return Err(LucidchartError::invalid_argument(format!(
            "invalid entitlement slug {}",
            slug
        )));
    }
    parts[1].parse().map_err(LucidchartError::invalid_argument)
}

/// The entitlement for holding `role` on `resource`.
pub fn role_entitlement(resource: &Resource, role: CollaboratorRole) -> Entitlement {
    let principal = USER_RESOURCE_TYPE.display_name;
    Entitlement::permission(resource, role_slug(role))
        .grantable_to(&USER_RESOURCE_TYPE)
        .with_description(format!(
            "{} can {} on {}",
            principal, role, resource.display_name
        ))
        .with_display_name(format!(
            "{} is {} of {}",
            principal, role, resource.display_name
        ))
}

/// One entitlement per role, in role order.
pub fn role_entitlements(resource: &Resource) -> Vec<Entitlement> {
    CollaboratorRole::ALL
        .into_iter()
        .map(|role| role_entitlement(resource, role))
        .collect()
}

/// The grant an upstream collaboration record represents.
pub fn collaboration_grant(resource: &Resource, collaboration: &UserCollaboration) -> Grant {
    let mut metadata = Map::new();
    metadata.insert(
        "role".to_string(),
        Value::String(collaboration.role.as_str().to_string()),
    );
    metadata.insert(
        "created".to_string(),
        Value::String(collaboration.created.to_rfc3339()),
    );

    Grant::new(
        role_entitlement(resource, collaboration.role),
        ResourceId::new(&USER_RESOURCE_TYPE, collaboration.user_id.to_string()),
    )
    .with_metadata(metadata)
}

/// Grant listing and mutation against one share target.
#[derive(Clone)]
pub(crate) struct Collaborations {
    shares: SharesService,
    target: ShareTarget,
    resource_type: ResourceType,
}

impl Collaborations {
    pub(crate) fn new(shares: SharesService, target: ShareTarget, resource_type: ResourceType) -> Self {
        Self {
            shares,
            target,
            resource_type,
        }
    }

    /// Lists one page of grants on `resource`. The root folder has none.
    pub(crate) async fn grants(
        &self,
        resource: &Resource,
        page_token: Option<&str>,
    ) -> LucidchartResult<Page<Grant>> {
        if resource.id.is_root_folder() {
            return Ok(Page::empty());
        }

        let page = self
            .shares
            .list_user_collaborators(self.target, &resource.id.resource, page_token)
            .await?;

        debug!(
            resource_type = self.resource_type.id,
            resource = %resource.id.resource,
            count = page.len(),
            "Listed collaborators"
        );

        Ok(page.map(|collaboration| collaboration_grant(resource, &collaboration)))
    }

    /// Grants `entitlement` to `principal` by upserting the collaboration.
    pub(crate) async fn grant(
        &self,
        principal: &Resource,
        entitlement: &Entitlement,
    ) -> LucidchartResult<Grant> {
        if !principal.id.is_type(&USER_RESOURCE_TYPE) {
            return Err(LucidchartError::invalid_argument(format!(
                "resource type {} is not supported",
                principal.id.resource_type
            )));
        }
        self.check_target(&entitlement.resource.id)?;

        let user_id = parse_user_id(&principal.id)?;
        let role = parse_role_slug(&entitlement.slug)?;

        let collaboration = self
            .shares
            .upsert_user_collaborator(self.target, &entitlement.resource.id.resource, user_id, role)
            .await?;

        if collaboration.user_id != user_id || collaboration.role != role {
            return Err(LucidchartError::Response(ResponseError::UnexpectedFormat(format!(
                "upsert of {} for user {} returned {} for user {}",
                role, user_id, collaboration.role, collaboration.user_id
            ))));
        }

        info!(
            resource_type = self.resource_type.id,
            resource = %entitlement.resource.id.resource,
            user_id,
            role = %role,
            "Granted collaboration"
        );

        Ok(collaboration_grant(&entitlement.resource, &collaboration))
    }

    /// Revokes `grant` by deleting the collaboration.
    pub(crate) async fn revoke(&self, grant: &Grant) -> LucidchartResult<RevokeOutcome> {
        if !grant.principal.is_type(&USER_RESOURCE_TYPE) {
            return Err(LucidchartError::invalid_argument(format!(
                "resource type {} is not supported",
                grant.principal.resource_type
            )));
        }
        let resource = &grant.entitlement.resource.id;
        self.check_target(resource)?;

        let user_id = parse_user_id(&grant.principal)?;

        match self
            .shares
            .delete_user_collaborator(self.target, &resource.resource, user_id)
            .await
        {
            Ok(()) => {
                info!(
                    resource_type = self.resource_type.id,
                    resource = %resource.resource,
                    user_id,
                    "Revoked collaboration"
                );
                Ok(RevokeOutcome::Revoked)
            }
            Err(e) if e.is_not_found() => {
                info!(
                    resource_type = self.resource_type.id,
                    resource = %resource.resource,
                    user_id,
                    "Collaboration already revoked"
                );
                Ok(RevokeOutcome::AlreadyRevoked)
            }
            Err(e) => Err(e),
        }
    }

    fn check_target(&self, resource: &ResourceId) -> LucidchartResult<()> {
        if !resource.is_type(&self.resource_type) {
            return Err(LucidchartError::invalid_argument(format!(
                "entitlement is on a {}, expected a {}",
                resource.resource_type, self.resource_type.id
            )));
        }
        if resource.is_root_folder() {
            return Err(LucidchartError::invalid_argument(
                "the root folder has no collaborators",
            ));
        }
        Ok(())
    }
}

fn parse_user_id(id: &ResourceId) -> LucidchartResult<i64> {
    id.resource.parse().map_err(|_| {
        LucidchartError::invalid_argument(format!("invalid user id {}", id.resource))
    })
}
