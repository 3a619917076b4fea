//! User syncer.

use super::model::{
    Entitlement, Grant, Resource, ResourceId, ResourceType, UserEmail, UserStatus, UserTrait,
    USER_RESOURCE_TYPE,
};
use super::ResourceSyncer;
use crate::errors::LucidchartResult;
use crate::pagination::Page;
use crate::services::UsersService;
use crate::types::User;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::{debug, error};

/// Lists account users as principals.
#[derive(Clone)]
pub struct UserSyncer {
    users: UsersService,
}

impl UserSyncer {
    /// Creates a user syncer.
    pub fn new(users: UsersService) -> Self {
        Self { users }
    }
}

#[async_trait]
impl ResourceSyncer for UserSyncer {
    fn resource_type(&self) -> &ResourceType {
        &USER_RESOURCE_TYPE
    }

    async fn list(
        &self,
        _parent: Option<&ResourceId>,
        page_token: Option<&str>,
    ) -> LucidchartResult<Page<Resource>> {
        let page = self.users.list(page_token).await.map_err(|e| {
            error!(error = %e, "Error getting users");
            e
        })?;

        debug!(count = page.len(), has_next = page.has_next(), "Listed users");

        Ok(page.map(|user| user_resource(&user)))
    }

    /// Users carry no entitlements.
    async fn entitlements(&self, _resource: &Resource) -> LucidchartResult<Vec<Entitlement>> {
        Ok(Vec::new())
    }

    /// Users carry no grants.
    async fn grants(
        &self,
        _resource: &Resource,
        _page_token: Option<&str>,
    ) -> LucidchartResult<Page<Grant>> {
        Ok(Page::empty())
    }
}

/// Maps an upstream user to a principal resource keyed by its numeric id.
pub fn user_resource(user: &User) -> Resource {
    let mut profile = Map::new();
    profile.insert("account_id".to_string(), json!(user.account_id));
    profile.insert("email".to_string(), json!(user.email));
    profile.insert("name".to_string(), json!(user.name));
    profile.insert("user_id".to_string(), json!(user.user_id));
    profile.insert(
        "usernames".to_string(),
        user.usernames.clone().map(Value::String).unwrap_or(Value::Null),
    );
    profile.insert("roles".to_string(), json!(user.roles));

    Resource::new(&USER_RESOURCE_TYPE, user.user_id.to_string(), user.email.clone())
        .with_user_trait(UserTrait {
            profile,
            emails: vec![UserEmail {
                address: user.email.clone(),
                is_primary: true,
            }],
            login: user.email.clone(),
            status: UserStatus::Enabled,
        })
}
