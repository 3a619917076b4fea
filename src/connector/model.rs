//! Governance-side records produced by the connector.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Id of the synthetic folder at the top of the hierarchy.
///
/// It is never sent upstream as a path parameter.
pub const ROOT_FOLDER_ID: &str = "root";

/// Capability a resource type advertises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceTrait {
    /// The resource is a principal.
    User,
}

/// A kind of synchronized resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResourceType {
    /// Stable id.
    pub id: &'static str,
    /// Human-readable name.
    pub display_name: &'static str,
    /// Advertised traits.
    pub traits: &'static [ResourceTrait],
}

/// Account users.
pub const USER_RESOURCE_TYPE: ResourceType = ResourceType {
    id: "user",
    display_name: "User",
    traits: &[ResourceTrait::User],
};

/// Folders, including the synthetic root.
pub const FOLDER_RESOURCE_TYPE: ResourceType = ResourceType {
    id: "folder",
    display_name: "Folder",
    traits: &[],
};

/// Documents.
pub const DOCUMENT_RESOURCE_TYPE: ResourceType = ResourceType {
    id: "document",
    display_name: "Document",
    traits: &[],
};

/// Typed identity of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId {
    /// Resource type id.
    pub resource_type: String,
    /// Upstream id.
    pub resource: String,
}

impl ResourceId {
    /// Creates a resource id of the given type.
    pub fn new(resource_type: &ResourceType, resource: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.id.to_string(),
            resource: resource.into(),
        }
    }

    /// Returns true if the id is of the given type.
    pub fn is_type(&self, resource_type: &ResourceType) -> bool {
        self.resource_type == resource_type.id
    }

    /// Returns true if the id names the synthetic root folder.
    pub fn is_root_folder(&self) -> bool {
        self.is_type(&FOLDER_RESOURCE_TYPE) && self.resource == ROOT_FOLDER_ID
    }
}

/// Login state of a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// Active.
    Enabled,
    /// Deactivated.
    Disabled,
}

/// An email address of a principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEmail {
    /// Address.
    pub address: String,
    /// Whether this is the primary address.
    pub is_primary: bool,
}

/// Principal details attached to user resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserTrait {
    /// Free-form profile fields.
    pub profile: Map<String, Value>,
    /// Email addresses.
    pub emails: Vec<UserEmail>,
    /// Login name.
    pub login: String,
    /// Login state.
    pub status: UserStatus,
}

/// A synchronized resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Identity.
    pub id: ResourceId,
    /// Human-readable name.
    pub display_name: String,
    /// Containing resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ResourceId>,
    /// Resource types that may be listed under this resource.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child_resource_types: Vec<String>,
    /// Principal details, for user resources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_trait: Option<UserTrait>,
}

impl Resource {
    /// Creates a resource with no parent, children or traits.
    pub fn new(
        resource_type: &ResourceType,
        id: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            id: ResourceId::new(resource_type, id),
            display_name: display_name.into(),
            parent_id: None,
            child_resource_types: Vec::new(),
            user_trait: None,
        }
    }

    /// Sets the containing resource.
    pub fn with_parent(mut self, parent_id: Option<ResourceId>) -> Self {
        self.parent_id = parent_id;
        self
    }

    /// Marks a resource type as listable under this resource.
    pub fn with_child_type(mut self, resource_type: &ResourceType) -> Self {
        self.child_resource_types.push(resource_type.id.to_string());
        self
    }

    /// Attaches principal details.
    pub fn with_user_trait(mut self, user_trait: UserTrait) -> Self {
        self.user_trait = Some(user_trait);
        self
    }
}

/// What holding an entitlement means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitlementPurpose {
    /// Membership-style assignment.
    Assignment,
    /// A permission on the resource.
    Permission,
}

/// A permission a principal can hold on a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entitlement {
    /// Globally unique id, `<type>:<resource>:<slug>`.
    pub id: String,
    /// Resource the entitlement is on.
    pub resource: Resource,
    /// Slug, unique per resource.
    pub slug: String,
    /// Human-readable name.
    pub display_name: String,
    /// Human-readable description.
    pub description: String,
    /// Resource types that may be granted this entitlement.
    pub grantable_to: Vec<String>,
    /// Kind of entitlement.
    pub purpose: EntitlementPurpose,
}

impl Entitlement {
    /// Creates a permission entitlement on `resource`.
    pub fn permission(resource: &Resource, slug: impl Into<String>) -> Self {
        let slug = slug.into();
        Self {
            id: format!(
                "{}:{}:{}",
                resource.id.resource_type, resource.id.resource, slug
            ),
            resource: resource.clone(),
            slug,
            display_name: String::new(),
            description: String::new(),
            grantable_to: Vec::new(),
            purpose: EntitlementPurpose::Permission,
        }
    }

    /// Sets the display name.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Allows granting to `resource_type`.
    pub fn grantable_to(mut self, resource_type: &ResourceType) -> Self {
        self.grantable_to.push(resource_type.id.to_string());
        self
    }
}

/// An entitlement held by a principal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grant {
    /// Globally unique id, `<entitlement id>:<principal type>:<principal>`.
    pub id: String,
    /// Held entitlement.
    pub entitlement: Entitlement,
    /// Holder.
    pub principal: ResourceId,
    /// Provenance recorded when the grant was observed.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl Grant {
    /// Creates a grant of `entitlement` to `principal`.
    pub fn new(entitlement: Entitlement, principal: ResourceId) -> Self {
        Self {
            id: format!(
                "{}:{}:{}",
                entitlement.id, principal.resource_type, principal.resource
            ),
            entitlement,
            principal,
            metadata: Map::new(),
        }
    }

    /// Attaches metadata.
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Result of a revoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevokeOutcome {
    /// The grant was removed.
    Revoked,
    /// Upstream had no such grant; the desired state already held.
    AlreadyRevoked,
}
