//! Type definitions for the Lucidchart REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A Lucid account user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Account the user belongs to.
    pub account_id: i64,

    /// Primary email address.
    pub email: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Numeric user id.
    pub user_id: i64,

    /// Username string.
    #[serde(default)]
    pub usernames: Option<String>,

    /// Account-level roles.
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Identifier of a folder-contents item.
///
/// Folder ids arrive as JSON numbers (sometimes float-encoded), document ids as
/// strings. Only [`ContentItem::id`] should look inside.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ContentId {
    /// Integer id.
    Integer(i64),
    /// Float-encoded integer id.
    Float(f64),
    /// String id.
    Text(String),
}

impl ContentId {
    /// Canonical string form.
    pub fn canonical(&self) -> String {
        match self {
            ContentId::Integer(v) => v.to_string(),
            ContentId::Float(v) if v.fract() == 0.0 && v.is_finite() => format!("{:.0}", v),
            ContentId::Float(v) => v.to_string(),
            ContentId::Text(v) => v.clone(),
        }
    }
}

/// Discriminator of a folder-contents item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// A folder.
    Folder,
    /// A document.
    Document,
    /// Anything else the API may add, or a missing discriminator.
    #[default]
    #[serde(other)]
    Other,
}

/// One entry of a folder-contents listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// Raw identifier.
    #[serde(rename = "id")]
    pub raw_id: ContentId,

    /// Item kind.
    #[serde(rename = "type", default)]
    pub content_type: ContentType,

    /// Item name.
    #[serde(default)]
    pub name: String,

    /// Whether the item is a shortcut.
    #[serde(default)]
    pub shortcut: bool,

    /// Product the document belongs to.
    #[serde(default)]
    pub product: Option<String>,
}

impl ContentItem {
    /// Returns the item id in canonical string form.
    pub fn id(&self) -> String {
        self.raw_id.canonical()
    }

    /// Returns true if the item is a folder.
    pub fn is_folder(&self) -> bool {
        self.content_type == ContentType::Folder
    }

    /// Returns true if the item is a document.
    pub fn is_document(&self) -> bool {
        self.content_type == ContentType::Document
    }
}

/// Role a user can hold on a folder or document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollaboratorRole {
    /// Owner.
    Owner,
    /// Edit and share.
    EditAndShare,
    /// Edit.
    Edit,
    /// Comment.
    Comment,
    /// View.
    View,
}

impl CollaboratorRole {
    /// All roles, in entitlement order.
    pub const ALL: [CollaboratorRole; 5] = [
        CollaboratorRole::Owner,
        CollaboratorRole::EditAndShare,
        CollaboratorRole::Edit,
        CollaboratorRole::Comment,
        CollaboratorRole::View,
    ];

    /// Wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            CollaboratorRole::Owner => "owner",
            CollaboratorRole::EditAndShare => "editandshare",
            CollaboratorRole::Edit => "edit",
            CollaboratorRole::Comment => "comment",
            CollaboratorRole::View => "view",
        }
    }
}

impl fmt::Display for CollaboratorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollaboratorRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CollaboratorRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("unknown collaborator role: {}", s))
    }
}

/// A user's role on a folder or document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserCollaboration {
    /// Collaborating user.
    pub user_id: i64,

    /// Granted role.
    pub role: CollaboratorRole,

    /// When the collaboration was created.
    pub created: DateTime<Utc>,
}

/// Body of a collaborator upsert.
#[derive(Debug, Clone, Serialize)]
pub struct UpsertCollaboratorRequest {
    /// Role to grant.
    pub role: CollaboratorRole,
}

/// Kind of content a collaboration is scoped to.
///
/// Folder and document collaboration endpoints differ only in this path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareTarget {
    /// `/folders/{id}/shares/users`.
    Folder,
    /// `/documents/{id}/shares/users`.
    Document,
}

impl ShareTarget {
    /// Collection path segment.
    pub fn path_segment(&self) -> &'static str {
        match self {
            ShareTarget::Folder => "folders",
            ShareTarget::Document => "documents",
        }
    }
}

/// Error body returned by the OAuth2 token endpoint.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TokenErrorResponse {
    /// Error code.
    #[serde(default)]
    pub error: String,

    /// Human-readable description.
    #[serde(default)]
    pub error_description: String,

    /// Link to documentation.
    #[serde(default)]
    pub error_uri: Option<String>,
}

/// Error body returned by the REST endpoints.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ApiErrorResponse {
    /// Machine-readable code.
    #[serde(default)]
    pub code: Option<String>,

    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
}
