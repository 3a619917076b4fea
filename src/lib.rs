//! Lucidchart Integration Module
//!
//! This module synchronizes Lucidchart users, folders, documents and their
//! collaborations into a resource/entitlement/grant model for identity
//! governance, and applies or revokes collaborations upstream.
//!
//! # Features
//!
//! - **Authentication**: OAuth2 authorization code and refresh token flows,
//!   with a static API key for content endpoints
//! - **Pagination**: Cursor-based listings driven by the `Link` header
//! - **Hierarchy**: Folder and document walking from a synthetic root
//! - **Collaborations**: Role entitlements, grants, idempotent grant and revoke
//! - **Users**: Account users as principals
//!
//! # Example
//!
//! ```no_run
//! use integrations_lucidchart::{LucidchartClient, LucidchartConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = LucidchartConfig::builder()
//!     .api_key("api-key")
//!     .client_id("client-id")
//!     .client_secret("client-secret")
//!     .redirect_url("https://example.com/callback")
//!     .refresh_token("refresh-token")
//!     .build()?;
//!
//! let client = LucidchartClient::new(config)?;
//!
//! let users = client.users().list(None).await?;
//! for user in users.items {
//!     println!("{}: {}", user.user_id, user.email);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

// Core modules
pub mod auth;
pub mod client;
pub mod config;
pub mod connector;
pub mod errors;
pub mod pagination;
pub mod services;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use auth::{AuthMode, OAuth2Token, TokenManager};
pub use client::LucidchartClient;
pub use config::{ApiEnvironment, LucidchartConfig, LucidchartConfigBuilder};
pub use connector::{Connector, GrantProvisioner, ResourceSyncer, RevokeOutcome};
pub use errors::{LucidchartError, LucidchartResult};
pub use pagination::Page;
pub use types::{CollaboratorRole, ContentItem, User, UserCollaboration};

/// Prelude module with commonly used types and traits.
///
/// ```no_run
/// use integrations_lucidchart::prelude::*;
/// ```
pub mod prelude {
    // Client
    pub use crate::client::LucidchartClient;

    // Configuration
    pub use crate::config::{ApiEnvironment, LucidchartConfig, LucidchartConfigBuilder};

    // Authentication
    pub use crate::auth::{AuthMode, OAuth2Token, TokenManager};

    // Services
    pub use crate::services::{FoldersService, SharesService, UsersService};

    // Connector
    pub use crate::connector::{
        Connector, DocumentSyncer, Entitlement, FolderSyncer, Grant, GrantProvisioner, Resource,
        ResourceId, ResourceSyncer, RevokeOutcome, UserSyncer,
    };

    // Common types
    pub use crate::types::{
        CollaboratorRole, ContentItem, ContentType, ShareTarget, User, UserCollaboration,
    };

    // Errors
    pub use crate::errors::{LucidchartError, LucidchartResult};

    // Pagination
    pub use crate::pagination::Page;
}
