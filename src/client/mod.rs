//! Lucidchart API client implementation.

use crate::auth::TokenManager;
use crate::config::LucidchartConfig;
use crate::errors::{LucidchartError, LucidchartResult};
use crate::services::{FoldersService, SharesService, UsersService};
use crate::transport::{HttpTransport, ReqwestTransport};
use std::sync::Arc;

mod executor;
pub use executor::{ApiRequest, ApiResponse, RequestExecutor, API_VERSION_HEADER};

/// Lucidchart API client.
///
/// Entry point for the upstream API. It owns the token manager and the
/// request executor, and hands out typed services that share them.
pub struct LucidchartClient {
    config: LucidchartConfig,
    tokens: Arc<TokenManager>,
    executor: Arc<RequestExecutor>,
}

impl LucidchartClient {
    /// Creates a client over the default reqwest transport.
    pub fn new(config: LucidchartConfig) -> LucidchartResult<Self> {
        let transport = ReqwestTransport::with_defaults().map_err(|e| {
            LucidchartError::configuration(format!("Failed to create transport: {}", e))
        })?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Creates a client over a custom transport.
    pub fn with_transport(
        config: LucidchartConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> LucidchartResult<Self> {
        config.validate()?;

        let tokens = Arc::new(TokenManager::new(
            transport.clone(),
            config.token_url.clone(),
            config.oauth.clone(),
        ));

        let executor = Arc::new(RequestExecutor::new(
            config.clone(),
            transport,
            tokens.clone(),
        ));

        Ok(Self {
            config,
            tokens,
            executor,
        })
    }

    /// Access the users service.
    pub fn users(&self) -> UsersService {
        UsersService::new(self.executor.clone())
    }

    /// Access the folders service.
    pub fn folders(&self) -> FoldersService {
        FoldersService::new(self.executor.clone())
    }

    /// Access the collaborator (shares) service.
    pub fn shares(&self) -> SharesService {
        SharesService::new(self.executor.clone())
    }

    /// Gets the token manager.
    pub fn token_manager(&self) -> &Arc<TokenManager> {
        &self.tokens
    }

    /// Gets the configuration.
    pub fn config(&self) -> &LucidchartConfig {
        &self.config
    }

    /// Gets the request executor (for advanced use cases).
    pub fn executor(&self) -> &Arc<RequestExecutor> {
        &self.executor
    }
}
