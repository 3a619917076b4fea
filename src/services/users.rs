//! User listing service.

use crate::auth::AuthMode;
use crate::client::RequestExecutor;
use crate::errors::LucidchartResult;
use crate::pagination::Page;
use crate::transport::HttpMethod;
use crate::types::User;
use std::sync::Arc;

/// Service for account users.
#[derive(Clone)]
pub struct UsersService {
    executor: Arc<RequestExecutor>,
}

impl UsersService {
    /// Creates a new users service.
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Lists one page of account users.
    ///
    /// This endpoint is only reachable with an OAuth2 token.
    pub async fn list(&self, page_token: Option<&str>) -> LucidchartResult<Page<User>> {
        let request = self
            .executor
            .request(HttpMethod::Get, "/users", AuthMode::OAuth2)?
            .page_token(page_token);
        self.executor.execute_page(&request).await
    }
}
