//! Entry point bundling the auth and row clients over one HTTP connection pool.

use crate::auth::HttpAuthClient;
use crate::config::BackendConfig;
use crate::error::BackendResult;
use crate::http::build_http_client;
use crate::rest::RestTaskTable;
use crate::storage::{InMemorySessionStorage, SessionStorage};
use std::sync::Arc;
use tracing::debug;

/// Handle to the hosted backend.
#[derive(Clone)]
pub struct Backend {
    config: Arc<BackendConfig>,
    auth: Arc<HttpAuthClient>,
    tasks: Arc<RestTaskTable>,
}

impl Backend {
    /// Backend with a session that lives only as long as the process.
    pub fn new(config: BackendConfig) -> BackendResult<Self> {
        Self::with_storage(config, Arc::new(InMemorySessionStorage::new()))
    }

    pub fn with_storage(
        config: BackendConfig,
        storage: Arc<dyn SessionStorage>,
    ) -> BackendResult<Self> {
        config.validate()?;

        let config = Arc::new(config);
        let http = build_http_client(&config)?;
        let auth = Arc::new(HttpAuthClient::new(http.clone(), config.clone(), storage));
        let tasks = Arc::new(RestTaskTable::new(http, config.clone(), auth.clone()));

        debug!("Created backend client for {}", config.url);
        Ok(Self {
            config,
            auth,
            tasks,
        })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    pub fn auth(&self) -> Arc<HttpAuthClient> {
        self.auth.clone()
    }

    pub fn tasks(&self) -> Arc<RestTaskTable> {
        self.tasks.clone()
    }
}
