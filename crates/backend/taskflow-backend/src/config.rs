//! Backend endpoint configuration.

use crate::error::{BackendError, BackendResult, ConfigError};
use bon::Builder;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const ENV_BACKEND_URL: &str = "TASKFLOW_BACKEND_URL";
pub const ENV_ANON_KEY: &str = "TASKFLOW_ANON_KEY";
pub const ENV_SITE_URL: &str = "TASKFLOW_SITE_URL";

pub const DEFAULT_SITE_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_STORAGE_KEY: &str = "taskflow-auth-token";
pub const DEFAULT_TASKS_TABLE: &str = "tasks";

/// Where the hosted backend lives and how the client talks to it.
///
/// Read once at startup and shared immutably afterwards.
#[derive(Debug, Clone, Builder)]
pub struct BackendConfig {
    /// Project URL, e.g. `https://xyz.example.co`
    #[builder(into)]
    pub url: String,

    /// Public (anonymous) API key sent with every request
    #[builder(into)]
    pub anon_key: String,

    /// Origin the app is served from; OAuth callbacks land on `<origin>/auth/callback`
    #[builder(default = DEFAULT_SITE_ORIGIN.to_string())]
    pub site_origin: String,

    /// Session storage key for the persisted session
    #[builder(default = DEFAULT_STORAGE_KEY.to_string())]
    pub storage_key: String,

    #[builder(default = DEFAULT_TASKS_TABLE.to_string())]
    pub tasks_table: String,

    #[builder(default = Duration::from_secs(30))]
    pub http_timeout: Duration,
}

impl BackendConfig {
    /// Load from the process environment, reading a `.env` file first when one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(err) if err.not_found() => {}
            Err(err) => {
                return Err(ConfigError::Invalid {
                    key: ".env",
                    reason: err.to_string(),
                });
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let url = required(ENV_BACKEND_URL)?;
        let anon_key = required(ENV_ANON_KEY)?;
        let site_origin = lookup(ENV_SITE_URL)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_SITE_ORIGIN.to_string());

        let config = Self::builder()
            .url(url)
            .anon_key(anon_key)
            .site_origin(site_origin)
            .build();

        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<(), ConfigError> {
        Url::parse(&self.url).map_err(|e| ConfigError::Invalid {
            key: ENV_BACKEND_URL,
            reason: e.to_string(),
        })?;
        Url::parse(&self.site_origin).map_err(|e| ConfigError::Invalid {
            key: ENV_SITE_URL,
            reason: e.to_string(),
        })?;
        if self.anon_key.trim().is_empty() {
            return Err(ConfigError::Missing(ENV_ANON_KEY));
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> BackendResult<()> {
        self.check().map_err(|e| BackendError::config(e.to_string()))?;
        if self.tasks_table.trim().is_empty() {
            return Err(BackendError::config("Tasks table name is empty"));
        }
        Ok(())
    }

    fn base(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Endpoint under the auth API, e.g. `token` → `<url>/auth/v1/token`.
    pub fn auth_endpoint(&self, path: &str) -> BackendResult<Url> {
        Ok(Url::parse(&format!("{}/auth/v1/{}", self.base(), path))?)
    }

    /// Endpoint of the configured tasks table under the row API.
    pub fn table_endpoint(&self) -> BackendResult<Url> {
        Ok(Url::parse(&format!(
            "{}/rest/v1/{}",
            self.base(),
            self.tasks_table
        ))?)
    }

    /// OAuth callback route on the app's own origin.
    pub fn callback_url(&self) -> String {
        format!("{}/auth/callback", self.site_origin.trim_end_matches('/'))
    }

    pub fn code_verifier_key(&self) -> String {
        format!("{}-code-verifier", self.storage_key)
    }
}
