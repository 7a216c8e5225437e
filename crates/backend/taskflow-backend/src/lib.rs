//! Client for the hosted backend that stores TaskFlow's users and tasks.
//!
//! The backend exposes two HTTP services under one project URL:
//!
//! - an auth API (`/auth/v1`) driving the OAuth redirect flow with PKCE, issuing and
//!   refreshing sessions, and ending them on sign-out;
//! - a row API (`/rest/v1`) serving select/insert/update/delete over the tasks table,
//!   scoped to the caller by the bearer token.
//!
//! The stores depend on the [`AuthApi`] and [`TaskTable`] traits; [`Backend`] wires the
//! HTTP implementations of both together, and [`InMemoryAuthApi`] / [`InMemoryTaskTable`]
//! stand in for the hosted services when running offline.
//!
//! ```rust,no_run
//! use taskflow_backend::{AuthApi, Backend, BackendConfig, OAuthProvider};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BackendConfig::from_env()?;
//! let callback = config.callback_url();
//! let backend = Backend::new(config)?;
//!
//! let redirect = backend
//!     .auth()
//!     .sign_in_with_oauth(OAuthProvider::Github, &callback)
//!     .await?;
//! println!("continue at {}", redirect.url);
//! # Ok(())
//! # }
//! ```

mod api;
mod auth;
mod client;
mod config;
mod error;
mod events;
mod http;
mod memory;
mod pkce;
mod rest;
mod storage;
mod types;

pub use api::{AccessTokenProvider, AuthApi, TaskTable};
pub use auth::HttpAuthClient;
pub use client::Backend;
pub use config::{
    BackendConfig, DEFAULT_SITE_ORIGIN, DEFAULT_STORAGE_KEY, DEFAULT_TASKS_TABLE, ENV_ANON_KEY,
    ENV_BACKEND_URL, ENV_SITE_URL,
};
pub use error::{BackendError, BackendResult, ConfigError};
pub use events::{AuthEventBus, AuthStateHandler, AuthSubscription};
pub use memory::{InMemoryAuthApi, InMemoryTaskTable};
pub use pkce::{CHALLENGE_METHOD, PkceChallenge};
pub use rest::RestTaskTable;
pub use storage::{InMemorySessionStorage, SessionStorage};
pub use types::{
    AuthEvent, AuthEventKind, OAuthProvider, OAuthRedirect, Session, SessionUser, UserMetadata,
};
