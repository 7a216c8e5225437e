//! Client-side state for TaskFlow.
//!
//! [`AuthStore`] tracks who is signed in; [`TaskStore`] holds that user's tasks and
//! the filters applied to them. Both keep their state in `futures-signals` cells so
//! a rendering layer can follow changes, and both talk to the backend only through
//! the [`taskflow_backend::AuthApi`] and [`taskflow_backend::TaskTable`] traits.

mod auth;
mod error;
mod tasks;

pub use auth::AuthStore;
pub use error::{StoreError, StoreResult};
pub use tasks::TaskStore;
