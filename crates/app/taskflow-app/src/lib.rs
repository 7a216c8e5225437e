//! TaskFlow client application layer.
//!
//! [`App`] wires the auth and task stores to the host's [`Toaster`] and [`Browser`]
//! and runs the startup sequence, including the OAuth callback. The [`components`]
//! are view-models: each owns the interaction logic of one part of the UI and leaves
//! drawing to the host.

mod app;
pub mod components;
mod error;
mod host;

pub use app::App;
pub use error::TaskFormError;
pub use host::{Browser, Toaster};

#[cfg(test)]
pub(crate) mod test_support;
