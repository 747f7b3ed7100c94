//! # credhelper core
//!
//! Credential store abstraction shared by the `credhelper` binary: the
//! credential record, the [`creds::CredentialStore`] capability with its
//! platform backends, store configuration, and the native exit codes the
//! command line surfaces.

pub mod config;
pub mod consts;
pub mod creds;

pub use config::{Backend, StoreConfig};
pub use creds::{Credential, CredentialStore, MemoryCredentialStore, StoreError, StoreResult};
