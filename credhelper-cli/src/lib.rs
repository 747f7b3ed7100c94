//! # credhelper CLI Library
//!
//! Argument parsing and command dispatch for the `credhelper` binary. Every
//! invocation performs exactly one call against a
//! [`credhelper_core::CredentialStore`] and maps the outcome to a native exit
//! code.

pub mod cli;
