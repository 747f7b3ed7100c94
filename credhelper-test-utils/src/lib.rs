//! Test utilities shared across the credhelper workspace
//!
//! This crate provides RAII guards for the files credhelper reads:
//! - A throwaway `.netrc` file ([`NetrcGuard`])
//! - A throwaway `config.toml` ([`ConfigFileGuard`])
//!
//! Neither guard touches process environment variables, so tests using them
//! can run in parallel. Pass the paths to the code under test explicitly or
//! through a child process environment.

pub mod config;
pub mod netrc;

// Re-export commonly used items
pub use config::ConfigFileGuard;
pub use netrc::NetrcGuard;
