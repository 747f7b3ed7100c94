//! Platform-specific credential handling implementations
//!
//! This module selects the credential store for the current platform and
//! provides the file permission helpers the `.netrc` backend relies on.

use std::io;
use std::path::Path;

use anyhow::Result;
use tracing::debug;

use super::{CredentialStore, NetrcCredentialStore};
use crate::config::{Backend, StoreConfig};

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

#[cfg(unix)]
pub use unix::UnixFilePermissions as PlatformFilePermissions;
#[cfg(windows)]
pub use windows::WindowsFilePermissions as PlatformFilePermissions;
#[cfg(windows)]
pub use windows::WindowsCredentialStore;

/// Trait for platform-specific file permission operations
pub trait FilePermissions {
  /// Set secure permissions on a credential file
  fn set_secure_permissions(path: &Path) -> io::Result<()>;

  /// Check if a file has secure permissions
  fn has_secure_permissions(path: &Path) -> io::Result<bool>;
}

/// Build the credential store selected by `config`
///
/// `Backend::Native` is the Windows Credential Manager on Windows and the
/// `.netrc` file everywhere else.
///
/// # Errors
///
/// Returns an error if a `.netrc` backend is selected and no file location
/// can be determined.
pub fn get_credential_store(config: &StoreConfig) -> Result<Box<dyn CredentialStore>> {
  match config.backend {
    Backend::Netrc => netrc_store(config),
    Backend::Native => native_store(config),
  }
}

fn netrc_store(config: &StoreConfig) -> Result<Box<dyn CredentialStore>> {
  let netrc_path = config.netrc_path()?;
  debug!("Using netrc credential store at {}", netrc_path.display());
  Ok(Box::new(NetrcCredentialStore::new(netrc_path)))
}

#[cfg(windows)]
fn native_store(_config: &StoreConfig) -> Result<Box<dyn CredentialStore>> {
  debug!("Using Windows Credential Manager");
  Ok(Box::new(WindowsCredentialStore::new()))
}

#[cfg(not(windows))]
fn native_store(config: &StoreConfig) -> Result<Box<dyn CredentialStore>> {
  netrc_store(config)
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;
  use crate::creds::Credential;

  #[test]
  fn test_netrc_backend_uses_configured_path() {
    let temp_dir = TempDir::new().unwrap();
    let netrc_path = temp_dir.path().join(".netrc");
    let config = StoreConfig {
      backend: Backend::Netrc,
      netrc_path: Some(netrc_path.clone()),
    };

    let store = get_credential_store(&config).unwrap();
    store.write("example.com", &Credential::new("alice", "s3cret")).unwrap();

    assert!(netrc_path.exists());
    assert_eq!(store.read("example.com").unwrap().username, "alice");
  }
}
