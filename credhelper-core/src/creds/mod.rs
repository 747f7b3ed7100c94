//! # Credential Management
//!
//! The credential record and the store capability the command line drives.
//!
//! Each backend persists `target -> (username, secret)` records: the Windows
//! Credential Manager on Windows, a `.netrc` file elsewhere, and an in-memory
//! map for tests. The command line only ever sees [`CredentialStore`].

use std::fmt;

mod error;
pub mod memory;
pub mod netrc;

// Platform-specific implementations
pub mod platform;

pub use error::{StoreError, StoreResult, io_error_code};
pub use memory::MemoryCredentialStore;
pub use netrc::NetrcCredentialStore;
pub use platform::get_credential_store;

/// A username and secret stored under a target name
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
  pub username: String,
  pub secret: String,
}

impl Credential {
  pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
    Self {
      username: username.into(),
      secret: secret.into(),
    }
  }
}

impl fmt::Debug for Credential {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Credential")
      .field("username", &self.username)
      .field("secret", &"<redacted>")
      .finish()
  }
}

/// Read, write, and delete access to a credential store keyed by target name
///
/// Every method performs exactly one request against the underlying store.
/// Implementations report a missing record as [`StoreError::NotFound`] so
/// callers can tell it apart from real failures.
pub trait CredentialStore {
  /// Fetch the credential stored under `target`
  fn read(&self, target: &str) -> StoreResult<Credential>;

  /// Create or overwrite the credential stored under `target`
  fn write(&self, target: &str, credential: &Credential) -> StoreResult<()>;

  /// Remove the credential stored under `target`
  fn delete(&self, target: &str) -> StoreResult<()>;
}

impl<S: CredentialStore + ?Sized> CredentialStore for Box<S> {
  fn read(&self, target: &str) -> StoreResult<Credential> {
    (**self).read(target)
  }

  fn write(&self, target: &str, credential: &Credential) -> StoreResult<()> {
    (**self).write(target, credential)
  }

  fn delete(&self, target: &str) -> StoreResult<()> {
    (**self).delete(target)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_debug_redacts_secret() {
    let credential = Credential::new("alice", "hunter2");
    let rendered = format!("{credential:?}");

    assert!(rendered.contains("alice"));
    assert!(rendered.contains("<redacted>"));
    assert!(!rendered.contains("hunter2"));
  }

  #[test]
  fn test_boxed_store_forwards_calls() {
    let store: Box<dyn CredentialStore> = Box::new(MemoryCredentialStore::new());

    store.write("example", &Credential::new("alice", "s3cret")).unwrap();
    assert_eq!(store.read("example").unwrap(), Credential::new("alice", "s3cret"));

    store.delete("example").unwrap();
    assert!(store.read("example").unwrap_err().is_not_found());
  }
}
