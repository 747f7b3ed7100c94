//! In-memory credential store.
//!
//! Used to exercise the command dispatcher without touching a real store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{Credential, CredentialStore, StoreError, StoreResult};

/// A [`CredentialStore`] backed by a map that lives as long as the value
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
  records: Mutex<HashMap<String, Credential>>,
}

impl MemoryCredentialStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Seed the store with a credential
  pub fn with_credential(self, target: &str, credential: Credential) -> Self {
    self.records().insert(target.to_string(), credential);
    self
  }

  pub fn len(&self) -> usize {
    self.records().len()
  }

  pub fn is_empty(&self) -> bool {
    self.records().is_empty()
  }

  fn records(&self) -> MutexGuard<'_, HashMap<String, Credential>> {
    self.records.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl CredentialStore for MemoryCredentialStore {
  fn read(&self, target: &str) -> StoreResult<Credential> {
    self
      .records()
      .get(target)
      .cloned()
      .ok_or_else(|| StoreError::not_found(target))
  }

  fn write(&self, target: &str, credential: &Credential) -> StoreResult<()> {
    self.records().insert(target.to_string(), credential.clone());
    Ok(())
  }

  fn delete(&self, target: &str) -> StoreResult<()> {
    self
      .records()
      .remove(target)
      .map(|_| ())
      .ok_or_else(|| StoreError::not_found(target))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_write_then_read() {
    let store = MemoryCredentialStore::new();
    store.write("example", &Credential::new("alice", "one")).unwrap();

    assert_eq!(store.read("example").unwrap(), Credential::new("alice", "one"));
    assert_eq!(store.len(), 1);
  }

  #[test]
  fn test_write_overwrites() {
    let store = MemoryCredentialStore::new().with_credential("example", Credential::new("alice", "one"));
    store.write("example", &Credential::new("alice", "two")).unwrap();

    assert_eq!(store.read("example").unwrap().secret, "two");
    assert_eq!(store.len(), 1);
  }

  #[test]
  fn test_missing_target_is_not_found() {
    let store = MemoryCredentialStore::new();

    assert!(store.read("missing").unwrap_err().is_not_found());
    assert!(store.delete("missing").unwrap_err().is_not_found());
    assert!(store.is_empty());
  }
}
