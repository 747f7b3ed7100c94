//! Temporary `.netrc` files for testing

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// RAII guard for test .netrc files
///
/// Creates a temporary directory holding a `.netrc` file with the given
/// content. The directory and file are removed when the guard is dropped.
pub struct NetrcGuard {
  _temp_dir: TempDir,
  netrc_path: PathBuf,
}

impl NetrcGuard {
  /// Create a new NetrcGuard with the given content
  pub fn new(content: &str) -> Self {
    let guard = Self::empty();
    fs::write(&guard.netrc_path, content).expect("Failed to write test .netrc");
    guard
  }

  /// Create a guard whose `.netrc` does not exist yet
  pub fn empty() -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let netrc_path = temp_dir.path().join(".netrc");

    Self {
      _temp_dir: temp_dir,
      netrc_path,
    }
  }

  /// Get the path to the .netrc file
  pub fn netrc_path(&self) -> &Path {
    &self.netrc_path
  }

  /// Current content of the .netrc file, empty if it does not exist
  pub fn contents(&self) -> String {
    fs::read_to_string(&self.netrc_path).unwrap_or_default()
  }
}
