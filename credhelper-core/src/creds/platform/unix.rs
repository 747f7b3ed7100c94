//! Unix-specific credential handling implementation
//!
//! Credentials live in a `.netrc` file on Unix, so the only platform concern
//! is keeping that file private to its owner.

use std::fs;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use super::FilePermissions;

/// Unix implementation of file permissions using chmod-style permissions
pub struct UnixFilePermissions;

impl FilePermissions for UnixFilePermissions {
  fn set_secure_permissions(path: &Path) -> io::Result<()> {
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o600); // Owner read/write only
    fs::set_permissions(path, perms)
  }

  fn has_secure_permissions(path: &Path) -> io::Result<bool> {
    let mode = fs::metadata(path)?.permissions().mode();

    // No group/other bits
    Ok(mode & 0o077 == 0)
  }
}

#[cfg(test)]
mod tests {
  use tempfile::NamedTempFile;

  use super::*;

  #[test]
  fn test_set_then_check_secure_permissions() {
    let file = NamedTempFile::new().unwrap();
    fs::set_permissions(file.path(), fs::Permissions::from_mode(0o644)).unwrap();
    assert!(!UnixFilePermissions::has_secure_permissions(file.path()).unwrap());

    UnixFilePermissions::set_secure_permissions(file.path()).unwrap();
    assert!(UnixFilePermissions::has_secure_permissions(file.path()).unwrap());
  }

  #[test]
  fn test_missing_file_is_an_error() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    assert!(UnixFilePermissions::has_secure_permissions(&temp_dir.path().join("absent")).is_err());
  }
}
