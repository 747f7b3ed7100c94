//! Temporary configuration files for testing

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// RAII guard for a `config.toml` written to a temporary directory
pub struct ConfigFileGuard {
  _temp_dir: TempDir,
  config_path: PathBuf,
}

impl ConfigFileGuard {
  /// Write `content` to a fresh `config.toml`
  pub fn new(content: &str) -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, content).expect("Failed to write test config");

    Self {
      _temp_dir: temp_dir,
      config_path,
    }
  }

  /// Path of the config file
  pub fn path(&self) -> &Path {
    &self.config_path
  }
}
