//! # Configuration Management
//!
//! Selects the credential store backend. Values are layered from lowest to
//! highest precedence: built-in defaults, the `config.toml` file in the
//! project config directory, then `CREDHELPER_*` environment variables.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use directories::{BaseDirs, ProjectDirs};
use serde::Deserialize;
use tracing::debug;

use crate::consts::{CONFIG_FILE_NAME, ENV_BACKEND, ENV_CONFIG, ENV_NETRC};
use crate::creds::netrc::get_netrc_path;

/// Which credential store backs the commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
  /// The platform's own store: Credential Manager on Windows, `.netrc`
  /// elsewhere
  #[default]
  Native,
  /// A `.netrc` file on every platform
  Netrc,
}

impl FromStr for Backend {
  type Err = anyhow::Error;

  fn from_str(value: &str) -> Result<Self> {
    match value.trim().to_ascii_lowercase().as_str() {
      "native" => Ok(Self::Native),
      "netrc" => Ok(Self::Netrc),
      other => bail!("Unknown credential backend '{other}' (expected 'native' or 'netrc')"),
    }
  }
}

impl fmt::Display for Backend {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Native => f.write_str("native"),
      Self::Netrc => f.write_str("netrc"),
    }
  }
}

/// Store selection loaded from file and environment
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
  pub backend: Backend,
  pub netrc_path: Option<PathBuf>,
}

impl StoreConfig {
  /// Load configuration from the standard locations and the process
  /// environment
  ///
  /// # Errors
  ///
  /// Returns an error if an explicitly named config file is missing, if any
  /// config file cannot be parsed, or if an environment override is invalid.
  pub fn load() -> Result<Self> {
    Self::load_with(|key| std::env::var(key).ok())
  }

  /// Same as [`StoreConfig::load`], reading variables through `lookup`
  pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let config = match lookup(ENV_CONFIG) {
      Some(explicit) => Self::from_file(Path::new(&explicit))?,
      None => match default_config_path() {
        Some(path) if path.exists() => Self::from_file(&path)?,
        _ => Self::default(),
      },
    };

    config.with_overrides(lookup)
  }

  /// Parse a TOML config file
  pub fn from_file(path: &Path) -> Result<Self> {
    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read config from {}", path.display()))?;

    let config: Self =
      toml::from_str(&content).with_context(|| format!("Failed to parse config from {}", path.display()))?;

    debug!("Loaded config from {}", path.display());
    Ok(config)
  }

  /// Apply `CREDHELPER_BACKEND` and `CREDHELPER_NETRC` on top of this config
  pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    if let Some(backend) = lookup(ENV_BACKEND) {
      self.backend = backend
        .parse()
        .with_context(|| format!("Invalid value for {ENV_BACKEND}"))?;
    }

    if let Some(netrc_path) = lookup(ENV_NETRC).filter(|value| !value.is_empty()) {
      self.netrc_path = Some(PathBuf::from(netrc_path));
    }

    Ok(self)
  }

  /// Location of the `.netrc` file: the configured path, or `~/.netrc`
  pub fn netrc_path(&self) -> Result<PathBuf> {
    if let Some(path) = &self.netrc_path {
      return Ok(path.clone());
    }

    let base_dirs = BaseDirs::new().context("Failed to determine home directory")?;
    Ok(get_netrc_path(base_dirs.home_dir()))
  }
}

/// Path of `config.toml` in the platform config directory, if one exists
pub fn default_config_path() -> Option<PathBuf> {
  ProjectDirs::from("land", "eddieland", "credhelper").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use credhelper_test_utils::ConfigFileGuard;
  use test_case::test_case;

  use super::*;

  fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |key| vars.get(key).cloned()
  }

  #[test]
  fn test_defaults() {
    let config = StoreConfig::default();
    assert_eq!(config.backend, Backend::Native);
    assert_eq!(config.netrc_path, None);
  }

  #[test]
  fn test_from_file() {
    let guard = ConfigFileGuard::new("backend = \"netrc\"\nnetrc_path = \"/srv/creds/.netrc\"\n");

    let config = StoreConfig::from_file(guard.path()).unwrap();
    assert_eq!(config.backend, Backend::Netrc);
    assert_eq!(config.netrc_path, Some(PathBuf::from("/srv/creds/.netrc")));
  }

  #[test]
  fn test_from_file_rejects_unknown_keys() {
    let guard = ConfigFileGuard::new("backend = \"netrc\"\nretries = 3\n");

    let err = StoreConfig::from_file(guard.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config"));
  }

  #[test]
  fn test_explicit_config_file_must_exist() {
    let guard = ConfigFileGuard::new("");
    let missing = guard.path().with_file_name("absent.toml");

    let result = StoreConfig::load_with(env(&[(ENV_CONFIG, missing.to_str().unwrap())]));
    assert!(result.is_err());
  }

  #[test]
  fn test_environment_overrides_file() {
    let guard = ConfigFileGuard::new("backend = \"native\"\nnetrc_path = \"/from/file\"\n");

    let config = StoreConfig::load_with(env(&[
      (ENV_CONFIG, guard.path().to_str().unwrap()),
      (ENV_BACKEND, "netrc"),
      (ENV_NETRC, "/from/env"),
    ]))
    .unwrap();

    assert_eq!(config.backend, Backend::Netrc);
    assert_eq!(config.netrc_path().unwrap(), PathBuf::from("/from/env"));
  }

  #[test]
  fn test_empty_netrc_override_is_ignored() {
    let config = StoreConfig::default().with_overrides(env(&[(ENV_NETRC, "")])).unwrap();
    assert_eq!(config.netrc_path, None);
  }

  #[test_case("native", Backend::Native ; "lowercase native")]
  #[test_case("NETRC", Backend::Netrc ; "uppercase netrc")]
  #[test_case(" netrc ", Backend::Netrc ; "padded netrc")]
  fn test_backend_from_str(value: &str, expected: Backend) {
    assert_eq!(value.parse::<Backend>().unwrap(), expected);
  }

  #[test]
  fn test_invalid_backend_override() {
    let err = StoreConfig::default()
      .with_overrides(env(&[(ENV_BACKEND, "keychain")]))
      .unwrap_err();

    assert!(format!("{err:#}").contains("Unknown credential backend 'keychain'"));
  }

  #[test]
  fn test_explicit_netrc_path_wins() {
    let config = StoreConfig {
      backend: Backend::Netrc,
      netrc_path: Some(PathBuf::from("/tmp/custom-netrc")),
    };

    assert_eq!(config.netrc_path().unwrap(), PathBuf::from("/tmp/custom-netrc"));
  }
}
