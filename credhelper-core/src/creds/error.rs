use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::consts::{CODE_INVALID_VALUE, CODE_IO_FAILURE, CODE_NOT_FOUND};

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Failure reported by a credential store
///
/// Every variant carries or maps to the store's native error code, which the
/// command line returns unmodified as its exit status.
#[derive(Debug, Error)]
pub enum StoreError {
  /// No credential is stored under the target
  #[error("no credential stored for target '{target}'")]
  NotFound { target: String },

  /// The platform store rejected the call with a native error code
  #[error("credential store call failed with system error {code}")]
  System { code: u32 },

  /// A file-backed store could not read or write its file
  #[error("failed to access credential file {}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// The backend cannot represent the value
  #[error("{field} cannot be stored: {reason}")]
  InvalidValue { field: &'static str, reason: &'static str },
}

impl StoreError {
  pub fn not_found(target: &str) -> Self {
    Self::NotFound {
      target: target.to_string(),
    }
  }

  pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
    Self::Io {
      path: path.into(),
      source,
    }
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::NotFound { .. })
  }

  /// Native error code for this failure
  pub fn code(&self) -> u32 {
    match self {
      Self::NotFound { .. } => CODE_NOT_FOUND,
      Self::System { code } => *code,
      Self::Io { source, .. } => io_error_code(source),
      Self::InvalidValue { .. } => CODE_INVALID_VALUE,
    }
  }
}

/// Native code for an I/O error: its OS error number when it carries one
pub fn io_error_code(err: &io::Error) -> u32 {
  err
    .raw_os_error()
    .and_then(|errno| u32::try_from(errno).ok())
    .filter(|errno| *errno != 0)
    .unwrap_or(CODE_IO_FAILURE)
}
