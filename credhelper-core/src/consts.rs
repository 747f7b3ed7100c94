//! Constants shared across credhelper components.
//!
//! Exit and error codes follow the host's native conventions: Win32 error
//! codes on Windows, `errno`/`sysexits` values elsewhere.

/// Environment variable pointing at an explicit configuration file
pub const ENV_CONFIG: &str = "CREDHELPER_CONFIG";

/// Environment variable selecting the store backend (`native` or `netrc`)
pub const ENV_BACKEND: &str = "CREDHELPER_BACKEND";

/// Environment variable overriding the `.netrc` location
pub const ENV_NETRC: &str = "CREDHELPER_NETRC";

/// File name of the configuration file inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// File name of the netrc file inside the home directory
pub const NETRC_FILE_NAME: &str = ".netrc";

#[cfg(windows)]
mod codes {
  use windows_sys::Win32::Foundation::{
    ERROR_BAD_CONFIGURATION, ERROR_GEN_FAILURE, ERROR_INVALID_COMMAND_LINE, ERROR_INVALID_PARAMETER, ERROR_NOT_FOUND,
  };

  pub const EXIT_INVALID_COMMAND_LINE: u32 = ERROR_INVALID_COMMAND_LINE;
  pub const EXIT_BAD_CONFIGURATION: u32 = ERROR_BAD_CONFIGURATION;
  pub const CODE_NOT_FOUND: u32 = ERROR_NOT_FOUND;
  pub const CODE_IO_FAILURE: u32 = ERROR_GEN_FAILURE;
  pub const CODE_INVALID_VALUE: u32 = ERROR_INVALID_PARAMETER;
}

#[cfg(not(windows))]
mod codes {
  /// `EX_USAGE` from sysexits.h
  pub const EXIT_INVALID_COMMAND_LINE: u32 = 64;
  /// `EX_CONFIG` from sysexits.h
  pub const EXIT_BAD_CONFIGURATION: u32 = 78;
  /// `ENOENT`
  pub const CODE_NOT_FOUND: u32 = 2;
  /// `EIO`
  pub const CODE_IO_FAILURE: u32 = 5;
  /// `EINVAL`
  pub const CODE_INVALID_VALUE: u32 = 22;
}

/// Exit code for a missing, unknown, or malformed command line
pub const EXIT_INVALID_COMMAND_LINE: u32 = codes::EXIT_INVALID_COMMAND_LINE;

/// Exit code when the configuration cannot be loaded
pub const EXIT_BAD_CONFIGURATION: u32 = codes::EXIT_BAD_CONFIGURATION;

/// Error code for a target with no stored credential
pub const CODE_NOT_FOUND: u32 = codes::CODE_NOT_FOUND;

/// Error code for an I/O failure that carried no OS error number
pub const CODE_IO_FAILURE: u32 = codes::CODE_IO_FAILURE;

/// Error code for a value the backend cannot store
pub const CODE_INVALID_VALUE: u32 = codes::CODE_INVALID_VALUE;
