//! Windows-specific credential handling implementation
//!
//! Generic credentials in the Windows Credential Manager, keyed by target
//! name. Secrets are stored as NUL-terminated UTF-16 blobs with enterprise
//! persistence, so they survive reboots and roam with the user profile.

use std::ffi::c_void;
use std::fs;
use std::io;
use std::path::Path;
use std::ptr;

use tracing::debug;
use windows_sys::Win32::Foundation::{ERROR_NOT_FOUND, FILETIME, GetLastError};
use windows_sys::Win32::Security::Credentials::{
  CRED_PERSIST_ENTERPRISE, CRED_TYPE_GENERIC, CREDENTIALW, CredDeleteW, CredFree, CredReadW, CredWriteW,
};

use super::FilePermissions;
use crate::creds::{Credential, CredentialStore, StoreError, StoreResult};

mod helpers;

use helpers::{pwstr_to_string, to_wide, wide_blob_to_string};

/// Windows implementation of file permissions
///
/// A `.netrc` file under the user profile already inherits a per-user ACL,
/// so nothing is tightened here.
pub struct WindowsFilePermissions;

impl FilePermissions for WindowsFilePermissions {
  fn set_secure_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
  }

  fn has_secure_permissions(path: &Path) -> io::Result<bool> {
    fs::metadata(path).map(|_| true)
  }
}

/// [`CredentialStore`] implementation over the Windows Credential Manager
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsCredentialStore;

impl WindowsCredentialStore {
  pub fn new() -> Self {
    Self
  }
}

/// Owns a buffer returned by `CredReadW` and releases it with `CredFree`
struct CredentialBuffer(*mut CREDENTIALW);

impl CredentialBuffer {
  fn credential(&self) -> &CREDENTIALW {
    // SAFETY: the buffer is only constructed from a successful CredReadW call,
    // which leaves a valid CREDENTIALW behind the pointer until CredFree.
    unsafe { &*self.0 }
  }
}

impl Drop for CredentialBuffer {
  fn drop(&mut self) {
    // SAFETY: the pointer was allocated by CredReadW and is freed exactly once.
    unsafe { CredFree(self.0 as *const c_void) };
  }
}

/// Capture the calling thread's last error for `target`
fn last_error(target: &str) -> StoreError {
  // SAFETY: GetLastError has no preconditions.
  let code = unsafe { GetLastError() };
  if code == ERROR_NOT_FOUND {
    StoreError::not_found(target)
  } else {
    StoreError::System { code }
  }
}

impl CredentialStore for WindowsCredentialStore {
  fn read(&self, target: &str) -> StoreResult<Credential> {
    let target_name = to_wide(target);
    let mut raw: *mut CREDENTIALW = ptr::null_mut();

    // SAFETY: target_name is NUL-terminated and outlives the call; raw is a
    // valid out-pointer.
    let ok = unsafe { CredReadW(target_name.as_ptr(), CRED_TYPE_GENERIC, 0, &mut raw) };
    if ok == 0 || raw.is_null() {
      return Err(last_error(target));
    }

    let buffer = CredentialBuffer(raw);
    let credential = buffer.credential();

    // SAFETY: UserName is null or a NUL-terminated string owned by the buffer.
    let username = unsafe { pwstr_to_string(credential.UserName) };
    // SAFETY: CredentialBlob points at CredentialBlobSize bytes owned by the
    // buffer.
    let secret = unsafe { wide_blob_to_string(credential.CredentialBlob, credential.CredentialBlobSize) };

    debug!("Read credential for target '{target}' from Windows Credential Manager");
    Ok(Credential::new(username, secret))
  }

  fn write(&self, target: &str, credential: &Credential) -> StoreResult<()> {
    let mut target_name = to_wide(target);
    let mut username = to_wide(&credential.username);
    let mut blob: Vec<u8> = to_wide(&credential.secret)
      .into_iter()
      .flat_map(u16::to_le_bytes)
      .collect();

    let record = CREDENTIALW {
      Flags: 0,
      Type: CRED_TYPE_GENERIC,
      TargetName: target_name.as_mut_ptr(),
      Comment: ptr::null_mut(),
      LastWritten: FILETIME {
        dwLowDateTime: 0,
        dwHighDateTime: 0,
      },
      CredentialBlobSize: blob.len() as u32,
      CredentialBlob: blob.as_mut_ptr(),
      Persist: CRED_PERSIST_ENTERPRISE,
      AttributeCount: 0,
      Attributes: ptr::null_mut(),
      TargetAlias: ptr::null_mut(),
      UserName: username.as_mut_ptr(),
    };

    // SAFETY: every pointer in record refers to a buffer that lives until the
    // end of this function.
    let ok = unsafe { CredWriteW(&record, 0) };
    if ok == 0 {
      return Err(last_error(target));
    }

    debug!("Wrote credential for target '{target}' to Windows Credential Manager");
    Ok(())
  }

  fn delete(&self, target: &str) -> StoreResult<()> {
    let target_name = to_wide(target);

    // SAFETY: target_name is NUL-terminated and outlives the call.
    let ok = unsafe { CredDeleteW(target_name.as_ptr(), CRED_TYPE_GENERIC, 0) };
    if ok == 0 {
      return Err(last_error(target));
    }

    debug!("Deleted credential for target '{target}' from Windows Credential Manager");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use windows_sys::Win32::Security::Credentials::CRED_MAX_CREDENTIAL_BLOB_SIZE;

  use super::*;

  #[test]
  fn test_oversized_secret_reports_credential_manager_code() {
    let store = WindowsCredentialStore::new();
    let secret = "x".repeat(CRED_MAX_CREDENTIAL_BLOB_SIZE as usize);

    let err = store
      .write("credhelper-test-oversized", &Credential::new("user", secret))
      .unwrap_err();
    assert!(matches!(err, StoreError::System { code } if code != 0), "unexpected error: {err:?}");
  }
}
