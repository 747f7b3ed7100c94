use std::ffi::OsStr;
use std::iter::once;
use std::os::windows::ffi::OsStrExt;

use windows_sys::core::PWSTR;

/// Convert a Rust string into a null-terminated UTF-16 vector suitable for
/// Windows API calls.
pub(super) fn to_wide(value: &str) -> Vec<u16> {
  OsStr::new(value).encode_wide().chain(once(0)).collect()
}

/// Convert a PWSTR pointing to a null-terminated UTF-16 string into a Rust
/// `String`.
///
/// # Safety
///
/// `value` must be null or point to a valid null-terminated UTF-16 string.
pub(super) unsafe fn pwstr_to_string(value: PWSTR) -> String {
  if value.is_null() {
    return String::new();
  }

  let mut len = 0usize;
  // SAFETY: the caller guarantees a terminator exists, so every read up to it
  // stays in bounds.
  while unsafe { *value.add(len) } != 0 {
    len += 1;
  }

  // SAFETY: `len` code units before the terminator were just read.
  let slice = unsafe { std::slice::from_raw_parts(value.cast_const(), len) };
  String::from_utf16_lossy(slice)
}

/// Decode a credential blob holding little-endian UTF-16 text.
///
/// Stops at the first NUL code unit or the end of the blob, so blobs written
/// without a terminator are still read safely.
///
/// # Safety
///
/// `blob` must be null or point to at least `size` readable bytes.
pub(super) unsafe fn wide_blob_to_string(blob: *const u8, size: u32) -> String {
  if blob.is_null() || size == 0 {
    return String::new();
  }

  // SAFETY: the caller guarantees `size` readable bytes behind `blob`.
  let bytes = unsafe { std::slice::from_raw_parts(blob, size as usize) };
  let units: Vec<u16> = bytes
    .chunks_exact(2)
    .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
    .take_while(|unit| *unit != 0)
    .collect();

  String::from_utf16_lossy(&units)
}
