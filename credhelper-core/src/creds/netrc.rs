//! Credentials stored in a `.netrc` file.
//!
//! A target name is a `machine`, the username its `login`, and the secret
//! its `password`. Parsing accepts both the single-line
//! (`machine host login user password pass`) and multi-line layouts; writes
//! always emit the multi-line layout and leave every other entry, comment, and
//! blank line untouched.
//!
//! Writers serialise on a `<netrc>.lock` file next to the store and replace
//! the file atomically, so concurrent `set`/`clear` runs never lose entries.

use std::fs;
use std::io::{self, Write};
use std::ops::Range;
use std::path::{Path, PathBuf};

use fslock::LockFile;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::platform::{FilePermissions, PlatformFilePermissions};
use super::{Credential, CredentialStore, StoreError, StoreResult};

/// Returns the path to the `.netrc` file for the provided home directory.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use credhelper_core::creds::netrc::get_netrc_path;
///
/// let path = get_netrc_path(Path::new("/home/user"));
/// assert_eq!(path, Path::new("/home/user/.netrc"));
/// ```
pub fn get_netrc_path(home: &Path) -> PathBuf {
  home.join(crate::consts::NETRC_FILE_NAME)
}

/// [`CredentialStore`] implementation over a single `.netrc` file
#[derive(Debug, Clone)]
pub struct NetrcCredentialStore {
  netrc_path: PathBuf,
}

impl NetrcCredentialStore {
  pub fn new(netrc_path: impl Into<PathBuf>) -> Self {
    Self {
      netrc_path: netrc_path.into(),
    }
  }

  pub fn path(&self) -> &Path {
    &self.netrc_path
  }

  fn lock_path(&self) -> PathBuf {
    let mut lock_path = self.netrc_path.clone().into_os_string();
    lock_path.push(".lock");
    PathBuf::from(lock_path)
  }

  /// Directory holding the netrc file, created if missing
  fn ensure_parent(&self) -> StoreResult<&Path> {
    let parent = match self.netrc_path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent,
      _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|err| StoreError::io(parent, err))?;
    Ok(parent)
  }

  /// Take the exclusive writer lock; released when the guard is dropped
  fn lock(&self) -> StoreResult<LockFile> {
    self.ensure_parent()?;

    let lock_path = self.lock_path();
    let mut lock = LockFile::open(&lock_path).map_err(|err| StoreError::io(&lock_path, err))?;
    lock.lock().map_err(|err| StoreError::io(&lock_path, err))?;
    Ok(lock)
  }

  /// Read the file, treating a missing file as "no entries"
  fn read_contents(&self) -> StoreResult<Option<String>> {
    match fs::read_to_string(&self.netrc_path) {
      Ok(content) => Ok(Some(content)),
      Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
      Err(err) => Err(StoreError::io(&self.netrc_path, err)),
    }
  }

  /// Replace the file with `content` through an owner-only temp file
  fn write_contents(&self, content: &str) -> StoreResult<()> {
    let parent = self.ensure_parent()?;
    let io_err = |err: io::Error| StoreError::io(&self.netrc_path, err);

    let mut temp = NamedTempFile::new_in(parent).map_err(|err| StoreError::io(parent, err))?;
    PlatformFilePermissions::set_secure_permissions(temp.path()).map_err(io_err)?;
    temp.write_all(content.as_bytes()).map_err(io_err)?;
    temp.as_file().sync_all().map_err(io_err)?;
    temp.persist(&self.netrc_path).map_err(|err| io_err(err.error))?;
    Ok(())
  }

  fn report_if_insecure(&self) {
    match PlatformFilePermissions::has_secure_permissions(&self.netrc_path) {
      Ok(true) => {}
      Ok(false) => info!(
        "{} is readable by other users; restrict it to the owner (chmod 600)",
        self.netrc_path.display()
      ),
      Err(err) => debug!("Could not inspect permissions of {}: {err}", self.netrc_path.display()),
    }
  }
}

impl CredentialStore for NetrcCredentialStore {
  fn read(&self, target: &str) -> StoreResult<Credential> {
    let Some(content) = self.read_contents()? else {
      debug!("No netrc file at {}", self.netrc_path.display());
      return Err(StoreError::not_found(target));
    };

    self.report_if_insecure();
    parse_netrc(&content, target).ok_or_else(|| StoreError::not_found(target))
  }

  fn write(&self, target: &str, credential: &Credential) -> StoreResult<()> {
    validate_token("target", target)?;
    validate_token("username", &credential.username)?;
    validate_token("secret", &credential.secret)?;

    let _lock = self.lock()?;
    let existing = self.read_contents()?.unwrap_or_default();
    let entry = format_entry(target, credential);
    let (mut content, replaced) = rewrite_entries(&existing, target, Some(&entry));

    if !replaced {
      if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
      }
      content.push_str(&entry);
    }

    debug!(replaced, "Writing netrc entry to {}", self.netrc_path.display());
    self.write_contents(&content)
  }

  fn delete(&self, target: &str) -> StoreResult<()> {
    let _lock = self.lock()?;
    let Some(existing) = self.read_contents()? else {
      return Err(StoreError::not_found(target));
    };

    let (content, removed) = rewrite_entries(&existing, target, None);
    if !removed {
      return Err(StoreError::not_found(target));
    }

    debug!("Removing netrc entry from {}", self.netrc_path.display());
    self.write_contents(&content)
  }
}

/// A whitespace-separated word and its byte range in the file
struct Token<'a> {
  text: &'a str,
  span: Range<usize>,
}

/// Split `content` into tokens, skipping lines that start with `#`
fn tokenize(content: &str) -> Vec<Token<'_>> {
  let mut tokens = Vec::new();
  let mut line_offset = 0;

  for line in content.split_inclusive('\n') {
    if !line.trim_start().starts_with('#') {
      let mut start = None;
      for (i, c) in line.char_indices().chain([(line.len(), ' ')]) {
        match (c.is_whitespace(), start) {
          (false, None) => start = Some(i),
          (true, Some(begin)) => {
            tokens.push(Token {
              text: &line[begin..i],
              span: line_offset + begin..line_offset + i,
            });
            start = None;
          }
          _ => {}
        }
      }
    }
    line_offset += line.len();
  }

  tokens
}

/// One `machine` or `default` entry
struct Entry<'a> {
  /// `None` for `default` or a `machine` keyword missing its name
  machine: Option<&'a str>,
  login: Option<&'a str>,
  password: Option<&'a str>,
  /// From the leading keyword to the end of the entry's last token
  span: Range<usize>,
}

/// Group the tokens of `content` into entries, in file order
fn entries(content: &str) -> Vec<Entry<'_>> {
  let mut entries: Vec<Entry<'_>> = Vec::new();
  let mut tokens = tokenize(content).into_iter();

  while let Some(token) = tokens.next() {
    match token.text {
      "machine" | "default" => {
        let mut span = token.span.clone();
        let machine = if token.text == "machine" {
          tokens.next().map(|name| {
            span.end = name.span.end;
            name.text
          })
        } else {
          None
        };
        entries.push(Entry {
          machine,
          login: None,
          password: None,
          span,
        });
      }
      // The value is consumed so it is never mistaken for a keyword
      keyword @ ("login" | "password" | "account") => {
        let value = tokens.next();
        if let Some(entry) = entries.last_mut() {
          entry.span.end = value.as_ref().map_or(token.span.end, |v| v.span.end);
          match keyword {
            "login" => entry.login = value.map(|v| v.text),
            "password" => entry.password = value.map(|v| v.text),
            _ => {}
          }
        }
      }
      _ => {
        if let Some(entry) = entries.last_mut() {
          entry.span.end = token.span.end;
        }
      }
    }
  }

  entries
}

/// Parses `.netrc` content and returns the credentials for `target_machine`.
///
/// Returns `None` when the machine is absent or its entry lacks a `login` or
/// `password`. Comment lines starting with `#` are ignored, and the first
/// entry for a machine wins.
pub fn parse_netrc(content: &str, target_machine: &str) -> Option<Credential> {
  let entry = entries(content)
    .into_iter()
    .find(|entry| entry.machine == Some(target_machine))?;

  Some(Credential::new(entry.login?, entry.password?))
}

/// Render a multi-line entry for `machine`
fn format_entry(machine: &str, credential: &Credential) -> String {
  format!(
    "machine {machine}\n  login {}\n  password {}\n",
    credential.username, credential.secret
  )
}

/// Drop every entry belonging to `machine`, emitting `replacement` where the
/// first one stood.
///
/// Only the tokens of matching entries are cut, so entries sharing a line
/// with them and comments around them survive. Lines left empty by a cut are
/// removed. Returns the new content and whether any entry matched.
fn rewrite_entries(content: &str, machine: &str, replacement: Option<&str>) -> (String, bool) {
  let mut output = String::with_capacity(content.len());
  let mut cursor = 0;
  let mut found = false;

  for entry in entries(content).into_iter().filter(|entry| entry.machine == Some(machine)) {
    let replace = if found { None } else { replacement };
    found = true;

    let trailing = &content[entry.span.end..];
    let mut end = content.len() - trailing.trim_start_matches([' ', '\t', '\r']).len();
    let at_line_end = end == content.len() || content[end..].starts_with('\n');

    let mut start = entry.span.start;
    if at_line_end {
      start = cursor.max(content[..start].trim_end_matches([' ', '\t']).len());
    }

    output.push_str(&content[cursor..start]);
    let own_line = output.is_empty() || output.ends_with('\n');

    if let Some(text) = replace {
      if !own_line {
        output.push('\n');
      }
      output.push_str(text);
    }

    if at_line_end && end < content.len() && (own_line || replace.is_some()) {
      end += 1;
    }
    cursor = end;
  }

  output.push_str(&content[cursor..]);
  (output, found)
}

/// Reject values the whitespace-delimited netrc grammar cannot carry
fn validate_token(field: &'static str, value: &str) -> StoreResult<()> {
  if value.is_empty() {
    return Err(StoreError::InvalidValue {
      field,
      reason: "must not be empty in a netrc file",
    });
  }

  if value.chars().any(char::is_whitespace) {
    return Err(StoreError::InvalidValue {
      field,
      reason: "must not contain whitespace in a netrc file",
    });
  }

  Ok(())
}
