//! # Command Line Interface
//!
//! Defines the CLI structure and the dispatcher that turns one parsed
//! command into one credential store call and a native exit code.

mod clear;
mod get;
mod set;

use std::io::{self, Write};

use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::error::ErrorKind;
use clap::{ArgAction, Parser, Subcommand};
use credhelper_core::consts::EXIT_INVALID_COMMAND_LINE;
use credhelper_core::creds::io_error_code;
use credhelper_core::{CredentialStore, StoreError};
pub use clear::ClearArgs;
pub use get::GetArgs;
pub use set::SetArgs;
use thiserror::Error;
use tracing::{debug, info};

/// Top-level CLI command for credhelper
#[derive(Parser)]
#[command(name = "credhelper")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(about = "Get, set, and clear credentials in the platform credential store")]
#[command(
  long_about = "Reads, writes, and deletes username/secret pairs in the platform credential store.\n\n\
        On Windows the Credential Manager is used; elsewhere credentials live in a .netrc file.\n\
        Failures are reported only through the exit code, which is the store's native error code."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightGreen.on_default().bold().underline())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::BrightGreen.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::BrightRed.on_default().bold())
)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    long_help = "Sets the level of verbosity for tracing and logging output on stderr.\n\n\
             -v: Show info level messages, including why a command failed\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,

  /// Subcommands
  #[command(subcommand)]
  pub command: Commands,
}

/// Subcommands for credhelper
#[derive(Subcommand)]
pub enum Commands {
  /// Print the username and secret stored under a target
  #[command(long_about = "Prints the username and then the secret stored under TARGET, one per line.\n\n\
            Exits with the store's error code if nothing is stored under TARGET.")]
  Get(GetArgs),

  /// Store or overwrite a credential under a target
  #[command(long_about = "Stores USERNAME and SECRET under TARGET, replacing any existing credential.\n\n\
            Credentials persist across reboots and roam with the user profile where the\n\
            store supports it.")]
  Set(SetArgs),

  /// Delete the credential stored under a target
  #[command(long_about = "Deletes the credential stored under TARGET.\n\n\
            Deleting a target that holds no credential succeeds, so the command is safe to repeat.")]
  Clear(ClearArgs),
}

impl Commands {
  fn verb(&self) -> &'static str {
    match self {
      Self::Get(_) => "get",
      Self::Set(_) => "set",
      Self::Clear(_) => "clear",
    }
  }
}

/// Failure of a single command
#[derive(Debug, Error)]
pub enum CommandError {
  #[error(transparent)]
  Store(#[from] StoreError),

  #[error("failed to write to standard output")]
  Output(#[source] io::Error),
}

impl CommandError {
  /// Native code returned as the process exit status
  pub fn code(&self) -> u32 {
    match self {
      Self::Store(err) => err.code(),
      Self::Output(err) => io_error_code(err),
    }
  }
}

/// Exit code for a command line clap rejected
///
/// Help and version requests are successful invocations; every other parse
/// failure is reported with the fixed invalid-command-line code.
pub fn parse_error_code(kind: ErrorKind) -> u32 {
  match kind {
    ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
    _ => EXIT_INVALID_COMMAND_LINE,
  }
}

/// Convert a native code into a process exit status
///
/// Win32 error codes are DWORDs; the bit pattern is preserved.
pub fn exit_status(code: u32) -> i32 {
  code as i32
}

/// Run one parsed command against `store`, writing any output to `out`
///
/// Returns `0` on success, otherwise the native error code of the failure.
pub fn handle_cli(command: Commands, store: &dyn CredentialStore, out: &mut dyn Write) -> u32 {
  let verb = command.verb();
  let result = match command {
    Commands::Get(args) => get::handle_get_command(args, store, out),
    Commands::Set(args) => set::handle_set_command(args, store),
    Commands::Clear(args) => clear::handle_clear_command(args, store),
  };

  match result {
    Ok(()) => {
      debug!("{verb} completed");
      0
    }
    Err(err) => {
      let code = err.code();
      info!(code, "{verb} failed: {err}");
      code
    }
  }
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory;
  use credhelper_core::consts::CODE_NOT_FOUND;
  use credhelper_core::{Credential, MemoryCredentialStore, StoreResult};
  use test_case::test_case;

  use super::*;

  /// Store whose every call fails with a fixed native code
  struct FailingStore(u32);

  impl CredentialStore for FailingStore {
    fn read(&self, _target: &str) -> StoreResult<Credential> {
      Err(StoreError::System { code: self.0 })
    }

    fn write(&self, _target: &str, _credential: &Credential) -> StoreResult<()> {
      Err(StoreError::System { code: self.0 })
    }

    fn delete(&self, _target: &str) -> StoreResult<()> {
      Err(StoreError::System { code: self.0 })
    }
  }

  /// Writer that rejects every write
  struct ClosedPipe;

  impl Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
      Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> io::Result<()> {
      Ok(())
    }
  }

  fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(std::iter::once("credhelper").chain(args.iter().copied()))
  }

  fn run(store: &dyn CredentialStore, args: &[&str]) -> (u32, String) {
    let cli = parse(args).unwrap();
    let mut out = Vec::new();
    let code = handle_cli(cli.command, store, &mut out);
    (code, String::from_utf8(out).unwrap())
  }

  #[test]
  fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
  }

  #[test_case(&[] ; "no arguments")]
  #[test_case(&["-v"] ; "flag without verb")]
  #[test_case(&["bogus", "target"] ; "unknown verb")]
  #[test_case(&["help"] ; "help is not a verb")]
  #[test_case(&["get"] ; "get without target")]
  #[test_case(&["get", "a", "b"] ; "get with extra argument")]
  #[test_case(&["set", "target", "user"] ; "set without secret")]
  #[test_case(&["set", "target", "user", "secret", "extra"] ; "set with extra argument")]
  #[test_case(&["clear"] ; "clear without target")]
  fn test_invalid_command_lines(args: &[&str]) {
    let err = parse(args).err().unwrap();
    assert_eq!(parse_error_code(err.kind()), EXIT_INVALID_COMMAND_LINE);
  }

  #[test_case(&["--help"] ; "help flag")]
  #[test_case(&["--version"] ; "version flag")]
  #[test_case(&["get", "--help"] ; "subcommand help")]
  fn test_help_and_version_exit_cleanly(args: &[&str]) {
    let err = parse(args).err().unwrap();
    assert_eq!(parse_error_code(err.kind()), 0);
  }

  #[test]
  fn test_values_may_start_with_hyphen() {
    let cli = parse(&["-vv", "set", "-target", "-user", "-s3cret"]).unwrap();
    assert_eq!(cli.verbose, 2);

    match cli.command {
      Commands::Set(args) => {
        assert_eq!(args.target, "-target");
        assert_eq!(args.username, "-user");
        assert_eq!(args.secret, "-s3cret");
      }
      _ => panic!("expected set"),
    }
  }

  #[test]
  fn test_set_then_get_prints_username_and_secret() {
    let store = MemoryCredentialStore::new();

    assert_eq!(run(&store, &["set", "example", "alice", "s3cret"]), (0, String::new()));
    assert_eq!(run(&store, &["get", "example"]), (0, "alice\ns3cret\n".to_string()));
  }

  #[test]
  fn test_set_overwrites_previous_secret() {
    let store = MemoryCredentialStore::new();

    run(&store, &["set", "example", "alice", "first"]);
    run(&store, &["set", "example", "alice", "second"]);

    assert_eq!(run(&store, &["get", "example"]), (0, "alice\nsecond\n".to_string()));
  }

  #[test]
  fn test_clear_missing_target_succeeds() {
    let store = MemoryCredentialStore::new();

    assert_eq!(run(&store, &["clear", "nothing-here"]), (0, String::new()));
  }

  #[test]
  fn test_clear_then_get_fails() {
    let store = MemoryCredentialStore::new().with_credential("example", Credential::new("alice", "s3cret"));

    assert_eq!(run(&store, &["clear", "example"]).0, 0);
    assert!(store.is_empty());
    assert_eq!(run(&store, &["get", "example"]), (CODE_NOT_FOUND, String::new()));
  }

  #[test_case(&["get", "example"] ; "get")]
  #[test_case(&["set", "example", "alice", "s3cret"] ; "set")]
  #[test_case(&["clear", "example"] ; "clear")]
  fn test_store_error_code_passes_through(args: &[&str]) {
    let (code, output) = run(&FailingStore(1312), args);

    assert_eq!(code, 1312);
    assert!(output.is_empty());
  }

  #[test]
  fn test_get_reports_output_failure() {
    let store = MemoryCredentialStore::new().with_credential("example", Credential::new("alice", "s3cret"));
    let cli = parse(&["get", "example"]).unwrap();

    let code = handle_cli(cli.command, &store, &mut ClosedPipe);
    assert_ne!(code, 0);
  }
}
