//! # Get Command
//!
//! Prints the username and secret stored under a target.

use std::io::Write;

use clap::Args;
use credhelper_core::CredentialStore;
use tracing::debug;

use super::CommandError;

/// Arguments for `credhelper get`
#[derive(Args)]
pub struct GetArgs {
  /// Target name the credential is stored under
  #[arg(value_name = "TARGET", allow_hyphen_values = true)]
  pub target: String,
}

/// Handle the get command
///
/// Writes `<username>\n<secret>\n` to `out`. Nothing is written when the
/// store call fails.
pub fn handle_get_command(
  args: GetArgs,
  store: &dyn CredentialStore,
  out: &mut dyn Write,
) -> Result<(), CommandError> {
  let credential = store.read(&args.target)?;
  debug!("Found credential for target '{}'", args.target);

  writeln!(out, "{}\n{}", credential.username, credential.secret).map_err(CommandError::Output)?;
  out.flush().map_err(CommandError::Output)
}
