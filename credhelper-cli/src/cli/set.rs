//! # Set Command
//!
//! Stores a credential under a target, replacing whatever was there.

use clap::Args;
use credhelper_core::{Credential, CredentialStore};
use tracing::debug;

use super::CommandError;

/// Arguments for `credhelper set`
#[derive(Args)]
pub struct SetArgs {
  /// Target name to store the credential under
  #[arg(value_name = "TARGET", allow_hyphen_values = true)]
  pub target: String,

  /// Username to store
  #[arg(value_name = "USERNAME", allow_hyphen_values = true)]
  pub username: String,

  /// Secret to store
  #[arg(value_name = "SECRET", allow_hyphen_values = true)]
  pub secret: String,
}

pub fn handle_set_command(args: SetArgs, store: &dyn CredentialStore) -> Result<(), CommandError> {
  let SetArgs {
    target,
    username,
    secret,
  } = args;

  store.write(&target, &Credential::new(username, secret))?;
  debug!("Stored credential for target '{target}'");
  Ok(())
}
