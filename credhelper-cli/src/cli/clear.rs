//! # Clear Command
//!
//! Deletes the credential stored under a target. Clearing a target that
//! holds nothing is not an error.

use clap::Args;
use credhelper_core::CredentialStore;
use tracing::debug;

use super::CommandError;

/// Arguments for `credhelper clear`
#[derive(Args)]
pub struct ClearArgs {
  /// Target name whose credential should be deleted
  #[arg(value_name = "TARGET", allow_hyphen_values = true)]
  pub target: String,
}

pub fn handle_clear_command(args: ClearArgs, store: &dyn CredentialStore) -> Result<(), CommandError> {
  match store.delete(&args.target) {
    Ok(()) => {
      debug!("Deleted credential for target '{}'", args.target);
      Ok(())
    }
    Err(err) if err.is_not_found() => {
      debug!("Nothing stored for target '{}'", args.target);
      Ok(())
    }
    Err(err) => Err(err.into()),
  }
}
