//! # credhelper CLI Entry Point
//!
//! Parses one `get`/`set`/`clear` invocation, opens the configured credential
//! store, performs the call, and exits with the resulting native code.

use std::io;
use std::process;

use clap::Parser;
use credhelper_cli::cli::{self, Cli};
use credhelper_core::StoreConfig;
use credhelper_core::consts::EXIT_BAD_CONFIGURATION;
use credhelper_core::creds::get_credential_store;
use tracing::{debug, error};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
  let cmd = match Cli::try_parse() {
    Ok(cmd) => cmd,
    Err(err) => {
      let code = cli::parse_error_code(err.kind());
      // Only requested help/version text is shown; usage errors stay silent
      if code == 0 {
        let _ = err.print();
      }
      process::exit(cli::exit_status(code));
    }
  };

  // Set up tracing based on verbosity level
  let level = match cmd.verbose {
    0 => tracing::Level::WARN,  // Default: warnings and errors
    1 => tracing::Level::INFO,  // -v: info, warnings, and errors
    2 => tracing::Level::DEBUG, // -vv: debug, info, warnings, and errors
    _ => tracing::Level::TRACE, // -vvv or more: trace and everything else
  };

  // stdout carries `get` output, so logs go to stderr
  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(io::stderr))
    .with(EnvFilter::from_default_env().add_directive(level.into()))
    .init();

  debug!("Tracing initialized with level: {}", level);

  let store = match StoreConfig::load().and_then(|config| get_credential_store(&config)) {
    Ok(store) => store,
    Err(err) => {
      error!("Failed to open credential store: {err:#}");
      process::exit(cli::exit_status(EXIT_BAD_CONFIGURATION));
    }
  };

  let code = cli::handle_cli(cmd.command, store.as_ref(), &mut io::stdout().lock());
  process::exit(cli::exit_status(code));
}
