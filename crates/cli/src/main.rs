mod cmd;
mod output;

use std::ffi::OsString;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::{MakeArgs, cmd_make, cmd_version};
use output::print_failure;

/// Build launcher packages for each target platform
#[derive(Parser)]
#[command(name = "package-builder")]
#[command(author, version, about, long_about = None)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Generate a single launcher package for each platform
  Make(MakeArgs),

  /// Print full version information
  Version,
}

fn init_logging(debug: bool) {
  let default_level = if debug { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

/// Command-line arguments with the subcommand name lowercased, so `MAKE` and
/// `Version` select the same commands as `make` and `version`.
fn normalized_args() -> Vec<OsString> {
  let mut args: Vec<OsString> = std::env::args_os().collect();
  if let Some(command) = args.get_mut(1) {
    if let Some(name) = command.to_str().filter(|s| !s.starts_with('-')) {
      let lowered = name.to_lowercase();
      *command = lowered.into();
    }
  }
  args
}

fn main() -> ExitCode {
  let cli = match Cli::try_parse_from(normalized_args()) {
    Ok(cli) => cli,
    Err(err) => {
      if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        err.exit();
      }
      // Usage errors go to stderr and exit 1, not clap's default 2.
      let _ = err.print();
      return ExitCode::FAILURE;
    }
  };

  let result = match cli.command {
    Commands::Make(args) => {
      init_logging(args.debug);
      cmd_make(args)
    }
    Commands::Version => {
      cmd_version();
      Ok(())
    }
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_failure(&e);
      ExitCode::FAILURE
    }
  }
}
