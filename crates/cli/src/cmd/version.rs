use package_builder_lib::consts::APP_NAME;
use package_builder_lib::target::{DEFAULT_TARGETS, TARGET_TOKENS};

use crate::output::print_fields;

/// Print full version information.
pub fn cmd_version() {
  println!("{} {}", APP_NAME, env!("CARGO_PKG_VERSION"));

  let tokens: Vec<_> = TARGET_TOKENS.iter().map(|(token, _)| *token).collect();
  let defaults: Vec<_> = DEFAULT_TARGETS.iter().map(ToString::to_string).collect();
  print_fields(&[
    ("Build", format!("{}/{}", std::env::consts::OS, std::env::consts::ARCH)),
    ("Targets", tokens.join(", ")),
    ("Defaults", defaults.join(", ")),
  ]);
}
