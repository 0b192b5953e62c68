//! Implementation of the `package-builder make` command.
//!
//! Builds one launcher package per target into the output directory. Every flag
//! falls back to an environment variable; the parsed values are converted once
//! into a [`MakeRequest`] and handed to the library.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use clap::builder::FalseyValueParser;

use package_builder_lib::make::{MakeRequest, make};
use package_builder_lib::options::PackageSettings;
use package_builder_lib::packaging::PayloadPackager;

use crate::output::print_build_report;

#[derive(Debug, Args)]
pub struct MakeArgs {
  /// Enable debug logging
  #[arg(long)]
  pub debug: bool,

  /// The hostname of the gRPC server
  #[arg(long, env = "HOSTNAME", default_value = "")]
  pub hostname: String,

  /// The resultant package version. If left blank, auto detection will be attempted
  #[arg(long = "package_version", env = "PACKAGE_VERSION", default_value = "")]
  pub package_version: String,

  /// What channel to take osquery from. Supports filesystem paths
  #[arg(long = "osquery_version", env = "OSQUERY_VERSION", default_value = "stable")]
  pub osquery_version: String,

  /// What channel to take launcher from. Supports filesystem paths
  #[arg(long = "launcher_version", env = "LAUNCHER_VERSION", default_value = "stable")]
  pub launcher_version: String,

  /// What channel to take the osquery extension from. Supports filesystem paths
  #[arg(long = "extension_version", env = "EXTENSION_VERSION", default_value = "stable")]
  pub extension_version: String,

  /// The string to be used as the server enrollment secret
  #[arg(long = "enroll_secret", env = "ENROLL_SECRET", default_value = "", hide_env_values = true)]
  pub enroll_secret: String,

  /// The name of the key that should be used to sign packages
  #[arg(long = "mac_package_signing_key", env = "SIGNING_KEY", default_value = "")]
  pub signing_key: String,

  /// Whether the packaged launcher runs with --insecure
  #[arg(long, env = "INSECURE", value_parser = FalseyValueParser::new())]
  pub insecure: bool,

  /// Whether the packaged launcher runs with --insecure_grpc
  #[arg(long = "insecure_grpc", env = "INSECURE_GRPC", value_parser = FalseyValueParser::new())]
  pub insecure_grpc: bool,

  /// Whether the packaged launcher runs with --autoupdate
  #[arg(long, env = "AUTOUPDATE", value_parser = FalseyValueParser::new())]
  pub autoupdate: bool,

  /// Value for the packaged launcher's --update_channel
  #[arg(long = "update_channel", env = "UPDATE_CHANNEL", default_value = "")]
  pub update_channel: String,

  /// Whether the packaged launcher runs with --control
  #[arg(long, env = "CONTROL", value_parser = FalseyValueParser::new())]
  pub control: bool,

  /// Value for the packaged launcher's --control_hostname
  #[arg(long = "control_hostname", env = "CONTROL_HOSTNAME", default_value = "")]
  pub control_hostname: String,

  /// Whether the packaged launcher runs with --disable_control_tls
  #[arg(long = "disable_control_tls", env = "DISABLE_CONTROL_TLS", value_parser = FalseyValueParser::new())]
  pub disable_control_tls: bool,

  /// The name of the directory that the launcher installation will shard into
  #[arg(long, env = "IDENTIFIER", default_value = "launcher")]
  pub identifier: String,

  /// Omit the enroll secret in the resultant package
  #[arg(long = "omit_secret", env = "OMIT_SECRET", value_parser = FalseyValueParser::new())]
  pub omit_secret: bool,

  /// Comma separated, hex encoded SHA256 hashes of pinned subject public key info
  #[arg(long = "cert_pins", env = "CERT_PINS", default_value = "")]
  pub cert_pins: String,

  /// Path to PEM file including root certificates to verify against
  #[arg(long = "root_pem", env = "ROOT_PEM", default_value = "")]
  pub root_pem: String,

  /// Directory to output package files to (default: random)
  #[arg(long = "output_dir", env = "OUTPUT_DIR")]
  pub output_dir: Option<PathBuf>,

  /// Directory to cache downloads in (default: random, removed afterwards)
  #[arg(long = "cache_dir", env = "CACHE_DIR")]
  pub cache_dir: Option<PathBuf>,

  /// Run differential queries from config ahead of scheduled interval
  #[arg(long = "with_initial_runner", env = "ENABLE_INITIAL_RUNNER", value_parser = FalseyValueParser::new())]
  pub with_initial_runner: bool,

  /// Target platforms to build (comma separated: darwin, rpm, deb)
  #[arg(long, env = "TARGETS", default_value = "")]
  pub targets: String,
}

impl MakeArgs {
  /// Convert parsed flags into a library request.
  pub fn into_request(self) -> MakeRequest {
    MakeRequest {
      settings: PackageSettings {
        package_version: self.package_version,
        osquery_version: self.osquery_version,
        launcher_version: self.launcher_version,
        extension_version: self.extension_version,
        hostname: self.hostname,
        enroll_secret: self.enroll_secret,
        signing_key: self.signing_key,
        insecure: self.insecure,
        insecure_grpc: self.insecure_grpc,
        autoupdate: self.autoupdate,
        update_channel: self.update_channel,
        control: self.control,
        control_hostname: self.control_hostname,
        disable_control_tls: self.disable_control_tls,
        initial_runner: self.with_initial_runner,
        identifier: self.identifier,
        omit_secret: self.omit_secret,
        cert_pins: self.cert_pins,
        root_pem: self.root_pem,
      },
      cache_dir: self.cache_dir.filter(|p| !p.as_os_str().is_empty()),
      output_dir: self.output_dir.filter(|p| !p.as_os_str().is_empty()),
      targets: self.targets,
    }
  }
}

/// Execute the make command.
///
/// Prints one line per artifact and the output directory on success.
///
/// # Errors
///
/// Returns the first validation, workspace, target or build failure.
pub fn cmd_make(args: MakeArgs) -> Result<()> {
  let start = Instant::now();

  let outcome = make(args.into_request(), &PayloadPackager::new()).context("make failed")?;

  print_build_report(&outcome.artifacts, &outcome.output_dir, start.elapsed());

  Ok(())
}
