//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Environment variables that feed `make` flags.
const FLAG_ENV_VARS: &[&str] = &[
  "HOSTNAME",
  "PACKAGE_VERSION",
  "OSQUERY_VERSION",
  "LAUNCHER_VERSION",
  "EXTENSION_VERSION",
  "ENROLL_SECRET",
  "SIGNING_KEY",
  "INSECURE",
  "INSECURE_GRPC",
  "AUTOUPDATE",
  "UPDATE_CHANNEL",
  "CONTROL",
  "CONTROL_HOSTNAME",
  "DISABLE_CONTROL_TLS",
  "IDENTIFIER",
  "OMIT_SECRET",
  "CERT_PINS",
  "ROOT_PEM",
  "OUTPUT_DIR",
  "CACHE_DIR",
  "ENABLE_INITIAL_RUNNER",
  "TARGETS",
];

/// Isolated test environment.
///
/// Each test gets its own temporary directory; generated directories land in
/// its `tmp/` subdirectory.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// Scratch directory used as TMPDIR.
  pub fn tmp_path(&self) -> PathBuf {
    let p = self.temp.path().join("tmp");
    std::fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  /// Output path (not created).
  pub fn output_path(&self) -> PathBuf {
    self.temp.path().join("output")
  }

  /// Cache path (not created).
  pub fn cache_path(&self) -> PathBuf {
    self.temp.path().join("cache")
  }

  /// Entries of the scratch directory whose name starts with `prefix`.
  pub fn tmp_entries(&self, prefix: &str) -> Vec<PathBuf> {
    std::fs::read_dir(self.tmp_path())
      .unwrap()
      .map(|e| e.unwrap().path())
      .filter(|p| p.file_name().unwrap().to_string_lossy().starts_with(prefix))
      .collect()
  }

  /// Get a pre-configured Command for the package-builder binary.
  ///
  /// Clears every flag environment variable, pins `PACKAGE_VERSION` so no git
  /// lookup happens, and points `TMPDIR` at the isolated scratch directory.
  pub fn builder_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("package-builder");
    for var in FLAG_ENV_VARS {
      cmd.env_remove(var);
    }
    cmd.env("PACKAGE_VERSION", "1.0.0");
    cmd.env("TMPDIR", self.tmp_path());
    cmd.env("RUST_LOG", "warn");
    cmd
  }
}
