//! Build options and their validation.
//!
//! Raw values arrive as a [`PackageSettings`] (plain strings and flags, exactly as
//! the user supplied them). [`PackageSettings::validate`] checks the cross-cutting
//! invariants before anything touches the filesystem, and the resulting
//! [`ValidatedSettings`] is turned into the immutable [`BuildOptions`] once the
//! cache directory is known. The package version is settled at that point too,
//! so every target of one invocation is stamped with the same value.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::consts::{DEFAULT_CHANNEL, DEFAULT_IDENTIFIER};
use crate::version::resolve_package_version;

/// Errors raised while validating raw option values.
#[derive(Debug, Error)]
pub enum OptionsError {
  #[error("hostname undefined")]
  MissingHostname,

  #[error("unable to parse cert pins: invalid pin {pin:?}")]
  InvalidCertPin {
    pin: String,
    #[source]
    source: hex::FromHexError,
  },
}

/// Raw agent-configuration values as supplied by the caller.
#[derive(Debug, Clone)]
pub struct PackageSettings {
  /// Resulting package version. Empty means "detect".
  pub package_version: String,
  /// Channel name or filesystem path for osqueryd.
  pub osquery_version: String,
  /// Channel name or filesystem path for the launcher binary.
  pub launcher_version: String,
  /// Channel name or filesystem path for the osquery extension.
  pub extension_version: String,
  pub hostname: String,
  pub enroll_secret: String,
  pub signing_key: String,
  pub insecure: bool,
  pub insecure_grpc: bool,
  pub autoupdate: bool,
  pub update_channel: String,
  pub control: bool,
  pub control_hostname: String,
  pub disable_control_tls: bool,
  pub initial_runner: bool,
  /// Directory shard name the installation lives under.
  pub identifier: String,
  pub omit_secret: bool,
  /// Comma-separated, hex-encoded SHA-256 pins.
  pub cert_pins: String,
  /// Path to a PEM bundle of root certificates. Empty means none.
  pub root_pem: String,
}

impl Default for PackageSettings {
  fn default() -> Self {
    Self {
      package_version: String::new(),
      osquery_version: DEFAULT_CHANNEL.to_string(),
      launcher_version: DEFAULT_CHANNEL.to_string(),
      extension_version: DEFAULT_CHANNEL.to_string(),
      hostname: String::new(),
      enroll_secret: String::new(),
      signing_key: String::new(),
      insecure: false,
      insecure_grpc: false,
      autoupdate: false,
      update_channel: String::new(),
      control: false,
      control_hostname: String::new(),
      disable_control_tls: false,
      initial_runner: false,
      identifier: DEFAULT_IDENTIFIER.to_string(),
      omit_secret: false,
      cert_pins: String::new(),
      root_pem: String::new(),
    }
  }
}

impl PackageSettings {
  /// Check hostname presence and certificate pin encoding.
  ///
  /// This performs no I/O.
  ///
  /// # Errors
  ///
  /// Returns [`OptionsError::MissingHostname`] if the hostname is empty, or
  /// [`OptionsError::InvalidCertPin`] naming the first pin that is not hex.
  pub fn validate(self) -> Result<ValidatedSettings, OptionsError> {
    validate_hostname(&self.hostname)?;
    let cert_pins = CertPins::parse(&self.cert_pins)?;
    Ok(ValidatedSettings {
      settings: self,
      cert_pins,
    })
  }
}

/// Fails with [`OptionsError::MissingHostname`] when `hostname` is empty.
pub fn validate_hostname(hostname: &str) -> Result<(), OptionsError> {
  if hostname.is_empty() {
    return Err(OptionsError::MissingHostname);
  }
  Ok(())
}

/// Hex-encoded SHA-256 pins of pinned subject public key info.
///
/// Empty tokens in the raw list are accepted and dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertPins(Vec<String>);

impl CertPins {
  /// Parse a comma-separated pin list.
  pub fn parse(raw: &str) -> Result<Self, OptionsError> {
    let mut pins = Vec::new();
    for pin in raw.split(',') {
      hex::decode(pin).map_err(|source| OptionsError::InvalidCertPin {
        pin: pin.to_string(),
        source,
      })?;
      if !pin.is_empty() {
        pins.push(pin.to_string());
      }
    }
    Ok(Self(pins))
  }

  pub fn as_slice(&self) -> &[String] {
    &self.0
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Pins joined back into the comma-separated form the launcher accepts.
  pub fn joined(&self) -> String {
    self.0.join(",")
  }
}

/// Settings that passed validation but have no cache directory yet.
#[derive(Debug, Clone)]
pub struct ValidatedSettings {
  settings: PackageSettings,
  cert_pins: CertPins,
}

impl ValidatedSettings {
  /// Detects the package version when none was configured.
  pub fn into_build_options(self, cache_dir: PathBuf) -> BuildOptions {
    let package_version = resolve_package_version(&self.settings.package_version);
    BuildOptions {
      settings: self.settings,
      cert_pins: self.cert_pins,
      cache_dir,
      package_version,
    }
  }
}

/// The immutable parameter bundle shared by every target build of one invocation.
#[derive(Debug, Clone)]
pub struct BuildOptions {
  settings: PackageSettings,
  cert_pins: CertPins,
  cache_dir: PathBuf,
  package_version: String,
}

impl BuildOptions {
  pub fn settings(&self) -> &PackageSettings {
    &self.settings
  }

  /// Always non-empty.
  pub fn hostname(&self) -> &str {
    &self.settings.hostname
  }

  pub fn identifier(&self) -> &str {
    &self.settings.identifier
  }

  pub fn cert_pins(&self) -> &CertPins {
    &self.cert_pins
  }

  pub fn root_pem(&self) -> Option<&Path> {
    if self.settings.root_pem.is_empty() {
      None
    } else {
      Some(Path::new(&self.settings.root_pem))
    }
  }

  /// Download cache shared by all target builds of this invocation.
  pub fn cache_dir(&self) -> &Path {
    &self.cache_dir
  }

  /// Version stamped into every artifact of this invocation.
  pub fn package_version(&self) -> &str {
    &self.package_version
  }

  /// Whether the enrollment secret should be embedded in packages.
  pub fn embeds_secret(&self) -> bool {
    !self.settings.omit_secret && !self.settings.enroll_secret.is_empty()
  }
}
