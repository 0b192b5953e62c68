//! Build targets.
//!
//! A [`Target`] is a `(platform, init system, package format)` triple naming one
//! kind of installable artifact. Targets are plain values: two targets with the
//! same triple are interchangeable.
//!
//! # Submodules
//!
//! - [`resolve`] - Maps a comma-separated target specification to targets

pub mod format;
pub mod init;
pub mod platform;
pub mod resolve;

use std::fmt;

use serde::Serialize;

use crate::consts::ARTIFACT_PREFIX;

pub use format::PackageFormat;
pub use init::InitSystem;
pub use platform::Platform;
pub use resolve::{DEFAULT_TARGETS, ResolveError, TARGET_TOKENS, resolve};

/// A buildable artifact kind (e.g., "linux-systemd-rpm")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Target {
  pub platform: Platform,
  pub init: InitSystem,
  pub package: PackageFormat,
}

impl Target {
  pub const fn new(platform: Platform, init: InitSystem, package: PackageFormat) -> Self {
    Self {
      platform,
      init,
      package,
    }
  }

  /// Returns the file extension of artifacts built for this target
  pub fn extension(&self) -> &'static str {
    self.package.extension()
  }

  /// Returns the artifact file name for this target (e.g., "launcher.linux-systemd-rpm.rpm")
  pub fn file_name(&self) -> String {
    format!("{}.{}.{}", ARTIFACT_PREFIX, self, self.extension())
  }
}

impl fmt::Display for Target {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}-{}-{}", self.platform, self.init, self.package)
  }
}
