use std::fmt;

use serde::Serialize;

/// Installable archive kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageFormat {
  Pkg,
  Deb,
  Rpm,
}

impl PackageFormat {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Pkg => "pkg",
      Self::Deb => "deb",
      Self::Rpm => "rpm",
    }
  }

  /// File extension used for artifacts of this format
  pub fn extension(&self) -> &'static str {
    // Extensions currently coincide with the format names.
    self.as_str()
  }
}

impl fmt::Display for PackageFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
