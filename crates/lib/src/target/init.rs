use std::fmt;

use serde::Serialize;

/// Service managers a package can register the launcher with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InitSystem {
  LaunchD,
  SystemD,
  Upstart,
}

impl InitSystem {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::LaunchD => "launchd",
      Self::SystemD => "systemd",
      Self::Upstart => "upstart",
    }
  }
}

impl fmt::Display for InitSystem {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
