use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::consts::FALLBACK_PACKAGE_VERSION;

/// The package version to stamp into artifacts.
///
/// Returns `configured` when set, otherwise [`detect_package_version`] in the
/// current directory.
pub fn resolve_package_version(configured: &str) -> String {
  if !configured.is_empty() {
    return configured.to_string();
  }
  let cwd = std::env::current_dir().unwrap_or_else(|_| Path::new(".").to_path_buf());
  detect_package_version(&cwd)
}

/// Derive a version from `git describe --tags --always` run in `dir`.
///
/// Falls back to [`FALLBACK_PACKAGE_VERSION`] when git is unavailable or `dir`
/// is not inside a repository.
pub fn detect_package_version(dir: &Path) -> String {
  let output = Command::new("git")
    .args(["describe", "--tags", "--always"])
    .current_dir(dir)
    .output();

  match output {
    Ok(out) if out.status.success() => {
      let described = String::from_utf8_lossy(&out.stdout).trim().to_string();
      if described.is_empty() {
        return FALLBACK_PACKAGE_VERSION.to_string();
      }
      described.strip_prefix('v').unwrap_or(&described).to_string()
    }
    Ok(out) => {
      debug!(status = %out.status, "git describe failed, using fallback version");
      FALLBACK_PACKAGE_VERSION.to_string()
    }
    Err(e) => {
      debug!(error = %e, "git unavailable, using fallback version");
      FALLBACK_PACKAGE_VERSION.to_string()
    }
  }
}
