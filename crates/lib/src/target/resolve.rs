//! Target specification parsing.
//!
//! A specification is a comma-separated list of human-readable tokens. The empty
//! specification selects [`DEFAULT_TARGETS`]. Tokens are matched case-sensitively
//! against [`TARGET_TOKENS`]; a single unknown token fails the whole resolution.
//! Repeated tokens yield repeated targets.

use thiserror::Error;
use tracing::debug;

use super::{InitSystem, PackageFormat, Platform, Target};

const DARWIN_PKG: Target = Target::new(Platform::Darwin, InitSystem::LaunchD, PackageFormat::Pkg);
const SYSTEMD_RPM: Target = Target::new(Platform::Linux, InitSystem::SystemD, PackageFormat::Rpm);
const SYSTEMD_DEB: Target = Target::new(Platform::Linux, InitSystem::SystemD, PackageFormat::Deb);
const UPSTART_DEB: Target = Target::new(Platform::Linux, InitSystem::Upstart, PackageFormat::Deb);

/// Targets built when the specification is empty, in build order.
pub const DEFAULT_TARGETS: [Target; 4] = [DARWIN_PKG, SYSTEMD_RPM, SYSTEMD_DEB, UPSTART_DEB];

/// Recognized specification tokens.
pub const TARGET_TOKENS: &[(&str, Target)] = &[("rpm", SYSTEMD_RPM), ("deb", SYSTEMD_DEB), ("darwin", DARWIN_PKG)];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
  #[error("unknown target: {token:?} (expected one of: {expected})", expected = known_tokens())]
  UnknownTarget { token: String },
}

fn known_tokens() -> String {
  TARGET_TOKENS.iter().map(|(token, _)| *token).collect::<Vec<_>>().join(", ")
}

fn lookup(token: &str) -> Option<Target> {
  TARGET_TOKENS
    .iter()
    .find(|(name, _)| *name == token)
    .map(|(_, target)| *target)
}

/// Resolve a target specification into an ordered list of targets.
///
/// # Errors
///
/// Returns [`ResolveError::UnknownTarget`] for the first token that is not in
/// [`TARGET_TOKENS`]. No partial list is returned.
pub fn resolve(spec: &str) -> Result<Vec<Target>, ResolveError> {
  if spec.is_empty() {
    debug!("no targets specified, using defaults");
    return Ok(DEFAULT_TARGETS.to_vec());
  }

  spec
    .split(',')
    .map(|token| lookup(token).ok_or_else(|| ResolveError::UnknownTarget { token: token.to_string() }))
    .collect()
}
