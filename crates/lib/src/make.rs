//! End-to-end `make` pipeline.
//!
//! Stages run strictly in this order, each failing fast:
//! 1. validate options (no side effects)
//! 2. prepare the workspace (cache + output directories)
//! 3. resolve the target specification
//! 4. build every target sequentially
//!
//! A generated cache directory is released when this function returns, whichever
//! path it returns by.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

use crate::options::{OptionsError, PackageSettings};
use crate::orchestrate::{Artifact, BuildError, build_all};
use crate::packaging::Packager;
use crate::target::{ResolveError, resolve};
use crate::workspace::{Workspace, WorkspaceError};

#[derive(Debug, Error)]
pub enum MakeError {
  #[error("invalid options")]
  Options(#[from] OptionsError),

  #[error("failed to prepare workspace")]
  Workspace(#[from] WorkspaceError),

  #[error("failed to resolve targets")]
  Resolve(#[from] ResolveError),

  #[error("could not generate packages")]
  Build(#[from] BuildError),
}

/// Everything one `make` invocation needs.
#[derive(Debug, Clone, Default)]
pub struct MakeRequest {
  pub settings: PackageSettings,
  /// Download cache. `None` uses a temporary directory removed afterwards.
  pub cache_dir: Option<PathBuf>,
  /// Artifact directory. `None` uses a temporary directory that is kept.
  pub output_dir: Option<PathBuf>,
  /// Comma-separated target tokens. Empty selects the default targets.
  pub targets: String,
}

#[derive(Debug)]
pub struct MakeOutcome {
  pub output_dir: PathBuf,
  pub artifacts: Vec<Artifact>,
}

/// Run the full pipeline with `packager` as the packaging engine.
pub fn make<P: Packager + ?Sized>(request: MakeRequest, packager: &P) -> Result<MakeOutcome, MakeError> {
  let validated = request.settings.validate()?;

  let workspace = Workspace::prepare(request.cache_dir.as_deref(), request.output_dir.as_deref())?;
  let options = validated.into_build_options(workspace.cache_dir().to_path_buf());

  let targets = resolve(&request.targets)?;
  info!(
    count = targets.len(),
    output = %workspace.output_dir().display(),
    "building packages"
  );

  let artifacts = build_all(packager, &options, &targets, workspace.output_dir())?;

  let output_dir = workspace.output_dir().to_path_buf();
  if let Err(e) = workspace.close() {
    warn!(error = %e, "failed to remove cache directory");
  }

  Ok(MakeOutcome { output_dir, artifacts })
}
