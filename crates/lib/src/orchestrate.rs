//! Sequential build loop.
//!
//! For each target, in order, [`build_all`] creates `launcher.<target>.<ext>` in
//! the output directory and hands the open file to the [`Packager`]. The first
//! failure stops the loop: later targets are never attempted and files written
//! for earlier targets are left in place. A file created for the failing target
//! is also left behind, possibly empty or partial.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info};

use crate::options::BuildOptions;
use crate::packaging::{PackageError, Packager};
use crate::target::Target;

#[derive(Debug, Error)]
pub enum BuildError {
  #[error("failed to make package output file {} for {target}", path.display())]
  CreateOutput {
    target: Target,
    path: PathBuf,
    source: io::Error,
  },

  #[error("could not generate package for {target}")]
  Package {
    target: Target,
    path: PathBuf,
    #[source]
    source: PackageError,
  },

  #[error("failed to write package output file {} for {target}", path.display())]
  Write {
    target: Target,
    path: PathBuf,
    source: io::Error,
  },
}

impl BuildError {
  /// The target whose build failed.
  pub fn target(&self) -> Target {
    match self {
      Self::CreateOutput { target, .. } | Self::Package { target, .. } | Self::Write { target, .. } => *target,
    }
  }

  /// The output file involved in the failure.
  pub fn path(&self) -> &Path {
    match self {
      Self::CreateOutput { path, .. } | Self::Package { path, .. } | Self::Write { path, .. } => path,
    }
  }
}

/// One produced package file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
  pub target: Target,
  pub path: PathBuf,
  pub size: u64,
  pub duration: Duration,
}

/// Build every target in order, stopping at the first failure.
///
/// # Errors
///
/// Returns a [`BuildError`] naming the failing target and stage. Artifacts
/// produced before the failure remain on disk.
pub fn build_all<P: Packager + ?Sized>(
  packager: &P,
  options: &BuildOptions,
  targets: &[Target],
  output_dir: &Path,
) -> Result<Vec<Artifact>, BuildError> {
  let mut artifacts = Vec::with_capacity(targets.len());

  for (index, &target) in targets.iter().enumerate() {
    debug!(build_target = %target, index, total = targets.len(), "building target");
    let artifact = build_one(packager, options, target, output_dir)?;
    info!(
      build_target = %target,
      path = %artifact.path.display(),
      size = artifact.size,
      "package built"
    );
    artifacts.push(artifact);
  }

  Ok(artifacts)
}

fn build_one<P: Packager + ?Sized>(
  packager: &P,
  options: &BuildOptions,
  target: Target,
  output_dir: &Path,
) -> Result<Artifact, BuildError> {
  let start = Instant::now();
  let path = output_dir.join(target.file_name());

  let file = create_output(&path).map_err(|e| BuildError::CreateOutput {
    target,
    path: path.clone(),
    source: e,
  })?;

  let mut writer = BufWriter::new(file);
  packager
    .build(options, target, &mut writer)
    .map_err(|e| BuildError::Package {
      target,
      path: path.clone(),
      source: e,
    })?;

  let write_err = |e: io::Error| BuildError::Write {
    target,
    path: path.clone(),
    source: e,
  };
  writer.flush().map_err(write_err)?;
  let file = writer.into_inner().map_err(|e| write_err(e.into_error()))?;
  let size = file.metadata().map_err(write_err)?.len();

  Ok(Artifact {
    target,
    path,
    size,
    duration: start.elapsed(),
  })
}

/// Open the artifact file for writing, replacing any previous artifact.
fn create_output(path: &Path) -> io::Result<File> {
  OpenOptions::new().write(true).create(true).truncate(true).open(path)
}
