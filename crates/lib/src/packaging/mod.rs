//! Package construction.
//!
//! The orchestrator only knows the [`Packager`] trait: given the shared
//! [`BuildOptions`], a [`Target`] and a writable stream, a packager either fully
//! writes one artifact for that target or returns an error.
//!
//! # Submodules
//!
//! - [`payload`] - Default engine writing a gzip-compressed tar staging payload
//! - [`binaries`] - Bundled binary sources and the per-invocation cache
//! - [`render`] - Launcher flag file and init-system service definitions

pub mod binaries;
pub mod payload;
pub mod render;

use std::io::{self, Write};
use std::path::PathBuf;

use thiserror::Error;

use crate::options::BuildOptions;
use crate::target::Target;

pub use payload::PayloadPackager;

/// Errors surfaced by a packaging engine.
#[derive(Debug, Error)]
pub enum PackageError {
  #[error("unsupported target: {0}")]
  UnsupportedTarget(Target),

  #[error("failed to read root PEM {}", path.display())]
  ReadRootPem { path: PathBuf, source: io::Error },

  #[error("failed to cache binary {}", path.display())]
  Cache { path: PathBuf, source: io::Error },

  #[error("failed to serialize manifest")]
  Manifest(#[from] serde_json::Error),

  #[error("io error")]
  Io(#[from] io::Error),

  /// Failure reported by an engine outside this crate.
  #[error("{0}")]
  Engine(String),
}

/// Builds one package artifact per call.
pub trait Packager {
  /// Write the artifact for `target` to `out`.
  fn build(&self, options: &BuildOptions, target: Target, out: &mut dyn Write) -> Result<(), PackageError>;
}

impl<P: Packager + ?Sized> Packager for &P {
  fn build(&self, options: &BuildOptions, target: Target, out: &mut dyn Write) -> Result<(), PackageError> {
    (**self).build(options, target, out)
  }
}
