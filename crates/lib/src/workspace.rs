//! Working directories for one build invocation.
//!
//! A [`Workspace`] owns two directories:
//! - the download cache, shared by every target build
//! - the output directory, where artifacts are written
//!
//! Either may be supplied by the caller, in which case it is created if absent
//! and left in place afterwards. A generated cache directory is removed when the
//! `Workspace` is dropped, on success and error paths alike. A generated output
//! directory is kept: it holds the deliverables.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use thiserror::Error;
use tracing::{debug, warn};

use crate::consts::{CACHE_DIR_PREFIX, OUTPUT_DIR_PREFIX};

#[derive(Debug, Error)]
pub enum WorkspaceError {
  #[error("could not create temp dir for caching files")]
  CreateCacheTemp(#[source] io::Error),

  #[error("could not create temp dir for output")]
  CreateOutputTemp(#[source] io::Error),

  #[error("failed to create directory {}", path.display())]
  CreateDir { path: PathBuf, source: io::Error },

  #[error("directory is not writable {}", path.display())]
  NotWritable { path: PathBuf, source: io::Error },
}

/// Cache and output directories for one invocation.
#[derive(Debug)]
pub struct Workspace {
  cache_dir: PathBuf,
  output_dir: PathBuf,
  /// Present only when the cache directory was generated; removes it on drop.
  cache_guard: Option<TempDir>,
}

impl Workspace {
  /// Establish the cache and output directories.
  ///
  /// `None` selects a freshly generated directory under the system temp dir.
  ///
  /// # Errors
  ///
  /// Returns an error if either directory cannot be created or written to.
  /// Nothing is retried.
  pub fn prepare(cache_dir: Option<&Path>, output_dir: Option<&Path>) -> Result<Self, WorkspaceError> {
    let (cache_dir, cache_guard) = match cache_dir {
      Some(dir) => {
        ensure_dir(dir)?;
        (dir.to_path_buf(), None)
      }
      None => {
        let temp = tempfile::Builder::new()
          .prefix(CACHE_DIR_PREFIX)
          .tempdir()
          .map_err(WorkspaceError::CreateCacheTemp)?;
        (temp.path().to_path_buf(), Some(temp))
      }
    };

    let output_dir = match output_dir {
      Some(dir) => {
        ensure_dir(dir)?;
        dir.to_path_buf()
      }
      None => tempfile::Builder::new()
        .prefix(OUTPUT_DIR_PREFIX)
        .tempdir()
        .map_err(WorkspaceError::CreateOutputTemp)?
        .keep(),
    };

    ensure_writable(&cache_dir)?;
    ensure_writable(&output_dir)?;

    debug!(
      cache = %cache_dir.display(),
      output = %output_dir.display(),
      generated_cache = cache_guard.is_some(),
      "workspace prepared"
    );

    Ok(Self {
      cache_dir,
      output_dir,
      cache_guard,
    })
  }

  pub fn cache_dir(&self) -> &Path {
    &self.cache_dir
  }

  pub fn output_dir(&self) -> &Path {
    &self.output_dir
  }

  /// Whether the cache directory will be removed when the workspace is released.
  pub fn is_cache_transient(&self) -> bool {
    self.cache_guard.is_some()
  }

  /// Release the workspace, reporting a failure to remove a generated cache.
  ///
  /// Dropping the workspace has the same effect but logs instead of returning
  /// the error. Returns the output directory.
  pub fn close(mut self) -> io::Result<PathBuf> {
    if let Some(guard) = self.cache_guard.take() {
      guard.close()?;
    }
    Ok(std::mem::take(&mut self.output_dir))
  }
}

impl Drop for Workspace {
  fn drop(&mut self) {
    if let Some(guard) = self.cache_guard.take() {
      let path = guard.path().to_path_buf();
      if let Err(e) = guard.close() {
        warn!(path = %path.display(), error = %e, "failed to remove cache directory");
      }
    }
  }
}

fn ensure_dir(dir: &Path) -> Result<(), WorkspaceError> {
  fs::create_dir_all(dir).map_err(|e| WorkspaceError::CreateDir {
    path: dir.to_path_buf(),
    source: e,
  })
}

fn ensure_writable(dir: &Path) -> Result<(), WorkspaceError> {
  tempfile::tempfile_in(dir)
    .map(drop)
    .map_err(|e| WorkspaceError::NotWritable {
      path: dir.to_path_buf(),
      source: e,
    })
}
