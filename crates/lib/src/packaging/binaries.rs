//! Bundled binary sources.
//!
//! Each bundled binary is selected by a version string that is either a channel
//! name (e.g. "stable") or a filesystem path. Channels are recorded for the
//! installer to resolve; paths are copied into the invocation's cache directory
//! once, keyed by content hash, and reused by every later target.

use std::fs::{self, File};
use std::io;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tracing::debug;

use super::PackageError;
use crate::options::BuildOptions;

/// Number of hex characters of the digest used in cached file names.
const CACHE_KEY_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BinaryKind {
  Launcher,
  Osqueryd,
  Extension,
}

impl BinaryKind {
  pub const ALL: [BinaryKind; 3] = [Self::Launcher, Self::Osqueryd, Self::Extension];

  /// File name inside the package's bin directory
  pub fn file_name(&self) -> &'static str {
    match self {
      Self::Launcher => "launcher",
      Self::Osqueryd => "osqueryd",
      Self::Extension => "osquery-extension.ext",
    }
  }

  /// The version string selecting this binary
  pub fn version<'a>(&self, options: &'a BuildOptions) -> &'a str {
    let settings = options.settings();
    match self {
      Self::Launcher => &settings.launcher_version,
      Self::Osqueryd => &settings.osquery_version,
      Self::Extension => &settings.extension_version,
    }
  }
}

/// Where a bundled binary comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BinarySource {
  /// Resolved at install time from an update channel.
  Channel { channel: String },
  /// A local file, copied into the cache.
  Path {
    source: PathBuf,
    cached: PathBuf,
    sha256: String,
  },
}

impl BinarySource {
  /// The cached copy to embed, if the binary is local.
  pub fn cached_path(&self) -> Option<&Path> {
    match self {
      Self::Channel { .. } => None,
      Self::Path { cached, .. } => Some(cached),
    }
  }
}

/// Content-addressed copies of local binaries.
#[derive(Debug, Clone, Copy)]
pub struct BinaryCache<'a> {
  dir: &'a Path,
}

impl<'a> BinaryCache<'a> {
  pub fn new(dir: &'a Path) -> Self {
    Self { dir }
  }

  /// Resolve `version` for `kind` to a source, caching local files.
  pub fn resolve(&self, kind: BinaryKind, version: &str) -> Result<BinarySource, PackageError> {
    let path = Path::new(version);
    if path.is_file() {
      return self.cache_file(kind, path);
    }
    if version.contains('/') || version.contains(MAIN_SEPARATOR) {
      return Err(PackageError::Cache {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::NotFound, "binary path does not exist"),
      });
    }
    Ok(BinarySource::Channel {
      channel: version.to_string(),
    })
  }

  fn cache_file(&self, kind: BinaryKind, source: &Path) -> Result<BinarySource, PackageError> {
    let cache_err = |e: io::Error| PackageError::Cache {
      path: source.to_path_buf(),
      source: e,
    };

    let sha256 = hash_file(source).map_err(cache_err)?;
    let cached = self
      .dir
      .join(format!("{}-{}", kind.file_name(), &sha256[..CACHE_KEY_LEN]));

    if cached.is_file() {
      debug!(binary = kind.file_name(), path = %cached.display(), "cache hit");
    } else {
      let mut staged = NamedTempFile::new_in(self.dir).map_err(cache_err)?;
      io::copy(&mut File::open(source).map_err(cache_err)?, staged.as_file_mut()).map_err(cache_err)?;
      staged.persist(&cached).map_err(|e| cache_err(e.error))?;
      debug!(binary = kind.file_name(), path = %cached.display(), "cached binary");
    }

    Ok(BinarySource::Path {
      source: source.to_path_buf(),
      cached,
      sha256,
    })
  }
}

fn hash_file(path: &Path) -> io::Result<String> {
  let mut file = File::open(path)?;
  let mut hasher = Sha256::new();
  io::copy(&mut file, &mut hasher)?;
  Ok(hex::encode(hasher.finalize()))
}

/// Size of a cached binary, for logging.
pub fn cached_size(source: &BinarySource) -> Option<u64> {
  source
    .cached_path()
    .and_then(|p| fs::metadata(p).ok())
    .map(|m| m.len())
}
