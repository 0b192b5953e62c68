//! The default packaging engine.
//!
//! [`PayloadPackager`] writes a gzip-compressed tar of every file the package
//! installs, rooted at `/`, plus a `manifest.json` describing the build. Binaries
//! selected by channel are listed in the manifest rather than embedded.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use tracing::{debug, info};

use super::binaries::{BinaryCache, BinaryKind, BinarySource, cached_size};
use super::render::{self, Layout};
use super::{PackageError, Packager};
use crate::options::BuildOptions;
use crate::target::{InitSystem, PackageFormat, Platform, Target};

pub const MANIFEST_FILE: &str = "manifest.json";

const MODE_FILE: u32 = 0o644;
const MODE_SECRET: u32 = 0o600;
const MODE_EXEC: u32 = 0o755;

/// Build description stored at the root of every payload.
#[derive(Debug, Serialize)]
pub struct PayloadManifest<'a> {
  pub target: Target,
  pub name: String,
  pub package_version: String,
  pub identifier: &'a str,
  pub hostname: &'a str,
  pub binaries: BTreeMap<&'static str, BinarySource>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub signing_key: Option<&'a str>,
}

/// Writes staging payloads for supported targets.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadPackager;

impl PayloadPackager {
  pub fn new() -> Self {
    Self
  }
}

/// Whether the engine knows how to lay out `target`.
pub fn is_supported(target: Target) -> bool {
  matches!(
    (target.platform, target.init, target.package),
    (Platform::Darwin, InitSystem::LaunchD, PackageFormat::Pkg)
      | (Platform::Linux, InitSystem::SystemD | InitSystem::Upstart, PackageFormat::Deb | PackageFormat::Rpm)
  )
}

impl Packager for PayloadPackager {
  fn build(&self, options: &BuildOptions, target: Target, out: &mut dyn Write) -> Result<(), PackageError> {
    if !is_supported(target) {
      return Err(PackageError::UnsupportedTarget(target));
    }

    let layout = Layout::new(options.identifier());
    let cache = BinaryCache::new(options.cache_dir());

    let mut binaries = BTreeMap::new();
    for kind in BinaryKind::ALL {
      let source = cache.resolve(kind, kind.version(options))?;
      debug!(binary = kind.file_name(), size = ?cached_size(&source), "resolved binary");
      binaries.insert(kind.file_name(), source);
    }

    let signing_key = options.settings().signing_key.as_str();
    let manifest = PayloadManifest {
      target,
      name: target.to_string(),
      package_version: options.package_version().to_string(),
      identifier: options.identifier(),
      hostname: options.hostname(),
      signing_key: (target.package == PackageFormat::Pkg && !signing_key.is_empty()).then_some(signing_key),
      binaries,
    };

    info!(
      build_target = %target,
      version = %manifest.package_version,
      "writing package payload"
    );

    let mut archive = tar::Builder::new(GzEncoder::new(out, Compression::default()));

    let flags = render::flag_file(options, &layout);
    append_bytes(&mut archive, &layout.flag_file(), flags.as_bytes(), MODE_FILE)?;

    if options.embeds_secret() {
      let secret = options.settings().enroll_secret.as_bytes();
      append_bytes(&mut archive, &layout.secret_file(), secret, MODE_SECRET)?;
    }

    if let Some(pem) = options.root_pem() {
      let contents = fs::read(pem).map_err(|e| PackageError::ReadRootPem {
        path: pem.to_path_buf(),
        source: e,
      })?;
      append_bytes(&mut archive, &layout.root_pem_file(), &contents, MODE_FILE)?;
    }

    let service = render::service_file(target.init, &layout);
    append_bytes(&mut archive, &layout.service_file(target.init), service.as_bytes(), MODE_FILE)?;

    for (name, source) in &manifest.binaries {
      if let Some(cached) = source.cached_path() {
        let file = File::open(cached)?;
        let size = file.metadata()?.len();
        append_reader(&mut archive, &layout.binary(name), file, size, MODE_EXEC)?;
      }
    }

    let manifest_json = serde_json::to_vec_pretty(&manifest)?;
    append_bytes(&mut archive, Path::new(MANIFEST_FILE), &manifest_json, MODE_FILE)?;

    let mut encoder = archive.into_inner()?;
    encoder.flush()?;
    encoder.finish()?;
    Ok(())
  }
}

fn append_bytes<W: Write>(archive: &mut tar::Builder<W>, path: &Path, data: &[u8], mode: u32) -> Result<(), PackageError> {
  append_reader(archive, path, data, data.len() as u64, mode)
}

fn append_reader<W: Write, R: Read>(
  archive: &mut tar::Builder<W>,
  path: &Path,
  data: R,
  size: u64,
  mode: u32,
) -> Result<(), PackageError> {
  let mut header = tar::Header::new_gnu();
  header.set_size(size);
  header.set_mode(mode);
  header.set_mtime(0);
  let relative = path.strip_prefix("/").unwrap_or(path);
  archive.append_data(&mut header, relative, data)?;
  Ok(())
}
