//! Shared helpers for library integration tests.

use std::cell::RefCell;
use std::io::Write;
use std::path::{Path, PathBuf};

use package_builder_lib::make::MakeRequest;
use package_builder_lib::options::{BuildOptions, PackageSettings};
use package_builder_lib::packaging::{PackageError, Packager};
use package_builder_lib::target::Target;

/// Records every call and fails on the given (1-based) call.
pub struct RecordingPackager {
  pub fail_on: Option<usize>,
  pub calls: RefCell<Vec<(Target, PathBuf)>>,
}

impl RecordingPackager {
  pub fn new() -> Self {
    Self {
      fail_on: None,
      calls: RefCell::new(Vec::new()),
    }
  }

  pub fn failing_on(call: usize) -> Self {
    Self {
      fail_on: Some(call),
      ..Self::new()
    }
  }

  pub fn call_count(&self) -> usize {
    self.calls.borrow().len()
  }

  /// Cache directories seen by each call.
  pub fn cache_dirs(&self) -> Vec<PathBuf> {
    self.calls.borrow().iter().map(|(_, cache)| cache.clone()).collect()
  }
}

impl Packager for RecordingPackager {
  fn build(&self, options: &BuildOptions, target: Target, out: &mut dyn Write) -> Result<(), PackageError> {
    self.calls.borrow_mut().push((target, options.cache_dir().to_path_buf()));
    if self.fail_on == Some(self.call_count()) {
      return Err(PackageError::Engine(format!("engine rejected {target}")));
    }
    writeln!(out, "artifact {target} for {}", options.hostname())?;
    Ok(())
  }
}

/// A request with a hostname and explicit directories under `root`.
pub fn request(root: &Path, targets: &str) -> MakeRequest {
  MakeRequest {
    settings: PackageSettings {
      hostname: "fleet.example.com".to_string(),
      package_version: "1.0.0".to_string(),
      ..Default::default()
    },
    cache_dir: Some(root.join("cache")),
    output_dir: Some(root.join("output")),
    targets: targets.to_string(),
  }
}
