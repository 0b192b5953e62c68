use std::fs;

use package_builder_lib::make::{MakeError, make};
use package_builder_lib::orchestrate::BuildError;
use package_builder_lib::target::{DEFAULT_TARGETS, resolve};
use serial_test::serial;
use tempfile::TempDir;

use super::common::{RecordingPackager, request};

#[test]
fn default_targets_build_in_order() {
  let temp = TempDir::new().unwrap();
  let packager = RecordingPackager::new();

  let outcome = make(request(temp.path(), ""), &packager).unwrap();

  let built: Vec<_> = outcome.artifacts.iter().map(|a| a.target).collect();
  assert_eq!(built, DEFAULT_TARGETS.to_vec());
  for artifact in &outcome.artifacts {
    assert!(artifact.path.starts_with(temp.path().join("output")));
    assert!(artifact.size > 0);
  }
}

#[test]
fn supplied_cache_dir_survives_the_run() {
  let temp = TempDir::new().unwrap();
  let packager = RecordingPackager::new();

  make(request(temp.path(), "rpm"), &packager).unwrap();

  assert!(temp.path().join("cache").is_dir());
  assert_eq!(packager.cache_dirs(), vec![temp.path().join("cache")]);
}

#[test]
#[serial]
fn generated_cache_dir_is_removed_after_success() {
  let temp = TempDir::new().unwrap();
  let packager = RecordingPackager::new();
  let mut req = request(temp.path(), "darwin,rpm");
  req.cache_dir = None;

  temp_env::with_var("TMPDIR", Some(temp.path()), || {
    make(req, &packager).unwrap();
  });

  let caches = packager.cache_dirs();
  assert_eq!(caches.len(), 2);
  assert_eq!(caches[0], caches[1], "one cache is shared across targets");
  assert!(!caches[0].exists());
}

#[test]
#[serial]
fn generated_cache_dir_is_removed_after_failure() {
  let temp = TempDir::new().unwrap();
  let packager = RecordingPackager::failing_on(1);
  let mut req = request(temp.path(), "deb");
  req.cache_dir = None;

  let result = temp_env::with_var("TMPDIR", Some(temp.path()), || make(req, &packager));

  assert!(matches!(result, Err(MakeError::Build(_))));
  let caches = packager.cache_dirs();
  assert!(!caches[0].exists());
}

#[test]
#[serial]
fn generated_output_dir_is_kept() {
  let temp = TempDir::new().unwrap();
  let packager = RecordingPackager::new();
  let mut req = request(temp.path(), "deb");
  req.output_dir = None;

  let outcome = temp_env::with_var("TMPDIR", Some(temp.path()), || make(req, &packager)).unwrap();

  assert!(outcome.output_dir.starts_with(temp.path()));
  assert!(outcome.output_dir.join("launcher.linux-systemd-deb.deb").is_file());
}

#[test]
fn second_of_three_failing_keeps_first_artifact() {
  let temp = TempDir::new().unwrap();
  let packager = RecordingPackager::failing_on(2);
  let targets = resolve("darwin,rpm,deb").unwrap();

  let err = make(request(temp.path(), "darwin,rpm,deb"), &packager).unwrap_err();

  let MakeError::Build(build_err) = &err else {
    panic!("expected build error, got {err:?}");
  };
  assert!(matches!(build_err, BuildError::Package { .. }));
  assert_eq!(build_err.target(), targets[1]);
  assert_eq!(packager.call_count(), 2);

  let output = temp.path().join("output");
  let first = fs::read_to_string(output.join(targets[0].file_name())).unwrap();
  assert!(first.starts_with("artifact darwin-launchd-pkg"));
  assert!(!output.join(targets[2].file_name()).exists());
}

#[test]
fn error_chain_names_failing_target() {
  let temp = TempDir::new().unwrap();
  let packager = RecordingPackager::failing_on(1);

  let err = make(request(temp.path(), "rpm"), &packager).unwrap_err();

  let mut chain = vec![err.to_string()];
  let mut source = std::error::Error::source(&err);
  while let Some(cause) = source {
    chain.push(cause.to_string());
    source = cause.source();
  }
  let chain = chain.join(": ");
  assert!(chain.starts_with("could not generate packages"));
  assert!(chain.contains("linux-systemd-rpm"));
  assert!(chain.contains("engine rejected"));
}
