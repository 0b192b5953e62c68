use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn builds_requested_targets_into_output_dir() {
  let env = TestEnv::new();
  let output = env.output_path();

  env
    .builder_cmd()
    .args(["make", "--hostname", "fleet.example.com", "--targets", "darwin,rpm"])
    .arg("--output_dir")
    .arg(&output)
    .assert()
    .success()
    .stdout(predicate::str::contains("darwin-launchd-pkg"))
    .stdout(predicate::str::contains(output.display().to_string()));

  assert!(output.join("launcher.darwin-launchd-pkg.pkg").is_file());
  assert!(output.join("launcher.linux-systemd-rpm.rpm").is_file());
  assert!(!output.join("launcher.linux-systemd-deb.deb").exists());
}

#[test]
fn flags_fall_back_to_environment() {
  let env = TestEnv::new();
  let output = env.output_path();

  env
    .builder_cmd()
    .arg("make")
    .env("HOSTNAME", "env.example.com")
    .env("TARGETS", "deb")
    .env("OUTPUT_DIR", &output)
    .env("AUTOUPDATE", "true")
    .assert()
    .success();

  assert!(output.join("launcher.linux-systemd-deb.deb").is_file());
}

#[test]
fn empty_boolean_env_means_false() {
  let env = TestEnv::new();
  let output = env.output_path();

  env
    .builder_cmd()
    .args(["make", "--hostname", "fleet.example.com", "--targets", "rpm"])
    .arg("--output_dir")
    .arg(&output)
    .env("INSECURE", "")
    .env("AUTOUPDATE", "")
    .env("OMIT_SECRET", "")
    .assert()
    .success();

  assert!(output.join("launcher.linux-systemd-rpm.rpm").is_file());
}

#[test]
fn default_targets_build_four_packages() {
  let env = TestEnv::new();
  let output = env.output_path();

  env
    .builder_cmd()
    .args(["make", "--hostname", "fleet.example.com"])
    .arg("--output_dir")
    .arg(&output)
    .assert()
    .success();

  assert_eq!(std::fs::read_dir(&output).unwrap().count(), 4);
}

#[test]
fn supplied_cache_dir_is_kept() {
  let env = TestEnv::new();
  let cache = env.cache_path();

  env
    .builder_cmd()
    .args(["make", "--hostname", "fleet.example.com", "--targets", "rpm"])
    .arg("--cache_dir")
    .arg(&cache)
    .arg("--output_dir")
    .arg(env.output_path())
    .assert()
    .success();

  assert!(cache.is_dir());
}

#[test]
fn generated_cache_is_removed_and_output_kept() {
  let env = TestEnv::new();

  env
    .builder_cmd()
    .args(["make", "--hostname", "fleet.example.com", "--targets", "rpm"])
    .assert()
    .success()
    .stdout(predicate::str::contains("launcher-package"));

  assert!(env.tmp_entries("download_cache").is_empty());
  let outputs = env.tmp_entries("launcher-package");
  assert_eq!(outputs.len(), 1);
  assert!(outputs[0].join("launcher.linux-systemd-rpm.rpm").is_file());
}

#[test]
fn empty_hostname_creates_no_directories() {
  let env = TestEnv::new();

  env
    .builder_cmd()
    .args(["make", "--hostname", ""])
    .arg("--output_dir")
    .arg(env.output_path())
    .arg("--cache_dir")
    .arg(env.cache_path())
    .assert()
    .code(1)
    .stderr(predicate::str::contains("hostname undefined"));

  assert!(!env.output_path().exists());
  assert!(!env.cache_path().exists());
}

#[test]
fn unknown_target_fails_with_token() {
  let env = TestEnv::new();

  env
    .builder_cmd()
    .args(["make", "--hostname", "fleet.example.com", "--targets", "darwin,bogus"])
    .arg("--output_dir")
    .arg(env.output_path())
    .assert()
    .code(1)
    .stderr(predicate::str::contains("bogus"));

  assert_eq!(std::fs::read_dir(env.output_path()).unwrap().count(), 0);
}

#[test]
fn missing_root_pem_fails_after_nothing_built() {
  let env = TestEnv::new();
  let output = env.output_path();

  env
    .builder_cmd()
    .args(["make", "--hostname", "fleet.example.com", "--targets", "rpm,deb"])
    .args(["--root_pem", "/nonexistent/roots.pem"])
    .arg("--output_dir")
    .arg(&output)
    .assert()
    .code(1)
    .stderr(predicate::str::contains("linux-systemd-rpm"))
    .stderr(predicate::str::contains("roots.pem"));

  // The failing target's file was created, the next target was never attempted.
  assert!(output.join("launcher.linux-systemd-rpm.rpm").exists());
  assert!(!output.join("launcher.linux-systemd-deb.deb").exists());
}

#[test]
fn missing_binary_path_cause_is_printed_once() {
  let env = TestEnv::new();

  let assert = env
    .builder_cmd()
    .args(["make", "--hostname", "fleet.example.com", "--targets", "rpm"])
    .args(["--launcher_version", "/nonexistent/launcher"])
    .arg("--output_dir")
    .arg(env.output_path())
    .assert()
    .code(1);

  let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
  assert_eq!(stderr.matches("binary path does not exist").count(), 1, "{stderr}");
  assert_eq!(stderr.matches("failed to cache binary").count(), 1, "{stderr}");
  assert_eq!(stderr.matches("linux-systemd-rpm").count(), 1, "{stderr}");
}
