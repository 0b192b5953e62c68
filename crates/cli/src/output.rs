//! Terminal reporting for package builds.
//!
//! Rows are built as plain strings so they can be checked in tests; colour is
//! applied only when printing, and only when the stream supports it.

use std::path::Path;
use std::time::Duration;

use owo_colors::{OwoColorize, Stream};
use package_builder_lib::orchestrate::Artifact;

const SIZE_UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];

/// Size with a binary unit, one decimal above bytes.
pub fn human_size(bytes: u64) -> String {
  let mut value = bytes as f64;
  let mut unit = 0;
  while value >= 1024.0 && unit + 1 < SIZE_UNITS.len() {
    value /= 1024.0;
    unit += 1;
  }
  if unit == 0 {
    format!("{bytes} {}", SIZE_UNITS[0])
  } else {
    format!("{value:.1} {}", SIZE_UNITS[unit])
  }
}

/// Milliseconds under a second, otherwise seconds with one decimal.
pub fn human_elapsed(elapsed: Duration) -> String {
  if elapsed < Duration::from_secs(1) {
    format!("{}ms", elapsed.as_millis())
  } else {
    format!("{:.1}s", elapsed.as_secs_f64())
  }
}

/// One row per artifact: target, size and path, with targets padded to a common width.
pub fn artifact_rows(artifacts: &[Artifact]) -> Vec<String> {
  let width = artifacts
    .iter()
    .map(|a| a.target.to_string().len())
    .max()
    .unwrap_or(0);
  artifacts
    .iter()
    .map(|a| {
      format!(
        "{:<width$}  {:>9}  {}",
        a.target.to_string(),
        human_size(a.size),
        a.path.display()
      )
    })
    .collect()
}

/// `label: value` rows with labels padded to a common width.
pub fn field_rows(fields: &[(&str, String)]) -> Vec<String> {
  let width = fields.iter().map(|(label, _)| label.len() + 1).max().unwrap_or(0);
  fields
    .iter()
    .map(|(label, value)| format!("{:<width$} {value}", format!("{label}:")))
    .collect()
}

/// Print the artifact table followed by the build summary.
pub fn print_build_report(artifacts: &[Artifact], output_dir: &Path, elapsed: Duration) {
  for row in artifact_rows(artifacts) {
    println!("  {row}");
  }
  let summary = format!(
    "Built {} package(s) in {} ({})",
    artifacts.len(),
    output_dir.display(),
    human_elapsed(elapsed)
  );
  println!("{}", summary.if_supports_color(Stream::Stdout, |s| s.green()));
}

pub fn print_fields(fields: &[(&str, String)]) {
  for row in field_rows(fields) {
    println!("  {}", row.if_supports_color(Stream::Stdout, |s| s.dimmed()));
  }
}

/// Print a failed command and its cause chain on one line.
pub fn print_failure(err: &anyhow::Error) {
  eprintln!(
    "{} {:#}",
    "error:".if_supports_color(Stream::Stderr, |s| s.red()),
    err
  );
}
