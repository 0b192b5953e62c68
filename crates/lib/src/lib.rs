//! package-builder-lib: target resolution and build orchestration for launcher packages
//!
//! This crate turns a set of agent-configuration parameters and a target list
//! into one package artifact per target:
//! - `options`: the validated, immutable `BuildOptions` bundle
//! - `target`: `(platform, init, package)` triples and the target resolver
//! - `workspace`: cache and output directory lifecycle
//! - `packaging`: the `Packager` seam and the default payload engine
//! - `orchestrate`: sequential per-target build loop
//! - `make`: the end-to-end pipeline tying the stages together
//! - `version`: package version detection

pub mod consts;
pub mod make;
pub mod options;
pub mod orchestrate;
pub mod packaging;
pub mod target;
pub mod version;
pub mod workspace;
