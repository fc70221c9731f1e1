//! Mosaic - one build command for many toolchains
//!
//! This crate provides the build orchestration engine behind the `mosaic`
//! binary: the backend plugin contract and registry, source selection,
//! incremental staleness checks, the parallel scheduler, linking, and the
//! dependency category lint.

pub mod builder;
pub mod core;
pub mod error;
pub mod ops;
pub mod util;

/// Fake backends and fixtures for unit tests.
#[cfg(test)]
pub mod test_support;

pub use builder::{Backend, BackendRegistry, Compiler, ProgressReporter, Runner};
pub use core::{BuildOverrides, Project, ProjectConfig};
pub use error::BuildError;
