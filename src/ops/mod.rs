//! High-level operations.
//!
//! One module per command. Operations return `BuildError`; printing is left
//! to the binary.

pub mod add;
pub mod build;
pub mod clean;
pub mod init;
pub mod run;

pub use add::{add_dependency, AddOptions, AddResult};
pub use build::{build, lint_project, BuildOptions, BuildOutcome};
pub use clean::clean;
pub use init::{init_project, InitOptions};
pub use run::{run, test, RunOptions, TestOptions};
