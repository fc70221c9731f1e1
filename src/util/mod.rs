//! Shared utilities

pub mod diagnostic;
pub mod fs;
pub mod process;
pub mod shell;

pub use diagnostic::Diagnostic;
pub use shell::{Shell, Status};
