//! Built-in backends.
//!
//! Each adapter shells out to an external toolchain. Flag construction lives
//! with the adapter; orchestration does not depend on it.

mod native;
mod script;
mod wasm;

use std::path::PathBuf;
use std::process::Output;

pub use native::{NativeCompiler, NativeLanguage};
pub use script::ScriptRunner;
pub use wasm::WasmCompiler;

use crate::builder::backend::BackendError;
use crate::builder::registry::BackendRegistry;
use crate::util::process::ToolCommand;

/// Register every built-in backend.
pub fn register_builtin(registry: &mut BackendRegistry) {
    registry.register_compiler(|| Box::new(NativeCompiler::new(NativeLanguage::C)));
    registry.register_compiler(|| Box::new(NativeCompiler::new(NativeLanguage::Cxx)));
    registry.register_compiler(|| Box::new(WasmCompiler::new()));

    registry.register_runner(|| Box::new(ScriptRunner::python()));
    registry.register_runner(|| Box::new(ScriptRunner::lua()));
    registry.register_runner(|| Box::new(ScriptRunner::node()));
}

/// Turn a tool lookup into a backend error.
fn require_tool(found: Option<PathBuf>, tool: &str) -> Result<PathBuf, BackendError> {
    found.ok_or_else(|| BackendError::ToolNotFound {
        tool: tool.to_string(),
    })
}

/// Run a tool with captured output and require a zero exit status.
fn run_checked(cmd: &ToolCommand) -> Result<Output, BackendError> {
    tracing::debug!("{}", cmd.command_line());

    let output = cmd.output().map_err(|source| BackendError::Spawn {
        program: cmd.program().display().to_string(),
        source,
    })?;

    if !output.status.success() {
        let mut stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if stderr.trim().is_empty() {
            stderr = String::from_utf8_lossy(&output.stdout).into_owned();
        }
        return Err(BackendError::Failed {
            command: cmd.command_line(),
            status: output.status.to_string(),
            stderr,
        });
    }

    Ok(output)
}

/// Run a program attached to the terminal; returns whether it succeeded.
fn run_interactive(cmd: &ToolCommand) -> Result<bool, BackendError> {
    tracing::debug!("{}", cmd.command_line());

    let status = cmd.status().map_err(|source| BackendError::Spawn {
        program: cmd.program().display().to_string(),
        source,
    })?;
    Ok(status.success())
}
