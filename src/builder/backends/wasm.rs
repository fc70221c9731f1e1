//! WebAssembly backend (Emscripten).
//!
//! Objects keep the source tree's directory layout so that identically named
//! files in different directories never collide.

use std::path::{Path, PathBuf};

use crate::builder::backend::{ArtifactNaming, BackendError, Compiler, SourceTask};
use crate::builder::progress::ProgressReporter;
use crate::core::config::ProjectConfig;
use crate::core::descriptor::BackendDescriptor;
use crate::util::fs::ensure_parent_dir;
use crate::util::process::{locate_tool, ToolCommand};

use super::native::mode_flags;
use super::{require_tool, run_checked, run_interactive};

#[derive(Debug, Clone, Default)]
pub struct WasmCompiler;

impl WasmCompiler {
    pub fn new() -> Self {
        WasmCompiler
    }

    fn emcc(&self) -> Result<PathBuf, BackendError> {
        require_tool(locate_tool(Some("EMCC"), &["emcc"]), "emcc")
    }
}

impl Compiler for WasmCompiler {
    fn descriptor(&self) -> BackendDescriptor {
        BackendDescriptor::new("wasm")
            .with_extensions([".c", ".cpp", ".cc"])
            .with_categories(["wasm", "header-only"])
    }

    fn artifact_naming(&self) -> ArtifactNaming {
        ArtifactNaming::PerDirectory { extension: ".o" }
    }

    fn output_extension(&self) -> &str {
        ".wasm"
    }

    fn assemble(
        &self,
        project: &Path,
        task: &SourceTask,
        config: &ProjectConfig,
        _reporter: &dyn ProgressReporter,
    ) -> Result<PathBuf, BackendError> {
        ensure_parent_dir(&project.join(&task.artifact))
            .map_err(|e| BackendError::Message(e.to_string()))?;

        let cmd = ToolCommand::new(self.emcc()?)
            .arg("-c")
            .arg(&task.source)
            .arg("-o")
            .arg(&task.artifact)
            .args(mode_flags(config.build.mode))
            .args(&config.build.args)
            .current_dir(project);

        run_checked(&cmd)?;
        Ok(task.artifact.clone())
    }

    fn link(
        &self,
        project: &Path,
        artifacts: &[PathBuf],
        output: &Path,
        _config: &ProjectConfig,
    ) -> Result<(), BackendError> {
        ensure_parent_dir(&project.join(output))
            .map_err(|e| BackendError::Message(e.to_string()))?;

        let cmd = ToolCommand::new(self.emcc()?)
            .args(artifacts)
            .args(["-s", "STANDALONE_WASM"])
            .arg("-o")
            .arg(output)
            .current_dir(project);

        run_checked(&cmd).map(|_| ())
    }

    fn run(
        &self,
        project: &Path,
        artifact: &Path,
        args: &[String],
        stdin: Option<&[u8]>,
    ) -> Result<bool, BackendError> {
        let runtime = require_tool(locate_tool(None, &["wasmtime", "wasmer"]), "wasmtime")?;
        let cmd = ToolCommand::new(runtime)
            .arg(project.join(artifact))
            .args(args)
            .current_dir(project)
            .input(stdin);
        run_interactive(&cmd)
    }

    fn debug(
        &self,
        _project: &Path,
        _artifact: &Path,
        _stdin: Option<&[u8]>,
    ) -> Result<bool, BackendError> {
        Err(BackendError::Unsupported {
            backend: "wasm".to_string(),
            operation: "debugging".to_string(),
        })
    }
}
