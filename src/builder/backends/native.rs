//! Native C/C++ compiler driver (cc, gcc, clang).

use std::path::{Path, PathBuf};

use crate::builder::backend::{BackendError, Compiler, SourceTask};
use crate::builder::progress::ProgressReporter;
use crate::core::config::{BuildMode, ProjectConfig};
use crate::core::descriptor::BackendDescriptor;
use crate::util::fs::ensure_parent_dir;
use crate::util::process::{locate_debugger, locate_tool, ToolCommand};

use super::{require_tool, run_checked, run_interactive};

/// Source language handled by a [`NativeCompiler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeLanguage {
    C,
    Cxx,
}

impl NativeLanguage {
    fn name(&self) -> &'static str {
        match self {
            NativeLanguage::C => "c",
            NativeLanguage::Cxx => "cpp",
        }
    }

    fn extensions(&self) -> &'static [&'static str] {
        match self {
            NativeLanguage::C => &[".c"],
            NativeLanguage::Cxx => &[".cpp", ".cc", ".cxx"],
        }
    }

    /// Environment override and fallback candidates.
    fn tool_candidates(&self) -> (&'static str, &'static [&'static str]) {
        match self {
            NativeLanguage::C => ("CC", &["cc", "gcc", "clang"]),
            NativeLanguage::Cxx => ("CXX", &["c++", "g++", "clang++"]),
        }
    }
}

/// Compiler backend driving the system C or C++ compiler.
#[derive(Debug, Clone)]
pub struct NativeCompiler {
    lang: NativeLanguage,
}

impl NativeCompiler {
    pub fn new(lang: NativeLanguage) -> Self {
        NativeCompiler { lang }
    }

    fn tool(&self) -> Result<PathBuf, BackendError> {
        let (env, candidates) = self.lang.tool_candidates();
        require_tool(locate_tool(Some(env), candidates), candidates[0])
    }
}

/// Optimization flags for a build mode.
pub(crate) fn mode_flags(mode: BuildMode) -> &'static [&'static str] {
    match mode {
        BuildMode::Debug => &["-g", "-O0"],
        BuildMode::Release => &["-O2", "-DNDEBUG"],
    }
}

impl Compiler for NativeCompiler {
    fn descriptor(&self) -> BackendDescriptor {
        BackendDescriptor::new(self.lang.name())
            .with_extensions(self.lang.extensions().iter().copied())
            .with_categories(["native", "system", "header-only"])
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

        let cmd = ToolCommand::new(self.tool()?)
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

        let cmd = ToolCommand::new(self.tool()?)
            .args(artifacts)
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
        let cmd = ToolCommand::new(project.join(artifact))
            .args(args)
            .current_dir(project)
            .input(stdin);
        run_interactive(&cmd)
    }

    fn debug(
        &self,
        project: &Path,
        artifact: &Path,
        stdin: Option<&[u8]>,
    ) -> Result<bool, BackendError> {
        let debugger = require_tool(locate_debugger(), "gdb")?;
        let cmd = ToolCommand::new(debugger)
            .arg(project.join(artifact))
            .current_dir(project)
            .input(stdin);
        run_interactive(&cmd)
    }
}
