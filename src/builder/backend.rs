//! Compiler and runner plugin contract.
//!
//! A backend is either a [`Compiler`] (assembles sources into artifacts and
//! links them) or a [`Runner`] (executes interpreted sources directly).
//! Backends report failures as [`BackendError`] values; they never panic
//! on a failed tool invocation.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::builder::progress::ProgressReporter;
use crate::core::config::{BuildSettings, ProjectConfig};
use crate::core::descriptor::BackendDescriptor;
use crate::util::fs::normalize_relative;

/// Error reported by a backend operation.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("`{tool}` was not found on PATH")]
    ToolNotFound { tool: String },

    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` exited with {status}\n{stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("backend `{backend}` does not support {operation}")]
    Unsupported { backend: String, operation: String },

    #[error("{0}")]
    Message(String),
}

/// One source scheduled for assembly.
///
/// Created fresh for every build invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTask {
    /// Position in the source selection; used to restore link order
    pub index: usize,
    /// Source path relative to the project root
    pub source: PathBuf,
    /// Expected artifact path relative to the project root
    pub artifact: PathBuf,
    /// Absolute source path
    pub absolute: PathBuf,
}

impl SourceTask {
    pub fn new(index: usize, root: &Path, source: PathBuf, artifact: PathBuf) -> Self {
        SourceTask {
            index,
            absolute: root.join(&source),
            source,
            artifact,
        }
    }

    /// Display name used for progress reporting.
    pub fn display_name(&self) -> String {
        self.source.display().to_string()
    }
}

/// Signature of a plugin-provided artifact path function.
pub type ArtifactPathFn = fn(&Path, &BuildSettings) -> PathBuf;

/// How a backend names the artifact produced for a source file.
#[derive(Debug, Clone, Copy)]
pub enum ArtifactNaming {
    /// `src/net/io.c` -> `<obj>/net_io.o`
    Flatten { extension: &'static str },

    /// `src/net/io.c` -> `<obj>/net/io.o`
    PerDirectory { extension: &'static str },

    /// Backend-specific convention
    Custom(ArtifactPathFn),
}

impl ArtifactNaming {
    /// Project-relative artifact path for a project-relative source.
    pub fn artifact_path(&self, source: &Path, settings: &BuildSettings) -> PathBuf {
        match *self {
            ArtifactNaming::Flatten { extension } => {
                let relative = strip_source_dir(source, &settings.source_dir);
                let mut flat = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("_");
                if let Some(ext) = relative.extension() {
                    let ext_len = ext.to_string_lossy().len() + 1;
                    flat.truncate(flat.len() - ext_len);
                }
                flat.push_str(extension);
                settings.obj_dir.join(flat)
            }
            ArtifactNaming::PerDirectory { extension } => {
                let relative = strip_source_dir(source, &settings.source_dir);
                let mut artifact = settings.obj_dir.join(relative);
                artifact.set_extension(extension.trim_start_matches('.'));
                artifact
            }
            ArtifactNaming::Custom(f) => f(source, settings),
        }
    }
}

fn strip_source_dir(source: &Path, source_dir: &Path) -> PathBuf {
    let source = normalize_relative(source);
    let source_dir = normalize_relative(source_dir);
    match source.strip_prefix(&source_dir) {
        Ok(rest) if !rest.as_os_str().is_empty() => rest.to_path_buf(),
        _ => source,
    }
}

/// A backend that assembles sources and links artifacts.
pub trait Compiler: Send + Sync {
    /// Name, extensions, and supported dependency categories.
    fn descriptor(&self) -> BackendDescriptor;

    /// Artifact naming convention.
    fn artifact_naming(&self) -> ArtifactNaming {
        ArtifactNaming::Flatten { extension: ".o" }
    }

    /// Extension appended to the project name for the linked output.
    fn output_extension(&self) -> &str {
        ""
    }

    /// Assemble one source, returning the project-relative artifact path.
    fn assemble(
        &self,
        project: &Path,
        task: &SourceTask,
        config: &ProjectConfig,
        reporter: &dyn ProgressReporter,
    ) -> Result<PathBuf, BackendError>;

    /// Link artifacts into `output`. Paths are project-relative.
    fn link(
        &self,
        project: &Path,
        artifacts: &[PathBuf],
        output: &Path,
        config: &ProjectConfig,
    ) -> Result<(), BackendError>;

    /// Execute a linked output. Returns whether it exited successfully.
    fn run(
        &self,
        project: &Path,
        artifact: &Path,
        args: &[String],
        stdin: Option<&[u8]>,
    ) -> Result<bool, BackendError>;

    /// Execute a linked output under a debugger.
    fn debug(
        &self,
        project: &Path,
        artifact: &Path,
        stdin: Option<&[u8]>,
    ) -> Result<bool, BackendError>;
}

/// A backend for interpreted sources. Runner builds only validate sources.
pub trait Runner: Send + Sync {
    fn descriptor(&self) -> BackendDescriptor;

    /// Execute a source file. Returns whether it exited successfully.
    fn run(
        &self,
        project: &Path,
        source: &Path,
        args: &[String],
        stdin: Option<&[u8]>,
    ) -> Result<bool, BackendError>;

    /// Execute a source file under the interpreter's debugger.
    fn debug(&self, project: &Path, source: &Path, stdin: Option<&[u8]>)
        -> Result<bool, BackendError>;
}

/// A resolved backend instance.
pub enum Backend {
    Compiler(Box<dyn Compiler>),
    Runner(Box<dyn Runner>),
}

impl Backend {
    pub fn descriptor(&self) -> BackendDescriptor {
        match self {
            Backend::Compiler(c) => c.descriptor(),
            Backend::Runner(r) => r.descriptor(),
        }
    }

    pub fn is_compiler(&self) -> bool {
        matches!(self, Backend::Compiler(_))
    }
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.is_compiler() { "Compiler" } else { "Runner" };
        write!(f, "{}({})", kind, self.descriptor().name())
    }
}
