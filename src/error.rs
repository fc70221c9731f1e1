//! Build error taxonomy.
//!
//! Backend failures are carried as values (`AssembleError`, `BackendError`)
//! so the scheduler can keep collecting sibling results. `BuildError` is
//! what an orchestrator operation ultimately returns to its caller.

use std::fmt;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Exit code for a successful command.
pub const EXIT_SUCCESS: i32 = 0;
/// Generic failure, including an explicitly requested lint that found problems.
pub const EXIT_FAILURE: i32 = 1;
/// No project configuration was found.
pub const EXIT_MISSING_CONFIG: i32 = 2;
/// Build, assemble, or link failure.
pub const EXIT_BUILD_FAILURE: i32 = 3;
/// The debugger could not be launched or reported failure.
pub const EXIT_DEBUG_FAILURE: i32 = 4;
/// The built program could not be run or exited unsuccessfully.
pub const EXIT_RUN_FAILURE: i32 = 5;

/// Failure to assemble a single source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembleError {
    /// Project-relative source path
    pub source: PathBuf,
    /// Backend error text
    pub message: String,
}

impl AssembleError {
    pub fn new(source: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        AssembleError {
            source: source.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for AssembleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to assemble {}\n{}",
            self.source.display(),
            self.message.trim_end()
        )
    }
}

/// Errors produced by the build orchestrator.
#[derive(Debug, Error, Diagnostic)]
pub enum BuildError {
    #[error("could not find `Mosaic.toml` in `{}` or any parent directory", .dir.display())]
    #[diagnostic(code(mosaic::config::missing), help("run `mosaic` from a directory containing Mosaic.toml"))]
    ConfigurationMissing { dir: PathBuf },

    #[error("failed to parse {}: {message}", .path.display())]
    #[diagnostic(code(mosaic::config::invalid))]
    InvalidConfiguration { path: PathBuf, message: String },

    #[error("unknown backend `{name}` (available: {})", .available.join(", "))]
    #[diagnostic(
        code(mosaic::backend::unknown),
        help("run `mosaic backends` to list registered backends")
    )]
    UnknownBackend { name: String, available: Vec<String> },

    #[error("no sources found for backend `{backend}` (extensions: {})", .extensions.join(", "))]
    #[diagnostic(
        code(mosaic::build::no_sources),
        help("check `project.main`, or enable `build.wildcard` to scan the source directory")
    )]
    NoSourcesFound {
        backend: String,
        extensions: Vec<String>,
    },

    #[error("{} all produce `{}`", format_paths(.sources), .artifact.display())]
    #[diagnostic(
        code(mosaic::build::artifact_collision),
        help("rename one of the sources, or use a backend that keeps the directory layout")
    )]
    ArtifactCollision {
        artifact: PathBuf,
        sources: Vec<PathBuf>,
    },

    #[error("{0}")]
    #[diagnostic(code(mosaic::build::assemble), help("run `mosaic build --verbose` for the full command lines"))]
    Assemble(AssembleError),

    #[error("{} source file(s) failed to assemble\n{}", .errors.len(), format_errors(.errors))]
    #[diagnostic(code(mosaic::build::assemble), help("run `mosaic build --verbose` for the full command lines"))]
    AggregateAssemble { errors: Vec<AssembleError> },

    #[error("linking failed for {}\n{}", .output.display(), .message.trim_end())]
    #[diagnostic(code(mosaic::build::link))]
    Link { output: PathBuf, message: String },

    #[error("dependency lint reported {count} warning(s)")]
    #[diagnostic(code(mosaic::lint::failed), help("declare a category for each dependency under [categories]"))]
    LintFailed { count: usize },

    #[error("nothing to run: the build produced no linked output")]
    #[diagnostic(code(mosaic::run::nothing), help("set `build.link = true` or check the backend produces an executable"))]
    NothingToRun,

    #[error("no test entry configured")]
    #[diagnostic(code(mosaic::test::no_entry), help("set `build.test_entry` or pass `--entry <path>`"))]
    NoTestEntry,

    #[error("`{program}` failed: {message}")]
    #[diagnostic(code(mosaic::run::failed))]
    Run { program: String, message: String },

    #[error("debugging `{program}` failed: {message}")]
    #[diagnostic(code(mosaic::debug::failed))]
    Debug { program: String, message: String },

    #[error("invalid dependency `{spec}`: {message}")]
    #[diagnostic(code(mosaic::add::invalid), help("use `name` or `name@<version requirement>`, e.g. `zlib@1.2`"))]
    InvalidDependency { spec: String, message: String },

    #[error("`{}` already exists", .path.display())]
    #[diagnostic(code(mosaic::init::exists))]
    ProjectExists { path: PathBuf },

    #[error("failed to start worker pool: {0}")]
    #[diagnostic(code(mosaic::build::pool))]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("I/O error at {}: {source}", .path.display())]
    #[diagnostic(code(mosaic::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    /// Wrap an I/O error with the path it occurred at.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            BuildError::ConfigurationMissing { .. } => EXIT_MISSING_CONFIG,
            BuildError::UnknownBackend { .. }
            | BuildError::NoSourcesFound { .. }
            | BuildError::ArtifactCollision { .. }
            | BuildError::Assemble(_)
            | BuildError::AggregateAssemble { .. }
            | BuildError::Link { .. }
            | BuildError::WorkerPool(_) => EXIT_BUILD_FAILURE,
            BuildError::Debug { .. } => EXIT_DEBUG_FAILURE,
            BuildError::Run { .. } | BuildError::NothingToRun => EXIT_RUN_FAILURE,
            BuildError::InvalidConfiguration { .. }
            | BuildError::LintFailed { .. }
            | BuildError::NoTestEntry
            | BuildError::InvalidDependency { .. }
            | BuildError::ProjectExists { .. }
            | BuildError::Io { .. } => EXIT_FAILURE,
        }
    }

    /// Individual assemble failures carried by this error, if any.
    pub fn assemble_errors(&self) -> &[AssembleError] {
        match self {
            BuildError::Assemble(e) => std::slice::from_ref(e),
            BuildError::AggregateAssemble { errors } => errors,
            _ => &[],
        }
    }
}

fn format_errors(errors: &[AssembleError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("`{}`", p.display()))
        .collect::<Vec<_>>()
        .join(", ")
}
