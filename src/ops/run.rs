//! Implementation of `mosaic run` and `mosaic test`.

use std::path::{Path, PathBuf};

use crate::builder::backend::{Backend, BackendError};
use crate::builder::progress::ProgressReporter;
use crate::builder::registry::BackendRegistry;
use crate::core::project::Project;
use crate::error::BuildError;
use crate::ops::build::{build, BuildOptions, BuildOutcome};

/// Options for the run command.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub build: BuildOptions,

    /// Launch under a debugger instead of running directly
    pub debug: bool,

    /// Arguments passed to the program
    pub args: Vec<String>,

    /// Data fed to the program's standard input
    pub stdin: Option<Vec<u8>>,
}

/// Options for the test command.
#[derive(Debug, Clone, Default)]
pub struct TestOptions {
    /// Test entry; falls back to `build.test_entry`
    pub entry: Option<PathBuf>,
    pub jobs: Option<usize>,
    /// Extra backend arguments for this build only
    pub args: Vec<String>,
}

/// Build the project with linking forced, then execute it.
pub fn run(
    registry: &BackendRegistry,
    project: &Project,
    opts: &RunOptions,
    reporter: &dyn ProgressReporter,
) -> Result<BuildOutcome, BuildError> {
    let mut build_opts = opts.build.clone();
    build_opts.overrides.force_link = true;

    let outcome = build(registry, project, &build_opts, reporter)?;
    let root = project.root();
    let stdin = opts.stdin.as_deref();

    match registry.resolve(&outcome.backend)? {
        Backend::Compiler(compiler) => {
            let output = outcome.output.clone().ok_or(BuildError::NothingToRun)?;
            if opts.debug {
                tracing::info!("debugging {}", output.display());
                let result = compiler.debug(root, &output, stdin);
                check_debug(&output, result)?;
            } else {
                tracing::info!("running {}", output.display());
                let result = compiler.run(root, &output, &opts.args, stdin);
                check_run(&output, result)?;
            }
        }
        Backend::Runner(runner) => {
            let entry = build_opts
                .overrides
                .test_entry
                .clone()
                .unwrap_or_else(|| project.config().main().to_path_buf());
            if !root.join(&entry).is_file() {
                return Err(BuildError::NothingToRun);
            }
            if opts.debug {
                check_debug(&entry, runner.debug(root, &entry, stdin))?;
            } else {
                tracing::info!("running {}", entry.display());
                check_run(&entry, runner.run(root, &entry, &opts.args, stdin))?;
            }
        }
    }

    Ok(outcome)
}

/// Build the test entry with linking forced and run it.
pub fn test(
    registry: &BackendRegistry,
    project: &Project,
    opts: &TestOptions,
    reporter: &dyn ProgressReporter,
) -> Result<BuildOutcome, BuildError> {
    let entry = opts
        .entry
        .clone()
        .or_else(|| project.config().build.test_entry.clone())
        .ok_or(BuildError::NoTestEntry)?;

    let mut run_opts = RunOptions::default();
    run_opts.build.overrides.test_entry = Some(entry);
    run_opts.build.overrides.jobs = opts.jobs;
    run_opts.build.overrides.extra_args = opts.args.clone();

    run(registry, project, &run_opts, reporter)
}

fn check_run(program: &Path, result: Result<bool, BackendError>) -> Result<(), BuildError> {
    match result {
        Ok(true) => Ok(()),
        Ok(false) => Err(BuildError::Run {
            program: program.display().to_string(),
            message: "exited unsuccessfully".to_string(),
        }),
        Err(e) => Err(BuildError::Run {
            program: program.display().to_string(),
            message: e.to_string(),
        }),
    }
}

fn check_debug(program: &Path, result: Result<bool, BackendError>) -> Result<(), BuildError> {
    match result {
        Ok(true) => Ok(()),
        Ok(false) => Err(BuildError::Debug {
            program: program.display().to_string(),
            message: "debugger exited unsuccessfully".to_string(),
        }),
        Err(e) => Err(BuildError::Debug {
            program: program.display().to_string(),
            message: e.to_string(),
        }),
    }
}
