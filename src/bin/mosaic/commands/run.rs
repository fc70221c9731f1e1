//! `mosaic run` command

use anyhow::Result;

use super::{current_project, Global};
use crate::cli::RunArgs;
use mosaic::builder::BackendRegistry;
use mosaic::core::{BuildMode, BuildOverrides};
use mosaic::ops::{run, BuildOptions, RunOptions};

pub fn execute(args: RunArgs, global: &Global) -> Result<()> {
    let project = current_project()?;
    let registry = BackendRegistry::new();
    let shell = global.shell(false);

    let opts = RunOptions {
        build: BuildOptions {
            clean: false,
            overrides: BuildOverrides {
                mode: args.release.then_some(BuildMode::Release),
                jobs: args.jobs,
                backend: args.backend,
                ..BuildOverrides::default()
            },
        },
        debug: args.debug,
        args: args.args,
        stdin: None,
    };

    let reporter = shell.reporter();
    run(&registry, &project, &opts, reporter.as_ref())?;
    Ok(())
}
