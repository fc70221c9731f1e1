//! `mosaic build` command

use anyhow::Result;

use super::{current_project, print_outcome, Global};
use crate::cli::{BuildArgs, MessageFormat};
use mosaic::builder::BackendRegistry;
use mosaic::core::BuildOverrides;
use mosaic::ops::{build, BuildOptions};

pub fn execute(args: BuildArgs, global: &Global) -> Result<()> {
    let project = current_project()?;
    let registry = BackendRegistry::new();
    let shell = global.shell(args.message_format == MessageFormat::Json);

    let opts = BuildOptions {
        clean: args.clean,
        overrides: BuildOverrides {
            mode: args.flags.mode(),
            jobs: args.flags.jobs,
            force_link: args.link,
            incremental: args.flags.no_incremental.then_some(false),
            backend: args.flags.backend.clone(),
            test_entry: None,
            extra_args: args.args,
        },
    };

    let reporter = shell.reporter();
    let outcome = build(&registry, &project, &opts, reporter.as_ref())?;

    let mode = opts
        .overrides
        .mode
        .unwrap_or(project.config().build.mode);
    print_outcome(&shell, &outcome, mode.as_str());
    Ok(())
}
