//! `mosaic add` command

use anyhow::Result;

use super::{current_project, Global};
use crate::cli::AddArgs;
use mosaic::ops::{add_dependency, AddOptions};
use mosaic::util::Status;

pub fn execute(args: AddArgs, global: &Global) -> Result<()> {
    let project = current_project()?;
    let shell = global.shell(false);

    let opts = AddOptions {
        category: args.category,
        dev: args.dev,
        ..AddOptions::from_spec(&args.spec)?
    };
    let result = add_dependency(&project.config_path(), &opts)?;

    let status = if result.replaced {
        Status::Updated
    } else {
        Status::Added
    };
    shell.status(
        status,
        format!(
            "{} = \"{}\" in [{}]",
            result.name, result.requirement, result.table
        ),
    );
    Ok(())
}
