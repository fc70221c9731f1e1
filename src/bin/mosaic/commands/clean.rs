//! `mosaic clean` command

use anyhow::Result;

use super::{current_project, Global};
use crate::cli::CleanArgs;
use mosaic::ops::clean;
use mosaic::util::Status;

pub fn execute(_args: CleanArgs, global: &Global) -> Result<()> {
    let project = current_project()?;
    let shell = global.shell(false);

    let removed = clean(project.root(), project.config())?;
    for dir in &removed {
        shell.status(Status::Removed, dir.display());
    }
    Ok(())
}
