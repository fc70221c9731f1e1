//! `mosaic init` command

use anyhow::{Context, Result};

use super::Global;
use crate::cli::InitArgs;
use mosaic::builder::BackendRegistry;
use mosaic::ops::{init_project, InitOptions};
use mosaic::util::Status;

pub fn execute(args: InitArgs, global: &Global) -> Result<()> {
    let dir = match args.path {
        Some(path) => path,
        None => std::env::current_dir().context("failed to read the working directory")?,
    };
    let shell = global.shell(false);

    let opts = InitOptions {
        name: args.name,
        backend: args.backend,
    };
    let config_path = init_project(&BackendRegistry::new(), &dir, &opts)?;

    shell.status(Status::Created, config_path.display());
    Ok(())
}
