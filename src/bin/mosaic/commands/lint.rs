//! `mosaic lint` command

use anyhow::Result;

use super::{current_project, Global};
use crate::cli::LintArgs;
use mosaic::builder::BackendRegistry;
use mosaic::core::BuildOverrides;
use mosaic::error::BuildError;
use mosaic::ops::lint_project;
use mosaic::util::Status;

pub fn execute(args: LintArgs, global: &Global) -> Result<()> {
    let project = current_project()?;
    let registry = BackendRegistry::new();
    let shell = global.shell(false);

    let overrides = BuildOverrides {
        backend: args.backend,
        ..BuildOverrides::default()
    };
    let findings = lint_project(&registry, &project, &overrides)?;

    if findings.is_empty() {
        shell.status(Status::Finished, "no dependency warnings");
        return Ok(());
    }

    for finding in &findings {
        shell.diagnostic(&finding.to_diagnostic());
    }
    Err(BuildError::LintFailed {
        count: findings.len(),
    }
    .into())
}
