//! Command implementations

pub mod add;
pub mod backends;
pub mod build;
pub mod clean;
pub mod completions;
pub mod init;
pub mod lint;
pub mod run;

use anyhow::{Context, Result};
use mosaic::core::Project;
use mosaic::ops::BuildOutcome;
use mosaic::util::{Shell, Status};

/// Global flags shared by every command.
pub struct Global {
    pub verbose: bool,
    pub no_color: bool,
}

impl Global {
    pub fn shell(&self, json: bool) -> Shell {
        Shell::from_flags(self.verbose, self.no_color, json)
    }
}

/// Find the project enclosing the working directory.
pub fn current_project() -> Result<Project> {
    let cwd = std::env::current_dir().context("failed to read the working directory")?;
    Ok(Project::discover(&cwd)?)
}

/// Print the closing status lines of a build.
pub fn print_outcome(shell: &Shell, outcome: &BuildOutcome, mode: &str) {
    if outcome.compiled == 0 && outcome.skipped > 0 {
        shell.status(Status::Fresh, format!("{} source(s) up to date", outcome.skipped));
    }
    shell.status(
        Status::Finished,
        format!(
            "{} [{}] in {:.2}s",
            mode,
            outcome.backend,
            outcome.duration.as_secs_f64()
        ),
    );
    if let Some(ref output) = outcome.output {
        shell.status(Status::Finished, format!("-> {}", output.display()));
    }
}
