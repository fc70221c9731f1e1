//! Status output for the command line.
//!
//! Human mode prints right-aligned cargo-style status lines on stderr.
//! JSON mode prints nothing here; build events carry the information.

use std::fmt::Display;
use std::io::{self, IsTerminal};

use crate::builder::progress::{ConsoleReporter, JsonReporter, ProgressReporter};
use crate::util::diagnostic::Diagnostic;

/// Semantic status of an output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Added,
    Created,
    Finished,
    Removed,
    Updated,
    Fresh,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Added => "Added",
            Status::Created => "Created",
            Status::Finished => "Finished",
            Status::Removed => "Removed",
            Status::Updated => "Updated",
            Status::Fresh => "Fresh",
        }
    }

    fn color_code(&self) -> &'static str {
        match self {
            Status::Added
            | Status::Created
            | Status::Finished
            | Status::Removed
            | Status::Updated => "\x1b[1;32m",
            Status::Fresh => "\x1b[1;36m",
        }
    }
}

/// Output settings derived from global flags.
#[derive(Debug, Clone)]
pub struct Shell {
    json: bool,
    verbose: bool,
    use_color: bool,
}

impl Shell {
    pub fn from_flags(verbose: bool, no_color: bool, json: bool) -> Self {
        Shell {
            json,
            verbose,
            use_color: !no_color && !json && io::stderr().is_terminal(),
        }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// Progress reporter matching this shell's mode.
    pub fn reporter(&self) -> Box<dyn ProgressReporter> {
        if self.json {
            Box::new(JsonReporter)
        } else {
            Box::new(ConsoleReporter::new(self.verbose))
        }
    }

    /// Print `{status:>12} {message}` to stderr.
    pub fn status(&self, status: Status, message: impl Display) {
        if self.json {
            return;
        }
        eprintln!("{}", self.format_status(status, &message.to_string()));
    }

    /// Print a diagnostic to stderr.
    pub fn diagnostic(&self, diagnostic: &Diagnostic) {
        if self.json {
            return;
        }
        eprintln!("{}", diagnostic.format(self.use_color));
    }

    fn format_status(&self, status: Status, message: &str) -> String {
        if self.use_color {
            format!(
                "{}{:>12}\x1b[0m {}",
                status.color_code(),
                status.as_str(),
                message
            )
        } else {
            format!("{:>12} {}", status.as_str(), message)
        }
    }
}
