//! Warnings rendered for the terminal.
//!
//! Rendering follows rustc's layout:
//!
//! ```text
//! warning[missing-category]: dependency `zlib` has no category
//!   --> Mosaic.toml
//!   = note: backend `c` supports: native, system
//!   = help: add an entry under [categories] in Mosaic.toml
//! ```

use std::fmt::{self, Write};
use std::path::PathBuf;

/// Help texts shared between diagnostics.
pub mod suggestions {
    pub const DECLARE_CATEGORY: &str = "add an entry under [categories] in Mosaic.toml";

    pub const CHANGE_BACKEND: &str =
        "choose a backend that supports this category, or drop the dependency";
}

const YELLOW: &str = "\x1b[1;33m";
const BLUE: &str = "\x1b[1;34m";
const RESET: &str = "\x1b[0m";

/// A warning with optional code, location, notes and help.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    /// Short stable identifier shown in brackets
    pub code: Option<&'static str>,
    pub location: Option<PathBuf>,
    pub notes: Vec<String>,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            code: None,
            location: None,
            notes: Vec::new(),
            help: None,
        }
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render, with ANSI colors when `color` is set. No trailing newline.
    pub fn format(&self, color: bool) -> String {
        let paint = |code: &str, text: &str| {
            if color {
                format!("{}{}{}", code, text, RESET)
            } else {
                text.to_string()
            }
        };

        let head = match self.code {
            Some(code) => format!("warning[{}]", code),
            None => "warning".to_string(),
        };
        let mut out = format!("{}: {}", paint(YELLOW, &head), self.message);

        // Writing into a String cannot fail.
        if let Some(ref path) = self.location {
            let _ = write!(out, "\n  {} {}", paint(BLUE, "-->"), path.display());
        }
        for note in &self.notes {
            let _ = write!(out, "\n  {} note: {}", paint(BLUE, "="), note);
        }
        if let Some(ref help) = self.help {
            let _ = write!(out, "\n  {} help: {}", paint(BLUE, "="), help);
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(false))
    }
}
