//! Build event types for JSON output.
//!
//! These events are emitted one per line when using `--message-format json`.
//!
//! # Stability
//!
//! New fields may be added, but existing fields should not be removed or renamed.

use std::path::PathBuf;

use serde::Serialize;

/// A build event emitted during the build process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason")]
pub enum BuildEvent {
    /// Build started.
    #[serde(rename = "build-started")]
    BuildStarted {
        /// Project name
        project: String,
        /// Resolved backend name
        backend: String,
        /// Build mode ("debug" or "release")
        mode: String,
        /// Maximum concurrent jobs
        jobs: usize,
    },

    /// A source file was dispatched to the backend.
    #[serde(rename = "file-started")]
    FileStarted { file: String },

    /// Progress update.
    #[serde(rename = "build-progress")]
    Progress {
        file: String,
        /// Completed share of the scheduled files, 0-100
        percent: f64,
    },

    /// A source file finished assembling.
    #[serde(rename = "file-finished")]
    FileFinished { file: String, elapsed_ms: u64 },

    /// A dependency lint warning.
    #[serde(rename = "lint-warning")]
    LintWarning { dependency: String, message: String },

    /// Build completed (success or failure).
    #[serde(rename = "build-finished")]
    BuildFinished {
        success: bool,
        duration_ms: u64,
        /// Artifacts in link order
        artifacts: Vec<PathBuf>,
        /// Linked output, if linking ran
        #[serde(skip_serializing_if = "Option::is_none")]
        output: Option<PathBuf>,
        /// Error messages, empty on success
        #[serde(skip_serializing_if = "Vec::is_empty")]
        errors: Vec<String>,
    },
}

impl BuildEvent {
    /// Serialize this event to a single-line JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
