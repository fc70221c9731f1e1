//! Project discovery.
//!
//! A project is the directory containing `Mosaic.toml`, found by searching
//! upward from the working directory.

use std::path::{Path, PathBuf};

use crate::core::config::{ProjectConfig, CONFIG_NAME};
use crate::error::BuildError;

/// A loaded project: its root directory and configuration.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    config: ProjectConfig,
}

impl Project {
    /// Load the project rooted at `root`.
    pub fn load(root: &Path) -> Result<Self, BuildError> {
        let config = ProjectConfig::load(&root.join(CONFIG_NAME))?;
        Ok(Project {
            root: root.to_path_buf(),
            config,
        })
    }

    /// Find and load the nearest project at or above `cwd`.
    pub fn discover(cwd: &Path) -> Result<Self, BuildError> {
        let manifest = find_config(cwd)?;
        let root = manifest.parent().unwrap_or(Path::new(".")).to_path_buf();
        Self::load(&root)
    }

    /// Create a project from an in-memory configuration.
    pub fn from_parts(root: impl Into<PathBuf>, config: ProjectConfig) -> Self {
        Project {
            root: root.into(),
            config,
        }
    }

    /// Project root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to Mosaic.toml.
    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_NAME)
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }
}

/// Find `Mosaic.toml` starting from `cwd` and searching upward.
pub fn find_config(cwd: &Path) -> Result<PathBuf, BuildError> {
    let mut current = cwd.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_NAME);
        if candidate.is_file() {
            return Ok(candidate);
        }
        if !current.pop() {
            return Err(BuildError::ConfigurationMissing {
                dir: cwd.to_path_buf(),
            });
        }
    }
}
