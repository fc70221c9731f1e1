//! On-disk project fixtures.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::config::{ProjectConfig, CONFIG_NAME};
use crate::core::project::Project;

/// A project directory to be written into a temp dir.
#[derive(Debug, Clone)]
pub struct ProjectFixture {
    pub config: ProjectConfig,
    /// Files relative to the project root
    pub files: BTreeMap<PathBuf, String>,
}

impl ProjectFixture {
    /// A project whose `main` is `src/main.c`.
    pub fn new(name: impl Into<String>) -> Self {
        ProjectFixture {
            config: ProjectConfig::new(name, "src/main.c"),
            files: BTreeMap::new(),
        }
    }

    /// Adjust the configuration.
    pub fn configure(mut self, f: impl FnOnce(&mut ProjectConfig)) -> Self {
        f(&mut self.config);
        self
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// Write `Mosaic.toml` and all files under `root`.
    pub fn write_to(&self, root: &Path) -> std::io::Result<Project> {
        std::fs::create_dir_all(root)?;
        self.config
            .save(&root.join(CONFIG_NAME))
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

        for (rel, content) in &self.files {
            let path = root.join(rel);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)?;
        }

        Ok(Project::from_parts(root, self.config.clone()))
    }
}
