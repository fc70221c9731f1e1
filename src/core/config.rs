//! Mosaic.toml project configuration.
//!
//! The orchestrator only reads an in-memory [`ProjectConfig`]. Per-invocation
//! changes (forced link, injected arguments, a test entry) are expressed as
//! [`BuildOverrides`] and applied with [`ProjectConfig::with_overrides`],
//! which returns a new value. Nothing here writes to disk except
//! [`ProjectConfig::save`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BuildError;
use crate::util::fs;

/// Configuration file name.
pub const CONFIG_NAME: &str = "Mosaic.toml";

/// Build mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    #[default]
    Debug,
    Release,
}

impl BuildMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildMode::Debug => "debug",
            BuildMode::Release => "release",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" | "dev" => Ok(BuildMode::Debug),
            "release" => Ok(BuildMode::Release),
            _ => Err(format!(
                "invalid build mode '{}'; expected 'debug' or 'release'",
                s
            )),
        }
    }
}

/// The `[project]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSection {
    /// Project name, used for the linked output file
    pub name: String,

    /// Main entry, relative to the project root
    pub main: PathBuf,
}

/// The `[build]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    pub mode: BuildMode,

    /// Directory for the linked output
    pub output_dir: PathBuf,

    /// Directory for per-source artifacts
    pub obj_dir: PathBuf,

    /// Root of the source tree scanned in wildcard mode
    pub source_dir: PathBuf,

    /// Root of the test tree scanned for wildcard test builds
    pub test_dir: PathBuf,

    /// Collect every matching source instead of only `main`
    pub wildcard: bool,

    /// Link artifacts into a single output
    pub link: bool,

    /// Skip sources whose artifact is up to date
    pub incremental: bool,

    /// Maximum number of concurrent backend invocations
    pub jobs: usize,

    /// Backend name (case-insensitive)
    pub backend: String,

    /// Extra arguments passed to every backend invocation
    pub args: Vec<String>,

    /// Test entry used by `mosaic test`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_entry: Option<PathBuf>,
}

impl Default for BuildSettings {
    fn default() -> Self {
        BuildSettings {
            mode: BuildMode::Debug,
            output_dir: PathBuf::from("build"),
            obj_dir: PathBuf::from("build/obj"),
            source_dir: PathBuf::from("src"),
            test_dir: PathBuf::from("tests"),
            wildcard: false,
            link: true,
            incremental: true,
            jobs: 1,
            backend: String::new(),
            args: Vec::new(),
            test_entry: None,
        }
    }
}

impl BuildSettings {
    /// Effective job count; never less than one.
    pub fn jobs(&self) -> usize {
        self.jobs.max(1)
    }
}

/// A parsed Mosaic.toml.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub project: ProjectSection,

    #[serde(default)]
    pub build: BuildSettings,

    /// Dependency name -> version requirement
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,

    /// Development-only dependency name -> version requirement
    #[serde(default, rename = "dev-dependencies")]
    pub dev_dependencies: BTreeMap<String, String>,

    /// Dependency name -> category
    #[serde(default)]
    pub categories: BTreeMap<String, String>,
}

impl ProjectConfig {
    /// Create a configuration with default build settings.
    pub fn new(name: impl Into<String>, main: impl Into<PathBuf>) -> Self {
        ProjectConfig {
            project: ProjectSection {
                name: name.into(),
                main: main.into(),
            },
            build: BuildSettings::default(),
            dependencies: BTreeMap::new(),
            dev_dependencies: BTreeMap::new(),
            categories: BTreeMap::new(),
        }
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, BuildError> {
        if !path.exists() {
            return Err(BuildError::ConfigurationMissing {
                dir: path.parent().unwrap_or(Path::new(".")).to_path_buf(),
            });
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content).map_err(|message| BuildError::InvalidConfiguration {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Write this configuration to `path`.
    pub fn save(&self, path: &Path) -> Result<(), BuildError> {
        let content = toml::to_string_pretty(self).map_err(|e| BuildError::InvalidConfiguration {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        fs::write_string(path, &content)
    }

    /// Project name.
    pub fn name(&self) -> &str {
        &self.project.name
    }

    /// Main entry, relative to the project root.
    pub fn main(&self) -> &Path {
        &self.project.main
    }

    /// Declared category for a dependency.
    pub fn category(&self, dependency: &str) -> Option<&str> {
        self.categories.get(dependency).map(String::as_str)
    }

    /// Project-relative path of the linked output for a given extension.
    pub fn output_path(&self, extension: &str) -> PathBuf {
        self.build
            .output_dir
            .join(format!("{}{}", self.project.name, extension))
    }

    /// Compute the effective configuration for one invocation.
    pub fn with_overrides(&self, overrides: &BuildOverrides) -> ProjectConfig {
        let mut effective = self.clone();
        let build = &mut effective.build;

        if let Some(mode) = overrides.mode {
            build.mode = mode;
        }
        if let Some(jobs) = overrides.jobs {
            build.jobs = jobs;
        }
        if overrides.force_link {
            build.link = true;
        }
        if let Some(incremental) = overrides.incremental {
            build.incremental = incremental;
        }
        if let Some(ref backend) = overrides.backend {
            build.backend = backend.clone();
        }
        if let Some(ref entry) = overrides.test_entry {
            build.test_entry = Some(entry.clone());
        }
        build.args.extend(overrides.extra_args.iter().cloned());
        build.jobs = build.jobs();

        effective
    }
}

/// Per-invocation overrides. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOverrides {
    pub mode: Option<BuildMode>,
    pub jobs: Option<usize>,
    pub force_link: bool,
    pub incremental: Option<bool>,
    pub backend: Option<String>,
    pub test_entry: Option<PathBuf>,
    pub extra_args: Vec<String>,
}
