//! Implementation of `mosaic add`.
//!
//! Edits Mosaic.toml in place with `toml_edit` so comments and layout
//! survive. No registry is contacted; the version requirement is only
//! checked for syntax.

use std::path::Path;

use semver::VersionReq;
use toml_edit::{value, DocumentMut, Item, Table};

use crate::error::BuildError;
use crate::util::fs;

/// Options for adding a dependency.
#[derive(Debug, Clone, Default)]
pub struct AddOptions {
    /// Dependency name
    pub name: String,

    /// Version requirement; `*` when absent
    pub version: Option<String>,

    /// Category recorded under `[categories]`
    pub category: Option<String>,

    /// Add to `[dev-dependencies]`
    pub dev: bool,
}

impl AddOptions {
    /// Parse `name` or `name@version`.
    pub fn from_spec(spec: &str) -> Result<Self, BuildError> {
        let (name, version) = match spec.split_once('@') {
            Some((name, version)) => (name.trim(), Some(version.trim())),
            None => (spec.trim(), None),
        };

        if name.is_empty() {
            return Err(BuildError::InvalidDependency {
                spec: spec.to_string(),
                message: "missing dependency name".to_string(),
            });
        }
        if version == Some("") {
            return Err(BuildError::InvalidDependency {
                spec: spec.to_string(),
                message: "empty version after `@`".to_string(),
            });
        }

        Ok(AddOptions {
            name: name.to_string(),
            version: version.map(str::to_string),
            ..AddOptions::default()
        })
    }
}

/// What `add_dependency` changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddResult {
    pub name: String,
    pub requirement: String,
    /// `dependencies` or `dev-dependencies`
    pub table: &'static str,
    /// The dependency was already declared and has been updated
    pub replaced: bool,
}

/// Add or update a dependency in Mosaic.toml.
pub fn add_dependency(config_path: &Path, opts: &AddOptions) -> Result<AddResult, BuildError> {
    let requirement = opts.version.clone().unwrap_or_else(|| "*".to_string());
    VersionReq::parse(&requirement).map_err(|e| BuildError::InvalidDependency {
        spec: format!("{}@{}", opts.name, requirement),
        message: e.to_string(),
    })?;

    if !config_path.exists() {
        return Err(BuildError::ConfigurationMissing {
            dir: config_path.parent().unwrap_or(Path::new(".")).to_path_buf(),
        });
    }

    let content = fs::read_to_string(config_path)?;
    let mut doc: DocumentMut = content
        .parse()
        .map_err(|e: toml_edit::TomlError| BuildError::InvalidConfiguration {
            path: config_path.to_path_buf(),
            message: e.to_string(),
        })?;

    let table = if opts.dev {
        "dev-dependencies"
    } else {
        "dependencies"
    };
    let deps = ensure_table(&mut doc, table, config_path)?;
    let replaced = deps.contains_key(&opts.name);
    deps[opts.name.as_str()] = value(requirement.as_str());

    if let Some(ref category) = opts.category {
        let categories = ensure_table(&mut doc, "categories", config_path)?;
        categories[opts.name.as_str()] = value(category.as_str());
    }

    fs::write_string(config_path, &doc.to_string())?;
    tracing::debug!("wrote {}", config_path.display());

    Ok(AddResult {
        name: opts.name.clone(),
        requirement,
        table,
        replaced,
    })
}

fn ensure_table<'a>(
    doc: &'a mut DocumentMut,
    key: &str,
    config_path: &Path,
) -> Result<&'a mut Table, BuildError> {
    if !doc.contains_key(key) {
        doc[key] = Item::Table(Table::new());
    }
    doc[key]
        .as_table_mut()
        .ok_or_else(|| BuildError::InvalidConfiguration {
            path: config_path.to_path_buf(),
            message: format!("`{}` is not a table", key),
        })
}
