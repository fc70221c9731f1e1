//! Implementation of `mosaic init`.

use std::path::{Path, PathBuf};

use crate::builder::registry::{normalize_name, BackendRegistry};
use crate::core::config::{ProjectConfig, CONFIG_NAME};
use crate::error::BuildError;
use crate::util::fs;

/// Options for creating a project.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Project name; defaults to the directory name
    pub name: Option<String>,

    /// Backend name; empty selects the default backend
    pub backend: String,
}

/// Write Mosaic.toml and a starter main entry into `dir`.
///
/// Returns the path of the new configuration file. An existing main entry is
/// left untouched.
pub fn init_project(
    registry: &BackendRegistry,
    dir: &Path,
    opts: &InitOptions,
) -> Result<PathBuf, BuildError> {
    let config_path = dir.join(CONFIG_NAME);
    if config_path.exists() {
        return Err(BuildError::ProjectExists { path: config_path });
    }

    let key = normalize_name(&opts.backend);
    let descriptor = registry
        .descriptor(&key)
        .ok_or_else(|| BuildError::UnknownBackend {
            name: opts.backend.clone(),
            available: registry.names(),
        })?;

    let name = match opts.name {
        Some(ref name) => name.clone(),
        None => dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "app".to_string()),
    };

    let extension = descriptor
        .extensions()
        .first()
        .cloned()
        .unwrap_or_default();
    let main = PathBuf::from("src").join(format!("main{}", extension));

    let mut config = ProjectConfig::new(name, main.clone());
    config.build.backend = key.clone();

    fs::ensure_dir(dir)?;
    config.save(&config_path)?;

    let main_path = dir.join(&main);
    if !main_path.exists() {
        fs::write_string(&main_path, starter_source(&key))?;
    }

    tracing::debug!("created {} for backend `{}`", config_path.display(), key);
    Ok(config_path)
}

fn starter_source(backend: &str) -> &'static str {
    match backend {
        "c" | "wasm" => "#include <stdio.h>\n\nint main(void) {\n    printf(\"Hello, world!\\n\");\n    return 0;\n}\n",
        "cpp" => "#include <iostream>\n\nint main() {\n    std::cout << \"Hello, world!\" << std::endl;\n    return 0;\n}\n",
        "python" => "print(\"Hello, world!\")\n",
        "lua" => "print(\"Hello, world!\")\n",
        "node" => "console.log(\"Hello, world!\");\n",
        _ => "",
    }
}
