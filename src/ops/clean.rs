//! Implementation of `mosaic clean`.

use std::path::{Path, PathBuf};

use crate::core::config::ProjectConfig;
use crate::error::BuildError;
use crate::util::fs::{normalize_relative, remove_dir_all_if_exists};

/// Remove the object directory and the output directory.
///
/// A directory is only removed when it lies strictly inside the project and
/// does not contain the source tree, the test tree, or the main entry.
/// Returns the directories that were removed.
pub fn clean(root: &Path, config: &ProjectConfig) -> Result<Vec<PathBuf>, BuildError> {
    let build = &config.build;
    let mut removed = Vec::new();

    for dir in [&build.obj_dir, &build.output_dir] {
        let dir = normalize_relative(dir);
        if !is_removable(&dir, config) {
            tracing::warn!("not removing `{}`: it holds project sources", dir.display());
            continue;
        }

        let absolute = root.join(&dir);
        if absolute.exists() {
            tracing::debug!("removing {}", absolute.display());
            remove_dir_all_if_exists(&absolute)?;
            removed.push(dir);
        }
    }

    Ok(removed)
}

fn is_removable(dir: &Path, config: &ProjectConfig) -> bool {
    if dir.as_os_str().is_empty() || dir.is_absolute() {
        return false;
    }
    if dir.components().any(|c| matches!(c, std::path::Component::ParentDir)) {
        return false;
    }

    let protected = [
        normalize_relative(&config.build.source_dir),
        normalize_relative(&config.build.test_dir),
        normalize_relative(config.main()),
    ];
    !protected.iter().any(|p| p.starts_with(dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_clean_removes_build_dirs() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("build/obj")).unwrap();
        fs::write(tmp.path().join("build/obj/a.o"), "").unwrap();
        fs::write(tmp.path().join("build/demo"), "").unwrap();

        let config = ProjectConfig::new("demo", "src/main.c");
        let removed = clean(tmp.path(), &config).unwrap();

        assert_eq!(
            removed,
            vec![PathBuf::from("build/obj"), PathBuf::from("build")]
        );
        assert!(!tmp.path().join("build").exists());
    }

    #[test]
    fn test_clean_missing_dirs_is_noop() {
        let tmp = TempDir::new().unwrap();
        let config = ProjectConfig::new("demo", "src/main.c");
        assert!(clean(tmp.path(), &config).unwrap().is_empty());
    }

    #[test]
    fn test_clean_never_removes_sources() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("src")).unwrap();
        fs::write(tmp.path().join("src/main.c"), "int main(void){return 0;}").unwrap();

        let mut config = ProjectConfig::new("demo", "src/main.c");
        config.build.output_dir = PathBuf::from(".");
        config.build.obj_dir = PathBuf::from("src");

        assert!(clean(tmp.path(), &config).unwrap().is_empty());
        assert!(tmp.path().join("src/main.c").exists());
    }
}
