//! Source file selection.
//!
//! Produces the ordered list of project-relative sources to build. The
//! order is stable for a given filesystem state: directory traversal is
//! sorted by file name.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::core::config::ProjectConfig;
use crate::util::fs::{collect_files, normalize_relative, paths_eq_ignore_case};

/// Chooses which sources a build compiles.
pub struct SourceSelector<'a> {
    root: &'a Path,
    config: &'a ProjectConfig,
    extensions: &'a [String],
}

impl<'a> SourceSelector<'a> {
    pub fn new(root: &'a Path, config: &'a ProjectConfig, extensions: &'a [String]) -> Self {
        SourceSelector {
            root,
            config,
            extensions,
        }
    }

    /// Select sources, optionally for a test build rooted at `test_entry`.
    ///
    /// An empty result means there is nothing to build.
    pub fn select(&self, test_entry: Option<&Path>) -> Vec<PathBuf> {
        let selected = match test_entry {
            Some(entry) => self.select_for_test(&normalize_relative(entry)),
            None => self.select_normal(),
        };
        tracing::debug!("selected {} source(s)", selected.len());
        selected
    }

    fn select_normal(&self) -> Vec<PathBuf> {
        let build = &self.config.build;
        if build.wildcard {
            return collect_files(self.root, &self.root.join(&build.source_dir), self.extensions);
        }

        let main = normalize_relative(self.config.main());
        if self.root.join(&main).is_file() {
            vec![main]
        } else {
            tracing::debug!("main entry {} does not exist", main.display());
            Vec::new()
        }
    }

    fn select_for_test(&self, entry: &Path) -> Vec<PathBuf> {
        let build = &self.config.build;
        let mut selected = Vec::new();
        let mut seen = HashSet::new();

        if self.root.join(entry).is_file() {
            seen.insert(entry.to_path_buf());
            selected.push(entry.to_path_buf());
        } else {
            tracing::debug!("test entry {} does not exist", entry.display());
        }

        if !build.wildcard {
            return selected;
        }

        // A program has one entry point: the test entry replaces main.
        let main = self.config.main();
        let exclude_main = !paths_eq_ignore_case(entry, main);

        let sources = collect_files(self.root, &self.root.join(&build.source_dir), self.extensions);
        for source in sources {
            if exclude_main && paths_eq_ignore_case(&source, main) {
                continue;
            }
            if seen.insert(source.clone()) {
                selected.push(source);
            }
        }

        let tests = collect_files(self.root, &self.root.join(&build.test_dir), self.extensions);
        for source in tests {
            if seen.insert(source.clone()) {
                selected.push(source);
            }
        }

        selected
    }
}
