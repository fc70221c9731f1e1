//! Incremental staleness decisions.
//!
//! An artifact is current iff its modification time is not earlier than its
//! source's. Ties count as current so coarse filesystem timestamps never
//! force a rebuild loop.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::builder::backend::{ArtifactNaming, SourceTask};
use crate::core::config::BuildSettings;
use crate::error::BuildError;
use crate::util::fs::modified_time;

/// Sources split by whether their artifact can be reused.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Up to date; the existing artifact is reused
    pub fresh: Vec<SourceTask>,
    /// Must be assembled
    pub stale: Vec<SourceTask>,
}

/// Computes artifact paths and decides which sources need rebuilding.
pub struct StalenessOracle<'a> {
    root: &'a Path,
    naming: ArtifactNaming,
    settings: &'a BuildSettings,
}

impl<'a> StalenessOracle<'a> {
    pub fn new(root: &'a Path, naming: ArtifactNaming, settings: &'a BuildSettings) -> Self {
        StalenessOracle {
            root,
            naming,
            settings,
        }
    }

    /// Create one task per selected source, in selection order.
    ///
    /// Fails if two sources map to the same artifact path: both tasks would
    /// write one file and the link would see a single object twice.
    pub fn tasks(&self, sources: &[PathBuf]) -> Result<Vec<SourceTask>, BuildError> {
        let tasks: Vec<SourceTask> = sources
            .iter()
            .enumerate()
            .map(|(index, source)| {
                let artifact = self.naming.artifact_path(source, self.settings);
                SourceTask::new(index, self.root, source.clone(), artifact)
            })
            .collect();

        let mut owners: HashMap<&Path, Vec<&Path>> = HashMap::new();
        for task in &tasks {
            owners
                .entry(task.artifact.as_path())
                .or_default()
                .push(task.source.as_path());
        }
        let collision = tasks.iter().find_map(|task| {
            owners
                .get(task.artifact.as_path())
                .filter(|sources| sources.len() > 1)
                .map(|sources| (task, sources))
        });
        if let Some((task, sources)) = collision {
            return Err(BuildError::ArtifactCollision {
                artifact: task.artifact.clone(),
                sources: sources.iter().map(|s| s.to_path_buf()).collect(),
            });
        }

        Ok(tasks)
    }

    /// Split tasks into fresh and stale. With incremental builds disabled
    /// everything is stale.
    pub fn partition(&self, tasks: Vec<SourceTask>) -> Partition {
        if !self.settings.incremental {
            return Partition {
                fresh: Vec::new(),
                stale: tasks,
            };
        }

        let mut partition = Partition::default();
        for task in tasks {
            if is_up_to_date(&task.absolute, &self.root.join(&task.artifact)) {
                tracing::debug!("{} is up to date", task.source.display());
                partition.fresh.push(task);
            } else {
                partition.stale.push(task);
            }
        }
        partition
    }
}

/// Whether `artifact` exists and is at least as new as `source`.
pub fn is_up_to_date(source: &Path, artifact: &Path) -> bool {
    match (modified_time(artifact), modified_time(source)) {
        (Some(artifact_time), Some(source_time)) => artifact_time >= source_time,
        _ => false,
    }
}
