//! Bounded-concurrency assembly.
//!
//! With one job, sources are assembled in order and the first failure stops
//! the build. With more, every stale source is dispatched to a private
//! worker pool and all failures are collected before returning. In both
//! modes the returned artifacts are ordered by selection index, never by
//! completion order.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use crate::builder::backend::{Compiler, SourceTask};
use crate::builder::progress::{percent, ProgressCounter, ProgressReporter};
use crate::core::config::ProjectConfig;
use crate::error::{AssembleError, BuildError};

/// An assembled artifact tagged with its source's selection index.
pub type IndexedArtifact = (usize, PathBuf);

/// Dispatches assemble tasks to a compiler backend.
pub struct BuildScheduler<'a> {
    compiler: &'a dyn Compiler,
    root: &'a Path,
    config: &'a ProjectConfig,
    reporter: &'a dyn ProgressReporter,
}

impl<'a> BuildScheduler<'a> {
    pub fn new(
        compiler: &'a dyn Compiler,
        root: &'a Path,
        config: &'a ProjectConfig,
        reporter: &'a dyn ProgressReporter,
    ) -> Self {
        BuildScheduler {
            compiler,
            root,
            config,
            reporter,
        }
    }

    /// Assemble every task using up to `jobs` workers.
    pub fn run(&self, tasks: &[SourceTask], jobs: usize) -> Result<Vec<IndexedArtifact>, BuildError> {
        if tasks.is_empty() {
            return Ok(Vec::new());
        }

        let counter = ProgressCounter::new(tasks.len());
        let mut artifacts = if jobs <= 1 {
            self.run_sequential(tasks, &counter)?
        } else {
            self.run_parallel(tasks, jobs, &counter)?
        };

        artifacts.sort_by_key(|(index, _)| *index);
        Ok(artifacts)
    }

    fn run_sequential(
        &self,
        tasks: &[SourceTask],
        counter: &ProgressCounter,
    ) -> Result<Vec<IndexedArtifact>, BuildError> {
        let mut artifacts = Vec::with_capacity(tasks.len());
        for task in tasks {
            let artifact = self.assemble(task, counter).map_err(BuildError::Assemble)?;
            artifacts.push(artifact);
        }
        Ok(artifacts)
    }

    fn run_parallel(
        &self,
        tasks: &[SourceTask],
        jobs: usize,
        counter: &ProgressCounter,
    ) -> Result<Vec<IndexedArtifact>, BuildError> {
        // A private pool so concurrent builds in one process do not share
        // the global pool's width.
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .thread_name(|i| format!("mosaic-worker-{}", i))
            .build()?;

        tracing::debug!("assembling {} files on {} workers", tasks.len(), jobs);

        let results: Vec<Result<IndexedArtifact, AssembleError>> = pool.install(|| {
            tasks
                .par_iter()
                .map(|task| self.assemble(task, counter))
                .collect()
        });

        let mut artifacts = Vec::with_capacity(results.len());
        let mut errors = Vec::new();
        for result in results {
            match result {
                Ok(artifact) => artifacts.push(artifact),
                Err(e) => errors.push(e),
            }
        }

        if errors.is_empty() {
            Ok(artifacts)
        } else {
            Err(BuildError::AggregateAssemble { errors })
        }
    }

    fn assemble(
        &self,
        task: &SourceTask,
        counter: &ProgressCounter,
    ) -> Result<IndexedArtifact, AssembleError> {
        let name = task.display_name();
        self.reporter.start_file(&name);
        self.reporter.report(&name, counter.percent());
        let start = Instant::now();

        let result = self
            .compiler
            .assemble(self.root, task, self.config, self.reporter);

        self.reporter.end_file(&name, start.elapsed());
        let done = counter.complete();
        self.reporter.report(&name, percent(done, counter.total()));

        match result {
            Ok(artifact) => Ok((task.index, artifact)),
            Err(e) => {
                tracing::debug!("{} failed: {}", name, e);
                self.discard_artifact(task);
                Err(AssembleError::new(task.source.clone(), e.to_string()))
            }
        }
    }

    /// Remove whatever a failed assemble left at the artifact path, so a
    /// later incremental build cannot mistake it for a current object.
    fn discard_artifact(&self, task: &SourceTask) {
        let artifact = self.root.join(&task.artifact);
        match std::fs::remove_file(&artifact) {
            Ok(()) => tracing::debug!("removed partial artifact {}", task.artifact.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                "could not remove partial artifact {}: {}",
                artifact.display(),
                e
            ),
        }
    }
}
