//! Test doubles for backends and progress reporting.
//!
//! The fakes never spawn processes. `FakeCompiler` writes a small artifact
//! file per source so staleness checks see real modification times.
//! Clones share their call log, so a clone handed to a registry factory can
//! still be inspected by the test.

pub mod fixtures;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub use fixtures::*;

use crate::builder::backend::{ArtifactNaming, BackendError, Compiler, Runner, SourceTask};
use crate::builder::events::BuildEvent;
use crate::builder::progress::ProgressReporter;
use crate::core::config::ProjectConfig;
use crate::core::descriptor::BackendDescriptor;

#[derive(Debug, Default)]
struct CompilerLog {
    assembled: Vec<PathBuf>,
    links: Vec<(Vec<PathBuf>, PathBuf)>,
    runs: Vec<(PathBuf, Vec<String>)>,
    debugs: Vec<PathBuf>,
}

/// In-process compiler backend.
#[derive(Clone)]
pub struct FakeCompiler {
    name: String,
    extensions: Vec<String>,
    categories: Vec<String>,
    naming: ArtifactNaming,
    failing: Vec<PathBuf>,
    partial_on_failure: bool,
    link_fails: bool,
    run_succeeds: bool,
    delay: Option<Duration>,
    log: Arc<Mutex<CompilerLog>>,
}

impl FakeCompiler {
    pub fn new(name: &str, extensions: &[&str]) -> Self {
        FakeCompiler {
            name: name.to_string(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            categories: vec!["native".to_string()],
            naming: ArtifactNaming::Flatten { extension: ".o" },
            failing: Vec::new(),
            partial_on_failure: false,
            link_fails: false,
            run_succeeds: true,
            delay: None,
            log: Arc::new(Mutex::new(CompilerLog::default())),
        }
    }

    pub fn with_categories(mut self, categories: &[&str]) -> Self {
        self.categories = categories.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_naming(mut self, naming: ArtifactNaming) -> Self {
        self.naming = naming;
        self
    }

    /// Fail to assemble the given project-relative source.
    pub fn failing_on(mut self, source: &str) -> Self {
        self.failing.push(PathBuf::from(source));
        self
    }

    /// Write a truncated artifact before reporting an assemble failure.
    pub fn leaving_partial_output(mut self) -> Self {
        self.partial_on_failure = true;
        self
    }

    pub fn failing_link(mut self) -> Self {
        self.link_fails = true;
        self
    }

    /// Make `run` report an unsuccessful exit.
    pub fn failing_run(mut self) -> Self {
        self.run_succeeds = false;
        self
    }

    /// Sleep before each assemble, to exercise interleaving.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Sources assembled so far, in call order.
    pub fn assembled(&self) -> Vec<PathBuf> {
        self.log.lock().unwrap().assembled.clone()
    }

    /// `(artifacts, output)` for each link call.
    pub fn links(&self) -> Vec<(Vec<PathBuf>, PathBuf)> {
        self.log.lock().unwrap().links.clone()
    }

    pub fn runs(&self) -> Vec<(PathBuf, Vec<String>)> {
        self.log.lock().unwrap().runs.clone()
    }

    pub fn debugs(&self) -> Vec<PathBuf> {
        self.log.lock().unwrap().debugs.clone()
    }
}

impl Compiler for FakeCompiler {
    fn descriptor(&self) -> BackendDescriptor {
        BackendDescriptor::new(self.name.clone())
            .with_extensions(self.extensions.iter().cloned())
            .with_categories(self.categories.iter().cloned())
    }

    fn artifact_naming(&self) -> ArtifactNaming {
        self.naming
    }

    fn assemble(
        &self,
        project: &Path,
        task: &SourceTask,
        _config: &ProjectConfig,
        _reporter: &dyn ProgressReporter,
    ) -> Result<PathBuf, BackendError> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.log.lock().unwrap().assembled.push(task.source.clone());

        if self.failing.contains(&task.source) {
            if self.partial_on_failure {
                let artifact = project.join(&task.artifact);
                if let Some(parent) = artifact.parent() {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| BackendError::Message(e.to_string()))?;
                }
                std::fs::write(&artifact, "PARTIAL")
                    .map_err(|e| BackendError::Message(e.to_string()))?;
            }
            return Err(BackendError::Failed {
                command: format!("fake -c {}", task.source.display()),
                status: "exit status: 1".to_string(),
                stderr: format!("{}: error: expected ';'", task.source.display()),
            });
        }

        let artifact = project.join(&task.artifact);
        if let Some(parent) = artifact.parent() {
            std::fs::create_dir_all(parent).map_err(|e| BackendError::Message(e.to_string()))?;
        }
        std::fs::write(&artifact, task.source.display().to_string())
            .map_err(|e| BackendError::Message(e.to_string()))?;
        Ok(task.artifact.clone())
    }

    fn link(
        &self,
        project: &Path,
        artifacts: &[PathBuf],
        output: &Path,
        _config: &ProjectConfig,
    ) -> Result<(), BackendError> {
        self.log
            .lock()
            .unwrap()
            .links
            .push((artifacts.to_vec(), output.to_path_buf()));

        if self.link_fails {
            return Err(BackendError::Message("undefined reference to `main'".to_string()));
        }

        let output = project.join(output);
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent).map_err(|e| BackendError::Message(e.to_string()))?;
        }
        std::fs::write(&output, "linked").map_err(|e| BackendError::Message(e.to_string()))
    }

    fn run(
        &self,
        _project: &Path,
        artifact: &Path,
        args: &[String],
        _stdin: Option<&[u8]>,
    ) -> Result<bool, BackendError> {
        self.log
            .lock()
            .unwrap()
            .runs
            .push((artifact.to_path_buf(), args.to_vec()));
        Ok(self.run_succeeds)
    }

    fn debug(
        &self,
        _project: &Path,
        artifact: &Path,
        _stdin: Option<&[u8]>,
    ) -> Result<bool, BackendError> {
        self.log.lock().unwrap().debugs.push(artifact.to_path_buf());
        Ok(true)
    }
}

/// In-process runner backend.
#[derive(Clone)]
pub struct FakeRunner {
    name: String,
    extensions: Vec<String>,
    categories: Vec<String>,
    runs: Arc<Mutex<Vec<(PathBuf, Vec<String>)>>>,
}

impl FakeRunner {
    pub fn new(name: &str, extensions: &[&str]) -> Self {
        FakeRunner {
            name: name.to_string(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            categories: vec!["runtime".to_string()],
            runs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn runs(&self) -> Vec<(PathBuf, Vec<String>)> {
        self.runs.lock().unwrap().clone()
    }
}

impl Runner for FakeRunner {
    fn descriptor(&self) -> BackendDescriptor {
        BackendDescriptor::new(self.name.clone())
            .with_extensions(self.extensions.iter().cloned())
            .with_categories(self.categories.iter().cloned())
    }

    fn run(
        &self,
        _project: &Path,
        source: &Path,
        args: &[String],
        _stdin: Option<&[u8]>,
    ) -> Result<bool, BackendError> {
        self.runs
            .lock()
            .unwrap()
            .push((source.to_path_buf(), args.to_vec()));
        Ok(true)
    }

    fn debug(
        &self,
        _project: &Path,
        _source: &Path,
        _stdin: Option<&[u8]>,
    ) -> Result<bool, BackendError> {
        Err(BackendError::Unsupported {
            backend: self.name.clone(),
            operation: "debugging".to_string(),
        })
    }
}

/// Reporter that records every callback.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    started: Mutex<Vec<String>>,
    finished: Mutex<Vec<String>>,
    percents: Mutex<Vec<f64>>,
    events: Mutex<Vec<BuildEvent>>,
}

impl RecordingReporter {
    pub fn started(&self) -> Vec<String> {
        self.started.lock().unwrap().clone()
    }

    pub fn finished(&self) -> Vec<String> {
        self.finished.lock().unwrap().clone()
    }

    pub fn percents(&self) -> Vec<f64> {
        self.percents.lock().unwrap().clone()
    }

    pub fn events(&self) -> Vec<BuildEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressReporter for RecordingReporter {
    fn start_file(&self, name: &str) {
        self.started.lock().unwrap().push(name.to_string());
    }

    fn report(&self, _name: &str, percent: f64) {
        self.percents.lock().unwrap().push(percent);
    }

    fn end_file(&self, name: &str, _elapsed: Duration) {
        self.finished.lock().unwrap().push(name.to_string());
    }

    fn event(&self, event: &BuildEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
