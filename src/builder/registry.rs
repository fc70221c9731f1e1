//! Backend registry.
//!
//! Maps a case-insensitive backend name to a factory. Built-in backends are
//! registered explicitly in [`BackendRegistry::new`]; plugins call
//! [`BackendRegistry::register_compiler`] or
//! [`BackendRegistry::register_runner`] during startup. The registry is
//! read-only afterwards and safe to share across threads.

use std::collections::HashMap;
use std::fmt;

use crate::builder::backend::{Backend, Compiler, Runner};
use crate::builder::backends;
use crate::core::descriptor::BackendDescriptor;
use crate::error::BuildError;

/// Backend used when the configuration names none.
pub const DEFAULT_BACKEND: &str = "c";

type CompilerFactory = Box<dyn Fn() -> Box<dyn Compiler> + Send + Sync>;
type RunnerFactory = Box<dyn Fn() -> Box<dyn Runner> + Send + Sync>;

struct CompilerEntry {
    descriptor: BackendDescriptor,
    factory: CompilerFactory,
}

struct RunnerEntry {
    descriptor: BackendDescriptor,
    factory: RunnerFactory,
}

/// Kind of a registered backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Compiler,
    Runner,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Compiler => f.pad("compiler"),
            BackendKind::Runner => f.pad("runner"),
        }
    }
}

/// Registry of available backends.
pub struct BackendRegistry {
    compilers: HashMap<String, CompilerEntry>,
    runners: HashMap<String, RunnerEntry>,
}

impl BackendRegistry {
    /// Create a registry with all built-in backends.
    ///
    /// No tool detection happens here; a missing compiler is reported when
    /// the backend is first used.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        backends::register_builtin(&mut registry);
        registry
    }

    /// Create a registry with no backends.
    pub fn empty() -> Self {
        BackendRegistry {
            compilers: HashMap::new(),
            runners: HashMap::new(),
        }
    }

    /// Register a compiler factory. Replaces any compiler with the same name.
    pub fn register_compiler<F>(&mut self, factory: F)
    where
        F: Fn() -> Box<dyn Compiler> + Send + Sync + 'static,
    {
        let descriptor = factory().descriptor();
        tracing::trace!("registered compiler `{}`", descriptor.name());

        self.compilers.insert(
            descriptor.key(),
            CompilerEntry {
                descriptor,
                factory: Box::new(factory),
            },
        );
    }

    /// Register a runner factory. Replaces any runner with the same name.
    pub fn register_runner<F>(&mut self, factory: F)
    where
        F: Fn() -> Box<dyn Runner> + Send + Sync + 'static,
    {
        let descriptor = factory().descriptor();
        tracing::trace!("registered runner `{}`", descriptor.name());

        self.runners.insert(
            descriptor.key(),
            RunnerEntry {
                descriptor,
                factory: Box::new(factory),
            },
        );
    }

    /// Resolve a backend by name. Compilers take precedence over runners.
    pub fn resolve(&self, name: &str) -> Result<Backend, BuildError> {
        let key = normalize_name(name);

        if let Some(entry) = self.compilers.get(&key) {
            return Ok(Backend::Compiler((entry.factory)()));
        }
        if let Some(entry) = self.runners.get(&key) {
            return Ok(Backend::Runner((entry.factory)()));
        }

        Err(BuildError::UnknownBackend {
            name: name.to_string(),
            available: self.names(),
        })
    }

    /// Descriptor of a registered backend.
    pub fn descriptor(&self, name: &str) -> Option<&BackendDescriptor> {
        let key = normalize_name(name);
        self.compilers
            .get(&key)
            .map(|e| &e.descriptor)
            .or_else(|| self.runners.get(&key).map(|e| &e.descriptor))
    }

    /// All registered names, sorted and deduplicated.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .compilers
            .keys()
            .chain(self.runners.keys())
            .cloned()
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Summaries of every backend, sorted by name.
    pub fn summaries(&self) -> Vec<BackendSummary> {
        let mut summaries: Vec<BackendSummary> = self
            .compilers
            .values()
            .map(|e| BackendSummary::new(&e.descriptor, BackendKind::Compiler))
            .chain(
                self.runners
                    .iter()
                    .filter(|(key, _)| !self.compilers.contains_key(*key))
                    .map(|(_, e)| BackendSummary::new(&e.descriptor, BackendKind::Runner)),
            )
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry key for a user-supplied name.
pub fn normalize_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        DEFAULT_BACKEND.to_string()
    } else {
        trimmed.to_lowercase()
    }
}

/// Summary of a backend for display purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSummary {
    pub name: String,
    pub kind: BackendKind,
    pub extensions: Vec<String>,
    pub categories: Vec<String>,
}

impl BackendSummary {
    fn new(descriptor: &BackendDescriptor, kind: BackendKind) -> Self {
        BackendSummary {
            name: descriptor.key(),
            kind,
            extensions: descriptor.extensions().to_vec(),
            categories: descriptor.categories().iter().cloned().collect(),
        }
    }
}
