//! Backend descriptors.

use std::collections::BTreeSet;
use std::fmt;

/// Static description of a backend: its name, the source extensions it
/// accepts, and the dependency categories it can consume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendDescriptor {
    name: String,
    extensions: Vec<String>,
    categories: BTreeSet<String>,
}

impl BackendDescriptor {
    /// Create a descriptor with no extensions or categories.
    pub fn new(name: impl Into<String>) -> Self {
        BackendDescriptor {
            name: name.into(),
            extensions: Vec::new(),
            categories: BTreeSet::new(),
        }
    }

    /// Set the recognized source extensions (`".c"` or `"c"`).
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| {
                let e: String = e.into();
                if e.starts_with('.') {
                    e
                } else {
                    format!(".{}", e)
                }
            })
            .collect();
        self
    }

    /// Set the supported dependency categories.
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registry key: the lower-cased name.
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }

    /// Recognized source extensions, each with a leading dot.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Supported dependency categories.
    pub fn categories(&self) -> &BTreeSet<String> {
        &self.categories
    }

    /// Whether `category` is supported.
    pub fn supports_category(&self, category: &str) -> bool {
        self.categories.contains(category)
    }
}

impl fmt::Display for BackendDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
