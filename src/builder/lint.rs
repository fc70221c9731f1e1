//! Dependency category lint.
//!
//! Cross-checks the category declared for each dependency against the
//! categories the resolved backend supports. Findings are warnings; only an
//! explicitly requested lint turns them into a failure.

use std::fmt;

use crate::core::config::{ProjectConfig, CONFIG_NAME};
use crate::core::descriptor::BackendDescriptor;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// What is wrong with a dependency's category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindingKind {
    /// No entry in `[categories]`
    MissingCategory,
    /// Declared, but the backend does not support it
    UnsupportedCategory { supported: Vec<String> },
}

/// One lint warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintFinding {
    pub dependency: String,
    /// Declared category; `None` when missing
    pub category: Option<String>,
    pub kind: FindingKind,
    /// From `[dev-dependencies]`
    pub dev: bool,
}

impl LintFinding {
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::warning(self.to_string()).with_location(CONFIG_NAME);
        match self.kind {
            FindingKind::MissingCategory => diag
                .with_code("missing-category")
                .with_help(suggestions::DECLARE_CATEGORY),
            FindingKind::UnsupportedCategory { .. } => diag
                .with_code("unsupported-category")
                .with_help(suggestions::CHANGE_BACKEND),
        }
    }
}

impl fmt::Display for LintFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.dev {
            "dev-dependency"
        } else {
            "dependency"
        };
        match &self.kind {
            FindingKind::MissingCategory => {
                write!(f, "{} `{}` has no category", label, self.dependency)
            }
            FindingKind::UnsupportedCategory { supported } => {
                let supported = if supported.is_empty() {
                    "none".to_string()
                } else {
                    supported.join(", ")
                };
                write!(
                    f,
                    "{} `{}` has category `{}`, which this backend does not support (supported: {})",
                    label,
                    self.dependency,
                    self.category.as_deref().unwrap_or("missing"),
                    supported
                )
            }
        }
    }
}

/// Check every dependency, then every dev-dependency, in name order.
pub fn lint(config: &ProjectConfig, descriptor: &BackendDescriptor) -> Vec<LintFinding> {
    let mut findings = Vec::new();
    let groups = [
        (&config.dependencies, false),
        (&config.dev_dependencies, true),
    ];

    for (deps, dev) in groups {
        for name in deps.keys() {
            if let Some(finding) = check(config, descriptor, name, dev) {
                findings.push(finding);
            }
        }
    }

    findings
}

fn check(
    config: &ProjectConfig,
    descriptor: &BackendDescriptor,
    name: &str,
    dev: bool,
) -> Option<LintFinding> {
    let kind = match config.category(name) {
        None => FindingKind::MissingCategory,
        Some(category) if descriptor.supports_category(category) => return None,
        Some(_) => FindingKind::UnsupportedCategory {
            supported: descriptor.categories().iter().cloned().collect(),
        },
    };

    Some(LintFinding {
        dependency: name.to_string(),
        category: config.category(name).map(str::to_string),
        kind,
        dev,
    })
}
