//! Build orchestration engine.
//!
//! Backends plug in through the [`Compiler`] and [`Runner`] traits and are
//! looked up in a [`BackendRegistry`]. A build selects sources, partitions
//! them by staleness, and hands the stale ones to the [`BuildScheduler`].

pub mod backend;
pub mod backends;
pub mod events;
pub mod lint;
pub mod progress;
pub mod registry;
pub mod scheduler;
pub mod selector;
pub mod staleness;

pub use backend::{ArtifactNaming, Backend, BackendError, Compiler, Runner, SourceTask};
pub use events::BuildEvent;
pub use lint::{lint, FindingKind, LintFinding};
pub use progress::{ConsoleReporter, JsonReporter, ProgressReporter, SilentReporter};
pub use registry::{BackendKind, BackendRegistry, BackendSummary, DEFAULT_BACKEND};
pub use scheduler::BuildScheduler;
pub use selector::SourceSelector;
pub use staleness::{Partition, StalenessOracle};
