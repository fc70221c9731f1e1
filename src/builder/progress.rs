//! Progress reporting for the build scheduler.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::builder::events::BuildEvent;

/// Receives per-file progress from the scheduler.
///
/// Called concurrently from worker threads when jobs > 1.
pub trait ProgressReporter: Send + Sync {
    /// A file is about to be dispatched to the backend.
    fn start_file(&self, name: &str);

    /// Overall progress, `percent` in 0..=100.
    fn report(&self, name: &str, percent: f64);

    /// A file finished (successfully or not).
    fn end_file(&self, name: &str, elapsed: Duration);

    /// Build-level events (start, lint warnings, finish).
    fn event(&self, _event: &BuildEvent) {}
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn start_file(&self, _name: &str) {}
    fn report(&self, _name: &str, _percent: f64) {}
    fn end_file(&self, _name: &str, _elapsed: Duration) {}
}

/// Human-readable progress on stderr.
pub struct ConsoleReporter {
    bar: ProgressBar,
    verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        let bar = if verbose {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new(100);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            {
                bar.set_style(style.progress_chars("#>-"));
            }
            bar
        };
        ConsoleReporter { bar, verbose }
    }
}

impl ProgressReporter for ConsoleReporter {
    fn start_file(&self, name: &str) {
        if self.verbose {
            eprintln!("   Compiling {}", name);
        } else {
            self.bar.set_message(name.to_string());
        }
    }

    fn report(&self, _name: &str, percent: f64) {
        self.bar.set_position(percent.round() as u64);
    }

    fn end_file(&self, name: &str, elapsed: Duration) {
        if self.verbose {
            eprintln!("   Assembled {} in {:.2}s", name, elapsed.as_secs_f64());
        }
    }

    fn event(&self, event: &BuildEvent) {
        if let BuildEvent::BuildFinished { .. } = event {
            self.bar.finish_and_clear();
        }
    }
}

/// Machine-readable progress: one JSON event per line on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonReporter;

impl ProgressReporter for JsonReporter {
    fn start_file(&self, name: &str) {
        self.event(&BuildEvent::FileStarted {
            file: name.to_string(),
        });
    }

    fn report(&self, name: &str, percent: f64) {
        self.event(&BuildEvent::Progress {
            file: name.to_string(),
            percent,
        });
    }

    fn end_file(&self, name: &str, elapsed: Duration) {
        self.event(&BuildEvent::FileFinished {
            file: name.to_string(),
            elapsed_ms: elapsed.as_millis() as u64,
        });
    }

    fn event(&self, event: &BuildEvent) {
        println!("{}", event.to_json());
    }
}

/// Thread-safe completion counter.
#[derive(Clone)]
pub struct ProgressCounter {
    completed: Arc<AtomicUsize>,
    total: usize,
}

impl ProgressCounter {
    pub fn new(total: usize) -> Self {
        ProgressCounter {
            completed: Arc::new(AtomicUsize::new(0)),
            total,
        }
    }

    /// Record a completed task and return the new count.
    pub fn complete(&self) -> usize {
        self.completed.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Completed / total x 100. An empty build is 100% done.
    pub fn percent(&self) -> f64 {
        percent(self.completed(), self.total)
    }
}

/// `completed / total x 100`, with an empty total counting as complete.
pub fn percent(completed: usize, total: usize) -> f64 {
    if total == 0 {
        100.0
    } else {
        completed as f64 / total as f64 * 100.0
    }
}
