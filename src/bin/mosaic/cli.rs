//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell as CompletionShell;
use mosaic::core::BuildMode;

/// Mosaic - one build command for many toolchains
#[derive(Parser)]
#[command(name = "mosaic")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create Mosaic.toml and a starter source in a directory
    Init(InitArgs),

    /// Build the current project
    Build(BuildArgs),

    /// Check dependency categories against the backend
    Lint(LintArgs),

    /// Build and run the current project
    Run(RunArgs),

    /// Build and run the test entry
    Test(TestArgs),

    /// Add a dependency to Mosaic.toml
    Add(AddArgs),

    /// Remove build artifacts
    Clean(CleanArgs),

    /// List registered backends
    Backends,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Output format for build progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MessageFormat {
    #[default]
    Human,
    Json,
}

#[derive(Args)]
pub struct InitArgs {
    /// Directory to initialize (defaults to current directory)
    pub path: Option<PathBuf>,

    /// Project name (defaults to directory name)
    #[arg(long)]
    pub name: Option<String>,

    /// Backend to build with
    #[arg(long, default_value = "c")]
    pub backend: String,
}

/// Options shared by every command that builds.
#[derive(Args)]
pub struct BuildFlags {
    /// Build mode (debug or release)
    #[arg(long, conflicts_with_all = ["debug", "release"])]
    pub mode: Option<BuildMode>,

    /// Shorthand for `--mode debug`
    #[arg(long)]
    pub debug: bool,

    /// Shorthand for `--mode release`
    #[arg(short, long, conflicts_with = "debug")]
    pub release: bool,

    /// Number of parallel jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Override the configured backend
    #[arg(long)]
    pub backend: Option<String>,

    /// Rebuild every source even if its artifact is current
    #[arg(long)]
    pub no_incremental: bool,
}

impl BuildFlags {
    pub fn mode(&self) -> Option<BuildMode> {
        if self.release {
            Some(BuildMode::Release)
        } else if self.debug {
            Some(BuildMode::Debug)
        } else {
            self.mode
        }
    }
}

#[derive(Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub flags: BuildFlags,

    /// Remove previous artifacts before building
    #[arg(long)]
    pub clean: bool,

    /// Force linking even if disabled in Mosaic.toml
    #[arg(long)]
    pub link: bool,

    /// Progress output format
    #[arg(long, value_enum, default_value_t = MessageFormat::Human)]
    pub message_format: MessageFormat,

    /// Extra arguments passed to every backend invocation
    #[arg(last = true)]
    pub args: Vec<String>,
}

#[derive(Args)]
pub struct LintArgs {
    /// Lint against this backend instead of the configured one
    #[arg(long)]
    pub backend: Option<String>,
}

#[derive(Args)]
pub struct RunArgs {
    /// Launch the program under a debugger
    #[arg(long)]
    pub debug: bool,

    /// Build in release mode
    #[arg(short, long)]
    pub release: bool,

    /// Number of parallel jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Override the configured backend
    #[arg(long)]
    pub backend: Option<String>,

    /// Arguments passed to the program
    #[arg(last = true)]
    pub args: Vec<String>,
}

#[derive(Args)]
pub struct TestArgs {
    /// Test entry (defaults to `build.test_entry`)
    #[arg(long)]
    pub entry: Option<PathBuf>,

    /// Number of parallel jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Extra backend arguments for the test build
    #[arg(last = true)]
    pub args: Vec<String>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Dependency as `name` or `name@version`
    pub spec: String,

    /// Category recorded under [categories]
    #[arg(long)]
    pub category: Option<String>,

    /// Add as a development dependency
    #[arg(long)]
    pub dev: bool,
}

#[derive(Args)]
pub struct CleanArgs {}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: CompletionShell,
}
