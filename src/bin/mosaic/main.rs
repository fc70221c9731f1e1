//! Mosaic CLI - one build command for many toolchains

use anyhow::Result;
use clap::Parser;
use mosaic::error::{BuildError, EXIT_FAILURE};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        std::process::exit(report(e));
    }
}

/// Print an error and return the process exit code for it.
fn report(error: anyhow::Error) -> i32 {
    match error.downcast::<BuildError>() {
        Ok(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            code
        }
        Err(other) => {
            eprintln!("error: {:#}", other);
            EXIT_FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("mosaic=debug")
    } else {
        EnvFilter::new("mosaic=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let global = commands::Global {
        verbose: cli.verbose,
        no_color: cli.no_color,
    };

    match cli.command {
        Commands::Init(args) => commands::init::execute(args, &global),
        Commands::Build(args) => commands::build::execute(args, &global),
        Commands::Lint(args) => commands::lint::execute(args, &global),
        Commands::Run(args) => commands::run::execute(args, &global),
        Commands::Test(args) => commands::test::execute(args, &global),
        Commands::Add(args) => commands::add::execute(args, &global),
        Commands::Clean(args) => commands::clean::execute(args, &global),
        Commands::Backends => commands::backends::execute(&global),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
