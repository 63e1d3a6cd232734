//! htslink CLI - build-configuration resolver for htslib binding builds

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        // Fatal resolution errors carry their own diagnostics.
        if let Some(resolve_err) = e.downcast_ref::<htslink::ResolveError>() {
            htslink::util::diagnostic::emit(&resolve_err.to_diagnostic(), true);
        } else {
            eprintln!("error: {:#}", e);
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("htslink=debug")
    } else {
        EnvFilter::new("htslink=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    // Execute command
    match cli.command {
        Commands::Resolve(args) => commands::resolve::execute(args),
        Commands::Flags(args) => commands::flags::execute(args),
        Commands::Doctor(args) => commands::doctor::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
