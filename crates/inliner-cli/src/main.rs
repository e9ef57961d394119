use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io;
use tracing_subscriber::EnvFilter;

use inliner::{handle_deps, handle_expand, ExpandArgs, SourceArgs};

#[derive(Parser)]
#[command(name = "inliner")]
#[command(about = "Flatten library includes into a single self-contained source file", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand a root file and every library header it includes
    Expand(ExpandArgs),

    /// List the source units a root file pulls in, in inclusion order
    Deps(SourceArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.debug {
        tracing::Level::TRACE
    } else if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.debug) // Show target module in debug mode
        .with_writer(io::stderr)
        .init();

    let cwd = std::env::current_dir()?;
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Expand(args) => handle_expand(&args, &cwd, &mut stdout),
        Commands::Deps(args) => handle_deps(&args, &cwd, &mut stdout),
    }
}
