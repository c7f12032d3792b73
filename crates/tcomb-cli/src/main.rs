mod commands;
mod progress;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tcomb", about = "Temporal comb filter for composite video captures")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show Y4M file metadata
    Info(commands::info::InfoArgs),
    /// Filter a whole Y4M file
    Run(commands::pipeline::RunArgs),
    /// Filter one frame and save a plane as PNG
    Preview(commands::preview::PreviewArgs),
    /// Print or save the default pipeline config as TOML
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Run(args) => commands::pipeline::run(args),
        Commands::Preview(args) => commands::preview::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
