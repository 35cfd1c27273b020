//! ctrlseg command-line entry point

use anyhow::Result;
use clap::Parser;
use ctrlseg_cli::commands::{Commands, ListCommands};

/// Segment compliance documents into controls and index-ready chunks
#[derive(Debug, Parser)]
#[command(name = "ctrlseg", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress logging and progress output
    #[arg(short, long, global = true)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    log::debug!("Arguments: {:?}", cli);

    match cli.command {
        Commands::Process(args) => args.execute(cli.quiet),
        Commands::Validate(args) => args.execute(),
        Commands::GenerateConfig(args) => args.execute(),
        Commands::Dedup(args) => args.execute(),
        Commands::List { subcommand } => {
            match subcommand {
                ListCommands::Profiles => ctrlseg_cli::commands::list_profiles(),
                ListCommands::Formats => ctrlseg_cli::commands::list_formats(),
            }
            Ok(())
        }
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}
