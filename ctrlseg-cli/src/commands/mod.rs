//! CLI command implementations

use clap::Subcommand;

pub mod dedup;
pub mod generate_config;
pub mod process;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract controls and chunks from converted documents
    Process(process::ProcessArgs),

    /// Validate a profile configuration file
    Validate(validate::ValidateArgs),

    /// Generate a profile configuration template
    GenerateConfig(generate_config::GenerateConfigArgs),

    /// Deduplicate a JSON list of mapping tuples
    Dedup(dedup::DedupArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },
}

/// List subcommands
#[derive(Debug, Subcommand)]
pub enum ListCommands {
    /// List embedded framework profiles
    Profiles,

    /// List available output formats
    Formats,
}

/// Print the embedded profiles
pub fn list_profiles() {
    println!("Available profiles:");
    for code in ctrlseg_api::available_profiles() {
        match ctrlseg_core::Profile::from_code(code) {
            Ok(profile) => println!("  {code:<10} {}", profile.name()),
            Err(e) => println!("  {code:<10} (failed to load: {e})"),
        }
    }
}

/// Print the output formats
pub fn list_formats() {
    println!("Available output formats:");
    println!("  text      Control content with a per-document summary");
    println!("  json      Controls, chunks and report per document");
    println!("  markdown  One section per control");
}
