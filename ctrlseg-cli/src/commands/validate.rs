//! Validate command implementation

use anyhow::Result;
use clap::Args;
use ctrlseg_core::Profile;
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Path to the profile configuration file to validate
    #[arg(short = 'c', long, value_name = "FILE", required = true)]
    pub profile_config: PathBuf,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        println!("Validating profile configuration: {}", self.profile_config.display());

        match Profile::from_file(&self.profile_config) {
            Ok(profile) => {
                let config = profile.config();
                println!("✓ Configuration is valid!");
                println!("  Profile code: {}", profile.code());
                println!("  Profile name: {}", profile.name());
                println!("  Identifier pattern: {}", profile.pattern().as_str());
                println!("  Sections: {}", config.sections.len());
                println!(
                    "  Chunking: {} tokens, {} overlap",
                    config.chunking.target_tokens, config.chunking.overlap_tokens
                );
                Ok(())
            }
            Err(e) => {
                println!("✗ Configuration is invalid!");
                println!("  Error: {e}");
                Err(anyhow::anyhow!("Validation failed: {}", e))
            }
        }
    }
}
