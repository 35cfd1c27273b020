//! Generate config command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Profile code for the new configuration
    #[arg(short = 'c', long, value_name = "CODE", required = true)]
    pub code: String,

    /// Human readable framework name
    #[arg(short, long, value_name = "NAME", default_value = "Custom Framework")]
    pub name: String,

    /// Output file path
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        use std::fs;

        println!("Generating profile configuration template...");
        println!("  Profile code: {}", self.code);
        println!("  Output file: {}", self.output.display());

        let template = self.generate_template();
        fs::write(&self.output, template)
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Configuration template generated successfully!");
        println!();
        println!("Next steps:");
        println!("1. Edit the identifier pattern and section anchors for your framework");
        println!("2. Validate your configuration:");
        println!("   ctrlseg validate --profile-config {}", self.output.display());
        println!("3. Use it for processing:");
        println!(
            "   ctrlseg process -i document.md --profile-file {}",
            self.output.display()
        );

        Ok(())
    }

    /// Generate template configuration content
    fn generate_template(&self) -> String {
        format!(
            r#"# Framework profile for {name}

[metadata]
code = "{code}"
name = "{name}"
description = ""

# Control identifier, unanchored. Lines starting with it followed by a
# separator and text open a control.
[identifier]
pattern = '[A-Z]?\d+(?:\.\d+)+'

# Backward scan from each identifier line
[scan]
# Maximum number of lines to look back
window = 50
# Lines at least this long count as section content
min_content_chars = 20
# Lines consisting only of one of these are list separators
bullet_markers = ["•", "-", "*", "o", "▪", "◦", "–", "·"]

# Page headers and footers; they stop the backward scan and are removed
# from assembled content unless they contain a section keyword
[running_headers]
patterns = [
    '^page \d+( of \d+)?$',
    '^\d{{1,4}}$',
    '©\s*\d{{4}}',
]

# Section anchors: case-insensitive keywords and line patterns
[sections.requirement]
patterns = ['^[A-Z]?\d+(\.\d+)+\.?\s+\S']
weight = 40.0
required = true

[sections.testing_procedure]
keywords = ["testing procedure"]
patterns = ['^[A-Z]?\d+(\.\d+)+\.[a-z]\b']
weight = 25.0
required = true

[sections.purpose]
keywords = ["purpose"]
weight = 10.0

[sections.good_practice]
keywords = ["good practice", "guidance"]
weight = 10.0

[sections.examples]
keywords = ["examples"]
weight = 5.0

[quality]
identifier_occurrence_weight = 10.0
expected_identifier_occurrences = 2
min_content_chars = 40
pass_threshold = 50.0

[quality.grades]
excellent = 90.0
good = 75.0
fair = 50.0

# Phrases expected together: when `when` appears, one of `expect` should too
# [[quality.coherence]]
# name = "testing-verbs"
# when = "testing procedure"
# expect = ["examine", "interview"]
# weight = 5.0

[chunking]
target_tokens = 300
overlap_tokens = 50
overshoot_tolerance = 0.2

[assembly]
continuation_separator = "\n\n[continued]\n\n"
strip_running_headers = true
expected_minimum_controls = 1
"#,
            name = self.name,
            code = self.code,
        )
    }
}
