//! Process command implementation

use crate::config::CliConfig;
use crate::error::CliError;
use crate::input::{resolve_patterns, FileReader};
use crate::output::{ArtifactWriter, OutputFormat};
use crate::progress::ProgressReporter;
use anyhow::Result;
use clap::Args;
use ctrlseg_api::{Config, ControlProcessor, ExecutionMode, RunStatus};
use std::path::{Path, PathBuf};

/// Arguments for the process command
#[derive(Debug, Args)]
pub struct ProcessArgs {
    /// Input files or patterns (supports glob); `.jsonl` files are read as blocks
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Artifact directory (default: formatted output on stdout)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Output format for stdout
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Embedded framework profile
    #[arg(long, value_name = "CODE")]
    pub profile: Option<String>,

    /// Framework profile TOML file, takes precedence over --profile
    #[arg(long, value_name = "FILE", conflicts_with = "profile")]
    pub profile_file: Option<PathBuf>,

    /// CLI configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Force parallel processing even for small documents
    #[arg(short, long, conflicts_with = "sequential")]
    pub parallel: bool,

    /// Force sequential processing
    #[arg(short, long)]
    pub sequential: bool,

    /// Number of worker threads
    #[arg(short, long, value_name = "N")]
    pub threads: Option<usize>,

    /// Chunk target in tokens
    #[arg(long, value_name = "TOKENS")]
    pub target_tokens: Option<usize>,

    /// Tokens repeated from the previous chunk
    #[arg(long, value_name = "TOKENS")]
    pub overlap_tokens: Option<usize>,

    /// Exit with an error unless every document passes validation
    #[arg(long)]
    pub strict: bool,
}

impl ProcessArgs {
    /// Execute the process command
    pub fn execute(&self, quiet: bool) -> Result<()> {
        log::info!("Starting control extraction");

        let cli_config = match &self.config {
            Some(path) => CliConfig::load(path)?,
            None => CliConfig::default(),
        };
        let processor = self.build_processor(&cli_config)?;
        log::info!("Using profile: {}", processor.profile_code());

        let files = resolve_patterns(&self.input)?;
        log::info!("Found {} files to process", files.len());

        let mut progress = ProgressReporter::new(quiet);
        progress.init_files(files.len() as u64);

        let mut formatter = match &self.output {
            Some(_) => None,
            None => Some(
                self.format
                    .formatter(std::io::stdout(), cli_config.output.pretty_json),
            ),
        };

        let mut not_passed = Vec::new();
        for file in &files {
            log::info!("Processing file: {}", file.display());
            if let Ok(size) = FileReader::file_size(file) {
                log::debug!("{}: {size} bytes", file.display());
            }

            let input = FileReader::read_input(file)?;
            let output = processor
                .process(input)
                .map_err(|e| CliError::ProcessingError(format!("{}: {e}", file.display())))?;

            if output.report.status != RunStatus::Passed {
                log::warn!(
                    "{}: status {}, {} controls",
                    file.display(),
                    output.report.status,
                    output.report.controls_found
                );
                not_passed.push(format!("{} ({})", file.display(), output.report.status));
            }

            if let Some(dir) = &self.output {
                ArtifactWriter::new(artifact_dir(dir, file, files.len())).write(&output)?;
            } else if let Some(formatter) = formatter.as_mut() {
                formatter.format_document(&file.display().to_string(), &output)?;
            }

            progress.file_completed(&display_name(file), output.report.controls_found);
        }

        if let Some(formatter) = formatter.as_mut() {
            formatter.finish()?;
        }
        progress.finish();

        if self.strict && !not_passed.is_empty() {
            return Err(CliError::ValidationFailed(format!(
                "{} of {} documents did not pass: {}",
                not_passed.len(),
                files.len(),
                not_passed.join(", ")
            ))
            .into());
        }

        log::info!("Processing complete");
        Ok(())
    }

    fn execution_mode(&self) -> ExecutionMode {
        if self.parallel {
            ExecutionMode::Parallel
        } else if self.sequential {
            ExecutionMode::Sequential
        } else {
            ExecutionMode::Adaptive
        }
    }

    /// Command-line flags win over the configuration file
    fn build_processor(&self, cli_config: &CliConfig) -> Result<ControlProcessor> {
        let processing = &cli_config.processing;
        let mut builder = Config::builder();

        builder = match (&self.profile_file, &self.profile, &processing.profile_file) {
            (Some(path), _, _) => builder.profile_file(path.clone()),
            (None, Some(code), _) => builder.profile(code.clone()),
            (None, None, Some(path)) => builder.profile_file(path.clone()),
            (None, None, None) => builder.profile(processing.default_profile.clone()),
        };

        builder = builder
            .execution_mode(self.execution_mode())
            .threads(self.threads.or_else(|| cli_config.threads()))
            .parallel_threshold(cli_config.performance.parallel_threshold_lines);

        if let Some(target) = self.target_tokens.or(processing.target_tokens) {
            builder = builder.target_tokens(target);
        }
        if let Some(overlap) = self.overlap_tokens.or(processing.overlap_tokens) {
            builder = builder.overlap_tokens(overlap);
        }

        let config = builder
            .build()
            .map_err(|e| CliError::ConfigError(e.to_string()))?;
        ControlProcessor::with_config(config).map_err(|e| CliError::ConfigError(e.to_string()).into())
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// One subdirectory per document when several are processed
fn artifact_dir(root: &Path, file: &Path, total: usize) -> PathBuf {
    if total < 2 {
        return root.to_path_buf();
    }
    match file.file_stem() {
        Some(stem) => root.join(stem),
        None => root.join(display_name(file)),
    }
}
