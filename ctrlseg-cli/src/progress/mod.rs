//! Document progress bar

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Shows per-document progress and keeps a running control count
pub struct ProgressReporter {
    bar: Option<ProgressBar>,
    quiet: bool,
    documents: u64,
    controls: usize,
}

impl ProgressReporter {
    /// Reporter that stays silent when `quiet` is set
    pub fn new(quiet: bool) -> Self {
        Self {
            bar: None,
            quiet,
            documents: 0,
            controls: 0,
        }
    }

    /// Start the bar; a single document gets none
    pub fn init_files(&mut self, total_documents: u64) {
        if self.quiet || total_documents < 2 {
            return;
        }

        let bar = ProgressBar::new(total_documents);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} documents {msg}")
        {
            bar.set_style(style.progress_chars("##-"));
        }
        bar.enable_steady_tick(Duration::from_millis(120));
        self.bar = Some(bar);
    }

    /// Record a finished document
    pub fn file_completed(&mut self, filename: &str, controls: usize) {
        self.documents += 1;
        self.controls += controls;
        if let Some(bar) = &self.bar {
            bar.set_message(format!("{filename}: {controls} controls"));
            bar.inc(1);
        }
    }

    /// Controls extracted so far across all documents
    pub fn controls(&self) -> usize {
        self.controls
    }

    /// Clear the bar and log the totals
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
        log::info!("{} documents, {} controls", self.documents, self.controls);
    }
}
