//! Configuration structures and validation
//!
//! This module defines the TOML schema for framework profiles.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root profile configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub metadata: Metadata,
    pub identifier: IdentifierConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub running_headers: RunningHeaders,
    #[serde(default)]
    pub sections: BTreeMap<String, SectionConfig>,
    #[serde(default)]
    pub quality: QualityConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub assembly: AssemblyConfig,
}

/// Profile metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Identifier pattern, unanchored; the detector anchors it at line start
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifierConfig {
    pub pattern: String,
}

/// Backward scan tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default = "default_window")]
    pub window: usize,
    #[serde(default = "default_min_content_chars")]
    pub min_content_chars: usize,
    #[serde(default = "default_bullet_markers")]
    pub bullet_markers: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            window: default_window(),
            min_content_chars: default_min_content_chars(),
            bullet_markers: default_bullet_markers(),
        }
    }
}

/// Running header and footer patterns
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunningHeaders {
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Anchors and scoring for one section kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectionConfig {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub required: bool,
}

/// Quality scoring weights and thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityConfig {
    #[serde(default = "default_occurrence_weight")]
    pub identifier_occurrence_weight: f64,
    #[serde(default = "default_expected_occurrences")]
    pub expected_identifier_occurrences: usize,
    #[serde(default)]
    pub min_content_chars: usize,
    #[serde(default)]
    pub coherence: Vec<CoherenceRule>,
    #[serde(default)]
    pub grades: GradeThresholds,
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            identifier_occurrence_weight: default_occurrence_weight(),
            expected_identifier_occurrences: default_expected_occurrences(),
            min_content_chars: 0,
            coherence: Vec::new(),
            grades: GradeThresholds::default(),
            pass_threshold: default_pass_threshold(),
        }
    }
}

/// Phrases expected to co-occur: when `when` appears, one of `expect` should too
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoherenceRule {
    pub name: String,
    pub when: String,
    pub expect: Vec<String>,
    #[serde(default)]
    pub weight: f64,
}

/// Lower bounds of the quality grades
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeThresholds {
    pub excellent: f64,
    pub good: f64,
    pub fair: f64,
}

impl Default for GradeThresholds {
    fn default() -> Self {
        Self {
            excellent: 90.0,
            good: 75.0,
            fair: 50.0,
        }
    }
}

/// Chunk sizing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    #[serde(default = "default_target_tokens")]
    pub target_tokens: usize,
    #[serde(default = "default_overlap_tokens")]
    pub overlap_tokens: usize,
    #[serde(default = "default_overshoot")]
    pub overshoot_tolerance: f64,
    #[serde(default = "default_terminators")]
    pub sentence_terminators: Vec<char>,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            target_tokens: default_target_tokens(),
            overlap_tokens: default_overlap_tokens(),
            overshoot_tolerance: default_overshoot(),
            sentence_terminators: default_terminators(),
        }
    }
}

/// Assembly options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyConfig {
    #[serde(default = "default_separator")]
    pub continuation_separator: String,
    #[serde(default = "default_true")]
    pub strip_running_headers: bool,
    #[serde(default = "default_expected_minimum")]
    pub expected_minimum_controls: usize,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            continuation_separator: default_separator(),
            strip_running_headers: true,
            expected_minimum_controls: default_expected_minimum(),
        }
    }
}

fn default_window() -> usize {
    50
}

fn default_min_content_chars() -> usize {
    20
}

fn default_bullet_markers() -> Vec<String> {
    ["•", "-", "*", "o", "▪", "◦", "–", "·"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_occurrence_weight() -> f64 {
    10.0
}

fn default_expected_occurrences() -> usize {
    2
}

fn default_pass_threshold() -> f64 {
    50.0
}

fn default_target_tokens() -> usize {
    300
}

fn default_overlap_tokens() -> usize {
    50
}

fn default_overshoot() -> f64 {
    0.2
}

fn default_terminators() -> Vec<char> {
    vec!['.', '!', '?']
}

fn default_separator() -> String {
    "\n\n[continued]\n\n".to_string()
}

fn default_expected_minimum() -> usize {
    1
}

fn default_true() -> bool {
    true
}

impl ProfileConfig {
    /// Validate numeric ranges; patterns are checked when compiled
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.metadata.code.trim().is_empty() {
            return Err("Profile code cannot be empty".to_string());
        }

        if self.identifier.pattern.trim().is_empty() {
            return Err("Identifier pattern cannot be empty".to_string());
        }

        if self.scan.window == 0 {
            return Err("Scan window must be greater than 0".to_string());
        }

        let chunking = &self.chunking;
        if chunking.target_tokens == 0 {
            return Err("Target tokens must be greater than 0".to_string());
        }
        if chunking.overlap_tokens >= chunking.target_tokens {
            return Err("Overlap tokens must be less than target tokens".to_string());
        }
        if !(0.0..=1.0).contains(&chunking.overshoot_tolerance) {
            return Err("Overshoot tolerance must be between 0 and 1".to_string());
        }

        let quality = &self.quality;
        let mut total = quality.identifier_occurrence_weight;
        for (key, section) in &self.sections {
            if section.weight < 0.0 {
                return Err(format!("Section '{key}' has a negative weight"));
            }
            total += section.weight;
        }
        for rule in &quality.coherence {
            if rule.weight < 0.0 {
                return Err(format!("Coherence rule '{}' has a negative weight", rule.name));
            }
            if rule.expect.is_empty() {
                return Err(format!("Coherence rule '{}' expects nothing", rule.name));
            }
            total += rule.weight;
        }
        if quality.identifier_occurrence_weight < 0.0 {
            return Err("Identifier occurrence weight cannot be negative".to_string());
        }
        if total <= 0.0 {
            return Err("Quality weights must add up to more than 0".to_string());
        }

        let grades = quality.grades;
        if !(grades.excellent >= grades.good && grades.good >= grades.fair && grades.fair >= 0.0)
            || grades.excellent > 100.0
        {
            return Err("Grade thresholds must satisfy 100 >= excellent >= good >= fair >= 0".to_string());
        }
        if !(0.0..=100.0).contains(&quality.pass_threshold) {
            return Err("Pass threshold must be between 0 and 100".to_string());
        }

        Ok(())
    }
}
