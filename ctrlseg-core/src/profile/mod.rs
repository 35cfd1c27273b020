//! Framework profiles
//!
//! A profile is everything that differs between compliance frameworks: the
//! identifier pattern, running header patterns, section anchors, scoring
//! weights and chunk sizes. [`ProfileConfig`] is the TOML schema, [`Profile`]
//! is the validated and compiled form the pipeline runs on.

mod config;
mod loader;

pub use config::{
    AssemblyConfig, ChunkingConfig, CoherenceRule, GradeThresholds, IdentifierConfig, Metadata,
    ProfileConfig, QualityConfig, RunningHeaders, ScanConfig, SectionConfig,
};
pub use loader::{embedded_profile_source, get_profile_config, list_available_profiles};

use crate::assembler::{AssemblyOptions, ControlAssembler};
use crate::boundary::{BackwardScanner, BoundaryDetector, IdentifierPattern, RunningHeaderFilter};
use crate::chunking::{ChunkOptions, ChunkSplitter};
use crate::error::{CoreError, Result};
use crate::quality::{CoherenceCheck, QualityScorer, ScoringOptions, SectionWeight};
use crate::sections::{SectionClassifier, SectionKind, SectionRule};
use regex::{Regex, RegexBuilder};
use std::path::Path;

/// Code of the profile used when none is given
pub const DEFAULT_PROFILE: &str = "pci-dss";

/// A validated profile with compiled patterns
#[derive(Debug, Clone)]
pub struct Profile {
    config: ProfileConfig,
    pattern: IdentifierPattern,
    headers: RunningHeaderFilter,
    classifier: SectionClassifier,
    scorer: QualityScorer,
}

impl Profile {
    /// Embedded profile by code
    pub fn from_code(code: &str) -> Result<Self> {
        Self::from_config(get_profile_config(code)?.clone())
    }

    /// Profile from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoreError::ProfileParse(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Profile from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ProfileConfig = toml::from_str(content)
            .map_err(|e| CoreError::ProfileParse(format!("Failed to parse profile: {e}")))?;
        Self::from_config(config)
    }

    /// Validate and compile a configuration
    pub fn from_config(config: ProfileConfig) -> Result<Self> {
        config.validate().map_err(CoreError::InvalidConfig)?;

        let pattern = IdentifierPattern::new(&config.identifier.pattern)?;

        let mut rules = Vec::with_capacity(config.sections.len());
        for (key, section) in &config.sections {
            let kind: SectionKind = key.parse().map_err(CoreError::InvalidConfig)?;
            let patterns = section
                .patterns
                .iter()
                .enumerate()
                .map(|(i, p)| compile(p, true, &format!("sections.{key}.patterns[{i}]")))
                .collect::<Result<Vec<_>>>()?;
            rules.push(SectionRule {
                kind,
                keywords: section.keywords.iter().map(|k| k.to_lowercase()).collect(),
                patterns,
            });
        }
        let keywords: Vec<String> = rules.iter().flat_map(|r| r.keywords.iter().cloned()).collect();

        let header_patterns = config
            .running_headers
            .patterns
            .iter()
            .enumerate()
            .map(|(i, p)| compile(p, false, &format!("running_headers.patterns[{i}]")))
            .collect::<Result<Vec<_>>>()?;

        let scorer = build_scorer(&config)?;

        tracing::debug!(
            profile = %config.metadata.code,
            sections = rules.len(),
            "profile compiled"
        );

        Ok(Self {
            pattern,
            headers: RunningHeaderFilter::new(header_patterns, keywords),
            classifier: SectionClassifier::new(rules),
            scorer,
            config,
        })
    }

    /// Same profile with different chunk sizes
    pub fn with_chunking(mut self, target_tokens: usize, overlap_tokens: usize) -> Result<Self> {
        self.config.chunking.target_tokens = target_tokens;
        self.config.chunking.overlap_tokens = overlap_tokens;
        self.config.validate().map_err(CoreError::InvalidConfig)?;
        Ok(self)
    }

    pub fn code(&self) -> &str {
        &self.config.metadata.code
    }

    pub fn name(&self) -> &str {
        &self.config.metadata.name
    }

    pub fn config(&self) -> &ProfileConfig {
        &self.config
    }

    pub fn pattern(&self) -> &IdentifierPattern {
        &self.pattern
    }

    pub fn running_headers(&self) -> &RunningHeaderFilter {
        &self.headers
    }

    pub fn classifier(&self) -> &SectionClassifier {
        &self.classifier
    }

    pub fn scorer(&self) -> &QualityScorer {
        &self.scorer
    }

    pub fn expected_minimum_controls(&self) -> usize {
        self.config.assembly.expected_minimum_controls
    }

    pub fn pass_threshold(&self) -> f64 {
        self.config.quality.pass_threshold
    }

    /// Boundary detector with this profile's scan settings
    pub fn detector(&self) -> BoundaryDetector {
        let scan = &self.config.scan;
        let scanner = BackwardScanner::new(
            self.pattern.clone(),
            self.headers.clone(),
            scan.window,
            scan.min_content_chars,
            scan.bullet_markers.clone(),
        );
        BoundaryDetector::new(self.pattern.clone(), scanner)
    }

    pub fn assembler(&self) -> ControlAssembler {
        ControlAssembler::new(
            AssemblyOptions {
                continuation_separator: self.config.assembly.continuation_separator.clone(),
                strip_running_headers: self.config.assembly.strip_running_headers,
            },
            self.headers.clone(),
        )
    }

    pub fn splitter(&self) -> ChunkSplitter {
        let chunking = &self.config.chunking;
        ChunkSplitter::new(ChunkOptions {
            target_tokens: chunking.target_tokens,
            overlap_tokens: chunking.overlap_tokens,
            overshoot_tolerance: chunking.overshoot_tolerance,
            sentence_terminators: chunking.sentence_terminators.clone(),
            continuation_separator: self.config.assembly.continuation_separator.clone(),
        })
    }
}

fn compile(pattern: &str, multi_line: bool, name: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .multi_line(multi_line)
        .build()
        .map_err(|e| CoreError::pattern(name, e))
}

fn build_scorer(config: &ProfileConfig) -> Result<QualityScorer> {
    let mut sections = Vec::with_capacity(config.sections.len());
    for (key, section) in &config.sections {
        sections.push(SectionWeight {
            kind: key.parse().map_err(CoreError::InvalidConfig)?,
            weight: section.weight,
            required: section.required,
        });
    }

    let quality = &config.quality;
    let coherence = quality
        .coherence
        .iter()
        .map(|rule| CoherenceCheck {
            name: rule.name.clone(),
            when: Some(rule.when.trim().to_lowercase()).filter(|w| !w.is_empty()),
            expect: rule.expect.iter().map(|e| e.to_lowercase()).collect(),
            weight: rule.weight,
        })
        .collect();

    Ok(QualityScorer::new(
        sections,
        coherence,
        ScoringOptions {
            occurrence_weight: quality.identifier_occurrence_weight,
            expected_occurrences: quality.expected_identifier_occurrences,
            min_content_chars: quality.min_content_chars,
            grades: quality.grades,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[metadata]
code = "mini"
name = "Minimal"

[identifier]
pattern = '\d+(?:\.\d+)+'

[sections.requirement]
keywords = ["shall"]
weight = 50.0
required = true
"#;

    #[test]
    fn test_minimal_profile_uses_defaults() {
        let profile = Profile::from_toml_str(MINIMAL).unwrap();
        assert_eq!(profile.code(), "mini");
        assert_eq!(profile.config().scan.window, 50);
        assert_eq!(profile.config().scan.min_content_chars, 20);
        assert_eq!(profile.config().chunking.target_tokens, 300);
        assert_eq!(profile.classifier().rules().len(), 1);
    }

    #[test]
    fn test_scorer_options_follow_quality_table() {
        let profile = Profile::from_toml_str(MINIMAL).unwrap();
        let expected = ScoringOptions {
            occurrence_weight: 10.0,
            expected_occurrences: 2,
            min_content_chars: 0,
            grades: GradeThresholds::default(),
        };
        assert_eq!(profile.scorer().options(), &expected);
        assert_eq!(profile.scorer().options().grades, profile.config().quality.grades);
    }

    #[test]
    fn test_embedded_profiles_compile() {
        for code in list_available_profiles() {
            let profile = Profile::from_code(code).unwrap();
            assert_eq!(profile.code(), code);
        }
    }

    #[test]
    fn test_unknown_section_key_rejected() {
        let toml = format!("{MINIMAL}\n[sections.guidance]\nkeywords = [\"x\"]\n");
        assert!(matches!(
            Profile::from_toml_str(&toml),
            Err(CoreError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_bad_header_pattern_names_entry() {
        let toml = format!("{MINIMAL}\n[running_headers]\npatterns = [\"(open\"]\n");
        match Profile::from_toml_str(&toml) {
            Err(CoreError::InvalidPattern { name, .. }) => {
                assert_eq!(name, "running_headers.patterns[0]")
            }
            other => panic!("expected InvalidPattern, got {other:?}"),
        }
    }

    #[test]
    fn test_with_chunking_validates() {
        let profile = Profile::from_toml_str(MINIMAL).unwrap();
        assert!(profile.clone().with_chunking(100, 100).is_err());
        assert!(profile.clone().with_chunking(0, 0).is_err());
        let resized = profile.with_chunking(120, 20).unwrap();
        assert_eq!(resized.splitter().options().target_tokens, 120);
    }

    #[test]
    fn test_missing_file_is_profile_error() {
        let err = Profile::from_file("/nonexistent/profile.toml").unwrap_err();
        assert!(matches!(err, CoreError::ProfileParse(_)));
    }

    #[test]
    fn test_profile_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mini.toml");
        std::fs::write(&path, MINIMAL).unwrap();
        assert_eq!(Profile::from_file(&path).unwrap().name(), "Minimal");
    }
}
