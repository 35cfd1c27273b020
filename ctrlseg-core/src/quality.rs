//! Quality scoring
//!
//! The score is the share of configured weight a record earns, scaled to
//! `0..=100` and rounded to one decimal. Everything is evaluated over `Vec`s
//! in configuration order, so equal content always yields an equal report.

use crate::assembler::ControlRecord;
use crate::profile::GradeThresholds;
use crate::sections::SectionKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse quality bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityGrade {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl QualityGrade {
    pub const ALL: [QualityGrade; 4] = [
        QualityGrade::Excellent,
        QualityGrade::Good,
        QualityGrade::Fair,
        QualityGrade::Poor,
    ];

    /// Grade for a score under the given thresholds
    pub fn from_score(score: f64, thresholds: &GradeThresholds) -> Self {
        if score >= thresholds.excellent {
            QualityGrade::Excellent
        } else if score >= thresholds.good {
            QualityGrade::Good
        } else if score >= thresholds.fair {
            QualityGrade::Fair
        } else {
            QualityGrade::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityGrade::Excellent => "excellent",
            QualityGrade::Good => "good",
            QualityGrade::Fair => "fair",
            QualityGrade::Poor => "poor",
        }
    }
}

impl fmt::Display for QualityGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score with the reasons behind it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// Score in `0..=100`
    pub score: f64,
    pub grade: QualityGrade,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
    /// Word-bounded occurrences of the identifier in the content
    pub identifier_occurrences: usize,
}

/// Weight of one section kind
#[derive(Debug, Clone, PartialEq)]
pub struct SectionWeight {
    pub kind: SectionKind,
    pub weight: f64,
    pub required: bool,
}

/// Phrases expected to co-occur
#[derive(Debug, Clone, PartialEq)]
pub struct CoherenceCheck {
    pub name: String,
    /// Lowercase trigger phrase; `None` means the check always applies
    pub when: Option<String>,
    /// Lowercase phrases, any one satisfies the check
    pub expect: Vec<String>,
    pub weight: f64,
}

impl CoherenceCheck {
    fn satisfied(&self, lowered: &str) -> bool {
        let triggered = self.when.as_deref().map_or(true, |w| lowered.contains(w));
        !triggered || self.expect.iter().any(|e| lowered.contains(e.as_str()))
    }
}

/// Scalar scoring settings
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringOptions {
    pub occurrence_weight: f64,
    pub expected_occurrences: usize,
    pub min_content_chars: usize,
    pub grades: GradeThresholds,
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            occurrence_weight: 10.0,
            expected_occurrences: 2,
            min_content_chars: 0,
            grades: GradeThresholds::default(),
        }
    }
}

/// Weighted scorer for assembled and classified records
#[derive(Debug, Clone)]
pub struct QualityScorer {
    sections: Vec<SectionWeight>,
    coherence: Vec<CoherenceCheck>,
    options: ScoringOptions,
}

impl QualityScorer {
    pub fn new(
        mut sections: Vec<SectionWeight>,
        coherence: Vec<CoherenceCheck>,
        options: ScoringOptions,
    ) -> Self {
        sections.sort_by_key(|s| s.kind);
        Self {
            sections,
            coherence,
            options,
        }
    }

    pub fn options(&self) -> &ScoringOptions {
        &self.options
    }

    fn total_weight(&self) -> f64 {
        self.sections.iter().map(|s| s.weight).sum::<f64>()
            + self.options.occurrence_weight
            + self.coherence.iter().map(|c| c.weight).sum::<f64>()
    }

    /// Score a record; `record.sections` should already be classified
    pub fn score(&self, record: &ControlRecord) -> QualityReport {
        let mut earned = 0.0;
        let mut issues = Vec::new();
        let mut recommendations = Vec::new();

        for section in &self.sections {
            if record.has_section(section.kind) {
                earned += section.weight;
            } else if section.required {
                issues.push(format!("missing required section: {}", section.kind.label()));
            } else {
                recommendations.push(format!("consider capturing the {} section", section.kind.label()));
            }
        }

        let occurrences = count_identifier(&record.content, record.identifier.as_str());
        let expected = self.options.expected_occurrences;
        if expected == 0 || occurrences >= expected {
            earned += self.options.occurrence_weight;
        } else {
            earned += self.options.occurrence_weight * occurrences as f64 / expected as f64;
            issues.push(format!(
                "identifier {} appears {} time(s), expected at least {}",
                record.identifier, occurrences, expected
            ));
            recommendations.push(format!(
                "check that the testing procedures for {} were captured",
                record.identifier
            ));
        }

        let lowered = record.content.to_lowercase();
        for check in &self.coherence {
            if check.satisfied(&lowered) {
                earned += check.weight;
            } else {
                issues.push(format!("coherence check '{}' failed", check.name));
                recommendations.push(format!("expected one of: {}", check.expect.join(", ")));
            }
        }

        let chars = record.content.chars().count();
        if chars < self.options.min_content_chars {
            issues.push(format!(
                "content is {chars} characters, below the minimum of {}",
                self.options.min_content_chars
            ));
        }

        let total = self.total_weight();
        let raw = if total > 0.0 { earned / total * 100.0 } else { 0.0 };
        let score = ((raw * 10.0).round() / 10.0).clamp(0.0, 100.0);

        QualityReport {
            score,
            grade: QualityGrade::from_score(score, &self.options.grades),
            issues,
            recommendations,
            identifier_occurrences: occurrences,
        }
    }

    /// Score and attach the report to the record
    pub fn apply(&self, mut record: ControlRecord) -> ControlRecord {
        record.quality = Some(self.score(&record));
        record
    }
}

/// Occurrences of `identifier` not embedded in a longer identifier
///
/// `1.2.8.a` counts for `1.2.8`; `11.2.8`, `1.2.80` and `1.2.8.1` do not.
pub fn count_identifier(content: &str, identifier: &str) -> usize {
    if identifier.is_empty() {
        return 0;
    }
    content
        .match_indices(identifier)
        .filter(|(at, _)| {
            let before = content[..*at].chars().next_back();
            let mut after = content[at + identifier.len()..].chars();
            let before_ok = !before.is_some_and(|c| c.is_alphanumeric() || c == '.');
            let after_ok = match after.next() {
                None => true,
                Some('.') => !after.next().is_some_and(|c| c.is_ascii_digit()),
                Some(c) => !c.is_alphanumeric(),
            };
            before_ok && after_ok
        })
        .count()
}
