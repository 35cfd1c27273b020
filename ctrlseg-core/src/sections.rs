//! Section classification
//!
//! Presence is binary: a section counts as present when any of its keywords or
//! patterns occurs anywhere in the assembled content. A keyword that only shows
//! up in a cross-reference is still counted.

use crate::assembler::ControlRecord;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Canonical section kinds of a control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// The requirement statement itself
    Requirement,
    /// Testing procedures used by assessors
    TestingProcedure,
    /// Purpose guidance
    Purpose,
    /// Examples guidance
    Examples,
    /// Good practice guidance
    GoodPractice,
    /// Customized approach objective
    CustomizedApproach,
    /// Applicability notes
    Applicability,
}

impl SectionKind {
    /// All kinds in canonical order
    pub const ALL: [SectionKind; 7] = [
        SectionKind::Requirement,
        SectionKind::TestingProcedure,
        SectionKind::Purpose,
        SectionKind::Examples,
        SectionKind::GoodPractice,
        SectionKind::CustomizedApproach,
        SectionKind::Applicability,
    ];

    /// Configuration key
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Requirement => "requirement",
            SectionKind::TestingProcedure => "testing_procedure",
            SectionKind::Purpose => "purpose",
            SectionKind::Examples => "examples",
            SectionKind::GoodPractice => "good_practice",
            SectionKind::CustomizedApproach => "customized_approach",
            SectionKind::Applicability => "applicability",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            SectionKind::Requirement => "requirement statement",
            SectionKind::TestingProcedure => "testing procedure",
            SectionKind::Purpose => "purpose",
            SectionKind::Examples => "examples",
            SectionKind::GoodPractice => "good practice",
            SectionKind::CustomizedApproach => "customized approach objective",
            SectionKind::Applicability => "applicability notes",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown section kind '{s}'"))
    }
}

/// Byte offset where a line opening a section begins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionMark {
    /// Section opened at this line
    pub kind: SectionKind,
    /// Byte offset of the line start in the assembled content
    pub offset: usize,
}

/// Anchors for one section kind
#[derive(Debug, Clone)]
pub struct SectionRule {
    /// Section kind
    pub kind: SectionKind,
    /// Lowercase keywords matched as substrings
    pub keywords: Vec<String>,
    /// Case-insensitive, multi-line patterns
    pub patterns: Vec<Regex>,
}

impl SectionRule {
    fn present_in(&self, lowered: &str, original: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
            || self.patterns.iter().any(|p| p.is_match(original))
    }

    fn opens_line(&self, line: &str) -> bool {
        let head = line.trim_start_matches(|c: char| !c.is_alphanumeric());
        let lowered = head.to_lowercase();
        self.keywords.iter().any(|k| lowered.starts_with(k.as_str()))
            || self
                .patterns
                .iter()
                .any(|p| p.find(line).is_some_and(|m| m.start() == 0))
    }
}

/// Keyword/pattern based section classifier
#[derive(Debug, Clone)]
pub struct SectionClassifier {
    rules: Vec<SectionRule>,
}

impl SectionClassifier {
    /// Build from rules; rules are kept in canonical kind order
    pub fn new(mut rules: Vec<SectionRule>) -> Self {
        rules.sort_by_key(|r| r.kind);
        Self { rules }
    }

    /// Rules in canonical order
    pub fn rules(&self) -> &[SectionRule] {
        &self.rules
    }

    /// True if the line carries any section keyword
    pub fn has_keyword(&self, line: &str) -> bool {
        let lowered = line.to_lowercase();
        self.rules
            .iter()
            .flat_map(|r| r.keywords.iter())
            .any(|k| lowered.contains(k.as_str()))
    }

    /// Section presence for arbitrary content
    pub fn presence(&self, content: &str) -> BTreeMap<SectionKind, bool> {
        let lowered = content.to_lowercase();
        self.rules
            .iter()
            .map(|rule| (rule.kind, rule.present_in(&lowered, content)))
            .collect()
    }

    /// Offsets of lines that open a section, in content order
    pub fn marks(&self, content: &str) -> Vec<SectionMark> {
        let mut marks = Vec::new();
        let mut offset = 0usize;
        for line in content.split_inclusive('\n') {
            if let Some(rule) = self.rules.iter().find(|r| r.opens_line(line)) {
                marks.push(SectionMark {
                    kind: rule.kind,
                    offset,
                });
            }
            offset += line.len();
        }
        marks
    }

    /// Populate `sections` and `section_marks` of a record
    ///
    /// Pure function of the content; line ranges are left untouched.
    pub fn classify(&self, mut record: ControlRecord) -> ControlRecord {
        record.sections = self.presence(&record.content);
        record.section_marks = self.marks(&record.content);
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::RegexBuilder;

    fn classifier() -> SectionClassifier {
        let pattern = |p: &str| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .multi_line(true)
                .build()
                .unwrap()
        };
        SectionClassifier::new(vec![
            SectionRule {
                kind: SectionKind::Purpose,
                keywords: vec!["purpose".into()],
                patterns: vec![],
            },
            SectionRule {
                kind: SectionKind::TestingProcedure,
                keywords: vec!["testing procedures".into()],
                patterns: vec![pattern(r"^\d+(\.\d+)+\.[a-z]\s")],
            },
            SectionRule {
                kind: SectionKind::Examples,
                keywords: vec!["examples".into()],
                patterns: vec![],
            },
        ])
    }

    #[test]
    fn test_presence_is_case_insensitive() {
        let presence = classifier().presence("PURPOSE\nSomething\n1.2.8.a Examine files");
        assert_eq!(presence[&SectionKind::Purpose], true);
        assert_eq!(presence[&SectionKind::TestingProcedure], true);
        assert_eq!(presence[&SectionKind::Examples], false);
    }

    #[test]
    fn test_rules_sorted_canonically() {
        let kinds: Vec<_> = classifier().rules().iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::TestingProcedure,
                SectionKind::Purpose,
                SectionKind::Examples
            ]
        );
    }

    #[test]
    fn test_marks_point_at_line_starts() {
        let content = "1.2.8 Requirement text\nPurpose\nWhy it matters.\n1.2.8.a Examine files";
        let marks = classifier().marks(content);

        assert_eq!(marks.len(), 2);
        assert_eq!(marks[0].kind, SectionKind::Purpose);
        assert_eq!(&content[marks[0].offset..marks[0].offset + 7], "Purpose");
        assert_eq!(marks[1].kind, SectionKind::TestingProcedure);
        assert!(content[marks[1].offset..].starts_with("1.2.8.a"));
    }

    #[test]
    fn test_keyword_mid_line_does_not_open_section() {
        let marks = classifier().marks("see purpose of 1.2.7");
        assert!(marks.is_empty());
        assert!(classifier().has_keyword("see purpose of 1.2.7"));
    }

    #[test]
    fn test_section_kind_round_trip_through_str() {
        for kind in SectionKind::ALL {
            assert_eq!(kind.as_str().parse::<SectionKind>().unwrap(), kind);
        }
        assert!("guidance".parse::<SectionKind>().is_err());
    }
}
