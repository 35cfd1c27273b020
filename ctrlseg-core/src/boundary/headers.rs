//! Running header, footer and keyword matching shared by the scan and the assembler

use regex::Regex;

/// Matches page furniture (document title, copyright line, page numbers)
///
/// A line carrying a section keyword is never treated as furniture, because
/// section headers can coincide lexically with footer text.
#[derive(Debug, Clone, Default)]
pub struct RunningHeaderFilter {
    patterns: Vec<Regex>,
    keywords: Vec<String>,
}

impl RunningHeaderFilter {
    /// Create a filter from compiled patterns and lowercase section keywords
    pub fn new(patterns: Vec<Regex>, keywords: Vec<String>) -> Self {
        Self { patterns, keywords }
    }

    /// True if the line contains a section keyword
    pub fn has_keyword(&self, line: &str) -> bool {
        let lowered = line.to_lowercase();
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }

    /// True if a header/footer pattern matches, ignoring keywords
    pub fn matches_pattern(&self, line: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(line))
    }

    /// Furniture that should stop a scan or be dropped from content
    pub fn is_running_header(&self, line: &str) -> bool {
        self.matches_pattern(line) && !self.has_keyword(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::RegexBuilder;

    fn filter() -> RunningHeaderFilter {
        let patterns = ["^payment card industry", r"^page \d+$"]
            .iter()
            .map(|p| RegexBuilder::new(p).case_insensitive(true).build().unwrap())
            .collect();
        RunningHeaderFilter::new(patterns, vec!["purpose".into()])
    }

    #[test]
    fn test_footer_detected() {
        assert!(filter().is_running_header("Page 12"));
        assert!(filter().is_running_header("Payment Card Industry Data Security Standard v4.0"));
        assert!(!filter().is_running_header("Firewall rules are reviewed"));
    }

    #[test]
    fn test_keyword_overrides_footer() {
        let line = "Payment Card Industry purpose statement";
        assert!(filter().matches_pattern(line));
        assert!(!filter().is_running_header(line));
    }
}
