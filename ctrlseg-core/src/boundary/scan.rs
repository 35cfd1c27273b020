//! Backward-start scan as an ordered rule list
//!
//! Lines are visited from the candidate upwards. For each line the rules are
//! evaluated top to bottom and the first match decides. Blank lines removed by
//! the line store are replayed from `gap_before` and count as separators.

use super::{headers::RunningHeaderFilter, IdentifierPattern};
use crate::line_store::{Line, LineStore};
use serde::{Deserialize, Serialize};

/// Why a backward scan ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStop {
    /// Hit a line led by another identifier
    IdentifierLine,
    /// Hit page furniture without a section keyword
    RunningHeader,
    /// Hit two or more consecutive blank or bullet-only lines
    SeparatorRun,
    /// Used up the window in the middle of the document; the start is still 0
    WindowExhausted,
    /// Reached the first line of the document
    DocumentStart,
}

/// What a matching rule does with a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanAction {
    /// Exclude the line and end the scan
    Stop(ScanStop),
    /// Keep the line and continue upwards
    Include,
    /// Bullet-only line, counts towards a separator run
    Separator,
}

/// A named predicate/action pair
pub struct ScanRule {
    /// Stable rule name, used in logs and tests
    pub name: &'static str,
    matches: fn(&BackwardScanner, &Line) -> bool,
    /// Action taken when the predicate holds
    pub action: ScanAction,
}

impl std::fmt::Debug for ScanRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanRule")
            .field("name", &self.name)
            .field("action", &self.action)
            .finish()
    }
}

fn identifier_line(scanner: &BackwardScanner, line: &Line) -> bool {
    scanner.pattern.is_identifier_led(line.text())
}

fn running_header(scanner: &BackwardScanner, line: &Line) -> bool {
    scanner.headers.is_running_header(line.text())
}

fn section_content(scanner: &BackwardScanner, line: &Line) -> bool {
    scanner.headers.has_keyword(line.text())
        || (line.char_len() >= scanner.min_content_chars && !scanner.is_bullet(line.text()))
}

fn separator(scanner: &BackwardScanner, line: &Line) -> bool {
    scanner.is_bullet(line.text())
}

fn fragment(_: &BackwardScanner, _: &Line) -> bool {
    true
}

/// Rules in evaluation order
pub static RULES: [ScanRule; 5] = [
    ScanRule {
        name: "identifier-line",
        matches: identifier_line,
        action: ScanAction::Stop(ScanStop::IdentifierLine),
    },
    ScanRule {
        name: "running-header",
        matches: running_header,
        action: ScanAction::Stop(ScanStop::RunningHeader),
    },
    ScanRule {
        name: "section-content",
        matches: section_content,
        action: ScanAction::Include,
    },
    ScanRule {
        name: "separator",
        matches: separator,
        action: ScanAction::Separator,
    },
    // short wrapped tails ("networks.") belong to the surrounding paragraph and
    // end a separator run like any other content line
    ScanRule {
        name: "fragment",
        matches: fragment,
        action: ScanAction::Include,
    },
];

/// Result of one backward scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOutcome {
    /// First line of the control's content
    pub start: usize,
    /// Why the scan ended
    pub stop: ScanStop,
}

/// Bounded backward scanner
#[derive(Debug, Clone)]
pub struct BackwardScanner {
    pattern: IdentifierPattern,
    headers: RunningHeaderFilter,
    window: usize,
    min_content_chars: usize,
    bullet_markers: Vec<String>,
}

impl BackwardScanner {
    /// Create a scanner
    pub fn new(
        pattern: IdentifierPattern,
        headers: RunningHeaderFilter,
        window: usize,
        min_content_chars: usize,
        bullet_markers: Vec<String>,
    ) -> Self {
        Self {
            pattern,
            headers,
            window,
            min_content_chars,
            bullet_markers,
        }
    }

    /// Window size in lines
    pub fn window(&self) -> usize {
        self.window
    }

    /// True for a line made of a lone bullet marker
    pub fn is_bullet(&self, text: &str) -> bool {
        let trimmed = text.trim();
        self.bullet_markers.iter().any(|m| m == trimmed)
    }

    /// First rule matching `line`
    pub fn matching_rule(&self, line: &Line) -> &'static ScanRule {
        RULES
            .iter()
            .find(|rule| (rule.matches)(self, line))
            .unwrap_or(&RULES[RULES.len() - 1])
    }

    /// Find the first content line of the control whose identifier sits on `line_index`
    pub fn scan(&self, store: &LineStore, line_index: usize) -> ScanOutcome {
        let lines = store.lines();
        let line_index = line_index.min(lines.len().saturating_sub(1));
        let lower = line_index.saturating_sub(self.window);

        let mut current = line_index;
        let mut run = 0usize;
        let mut after_run = line_index;

        while current > lower {
            run += lines[current].gap_before();
            if run >= 2 {
                return ScanOutcome {
                    start: after_run,
                    stop: ScanStop::SeparatorRun,
                };
            }

            let previous = current - 1;
            let rule = self.matching_rule(&lines[previous]);
            match rule.action {
                ScanAction::Stop(stop) => {
                    tracing::trace!(line = previous, rule = rule.name, "backward scan stopped");
                    return ScanOutcome {
                        start: current,
                        stop,
                    };
                }
                ScanAction::Separator => {
                    run += 1;
                    if run >= 2 {
                        return ScanOutcome {
                            start: after_run,
                            stop: ScanStop::SeparatorRun,
                        };
                    }
                }
                ScanAction::Include => {
                    run = 0;
                    after_run = previous;
                }
            }
            current = previous;
        }

        // no stop within reach: claim everything up to the document start and
        // leave the floor at the previous candidate to span resolution
        ScanOutcome {
            start: 0,
            stop: if lower == 0 {
                ScanStop::DocumentStart
            } else {
                ScanStop::WindowExhausted
            },
        }
    }
}
