//! Outline parsing: indented text to an ordered sequence of leveled entries.
//!
//! One label per line. Depth is the number of leading `-` markers, separated
//! from the label by a single space:
//!
//! ```text
//! Europe
//! - France
//! -- Paris
//! ```
//!
//! Parsing is tolerant: blank lines are dropped, malformed lines become
//! top-level labels and over-indented lines are kept as-is. Both cases are
//! reported as [`OutlineWarning`]s rather than errors.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::error::DomainError;

/// Character repeated at the start of a line to encode its depth.
pub const MARKER: char = '-';

/// One label of the outline with its zero-based depth.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeveledEntry {
    pub level: usize,
    pub label: String,
}

impl LeveledEntry {
    /// Create an entry, trimming the label. Blank labels are rejected.
    pub fn new(level: usize, label: impl Into<String>) -> Result<Self, DomainError> {
        let label = label.into();
        let label = label.trim();
        if label.is_empty() {
            return Err(DomainError::EmptyLabel { level });
        }
        Ok(Self {
            level,
            label: label.to_string(),
        })
    }

    /// Entry at the same label with a different level.
    pub fn with_level(&self, level: usize) -> Self {
        Self {
            level,
            label: self.label.clone(),
        }
    }
}

impl fmt::Display for LeveledEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_line(self.level, &self.label))
    }
}

/// Render a single outline line: bare label at depth 0, otherwise markers,
/// one space, label.
pub(crate) fn format_line(level: usize, label: &str) -> String {
    if level == 0 {
        label.to_string()
    } else {
        format!("{} {}", MARKER.to_string().repeat(level), label)
    }
}

/// Effective level of an entry given the effective level of its predecessor.
///
/// The first entry is always a root; afterwards depth may grow by one at most.
pub(crate) fn clamp_level(level: usize, previous: Option<usize>) -> usize {
    match previous {
        None => 0,
        Some(prev) => level.min(prev + 1),
    }
}

/// What went wrong on a line that was accepted anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Markers without a single space and a label; kept as a top-level label.
    MalformedLine,
    /// Indentation more than one level deeper than the previous line.
    DepthJump,
}

/// Non-blocking annotation for a line of the edited outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineWarning {
    /// Physical line number in the input, 1-based.
    pub line: usize,
    pub kind: WarningKind,
    /// The offending line, trimmed.
    pub text: String,
}

impl fmt::Display for OutlineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            WarningKind::MalformedLine => write!(
                f,
                "line {}: malformed outline line, kept as top-level label: {}",
                self.line, self.text
            ),
            WarningKind::DepthJump => write!(
                f,
                "line {}: indentation jumps more than one level, attached to deepest open label: {}",
                self.line, self.text
            ),
        }
    }
}

/// Result of parsing an outline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedOutline {
    pub entries: Vec<LeveledEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<OutlineWarning>,
}

impl ParsedOutline {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// A trimmed, non-blank input line.
#[derive(Debug)]
struct RawLine<'a> {
    number: usize,
    text: &'a str,
}

// Old Mac and reversed line endings show up in pasted text.
static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n|\n\r|\r|\n").expect("line break pattern"));
static MARKED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(-+) (.+)$").expect("marked line pattern"));

/// Parses outline text into leveled entries.
#[derive(Debug, Default, Clone, Copy)]
pub struct OutlineParser;

impl OutlineParser {
    pub fn new() -> Self {
        Self
    }

    /// Number of non-blank lines, split the same way [`Self::parse`] splits.
    pub fn line_count(&self, text: &str) -> usize {
        self.raw_lines(text).count()
    }

    /// Parse outline text. Never fails; see [`OutlineWarning`] for what gets
    /// reported instead.
    #[instrument(level = "debug", skip_all, fields(bytes = text.len()))]
    pub fn parse(&self, text: &str) -> ParsedOutline {
        let mut parsed = ParsedOutline::default();
        let mut previous: Option<usize> = None;

        for raw in self.raw_lines(text) {
            let (entry, malformed) = self.classify(&raw);
            if malformed {
                debug!(line = raw.number, "malformed outline line: {:?}", raw.text);
                parsed.warnings.push(OutlineWarning {
                    line: raw.number,
                    kind: WarningKind::MalformedLine,
                    text: raw.text.to_string(),
                });
            }

            let effective = clamp_level(entry.level, previous);
            if effective < entry.level {
                parsed.warnings.push(OutlineWarning {
                    line: raw.number,
                    kind: WarningKind::DepthJump,
                    text: raw.text.to_string(),
                });
            }
            previous = Some(effective);
            parsed.entries.push(entry);
        }

        debug!(
            entries = parsed.entries.len(),
            warnings = parsed.warnings.len(),
            "parsed outline"
        );
        parsed
    }

    fn raw_lines<'a>(&self, text: &'a str) -> impl Iterator<Item = RawLine<'a>> {
        LINE_BREAK
            .split(text)
            .enumerate()
            .map(|(idx, line)| RawLine {
                number: idx + 1,
                text: line.trim(),
            })
            .filter(|raw| !raw.text.is_empty())
    }

    /// Returns the entry for a line and whether the line was malformed.
    fn classify(&self, raw: &RawLine<'_>) -> (LeveledEntry, bool) {
        if !raw.text.starts_with(MARKER) {
            return (top_level(raw.text), false);
        }
        match MARKED_LINE.captures(raw.text) {
            Some(caps) => {
                let level = caps[1].len();
                let label = caps[2].trim();
                (
                    LeveledEntry {
                        level,
                        label: label.to_string(),
                    },
                    false,
                )
            }
            None => (top_level(raw.text), true),
        }
    }
}

fn top_level(text: &str) -> LeveledEntry {
    LeveledEntry {
        level: 0,
        label: text.to_string(),
    }
}

/// Parse outline text, discarding warnings.
pub fn parse(text: &str) -> Vec<LeveledEntry> {
    OutlineParser::new().parse(text).entries
}

/// Clamp levels so the first entry is a root and depth grows by one at most.
///
/// This is the shape [`crate::domain::TreeBuilder`] effectively sees.
pub fn normalize_levels(entries: &[LeveledEntry]) -> Vec<LeveledEntry> {
    let mut previous = None;
    entries
        .iter()
        .map(|entry| {
            let level = clamp_level(entry.level, previous);
            previous = Some(level);
            entry.with_level(level)
        })
        .collect()
}

/// Depth of the forest the entries build into (0 for no entries).
pub fn outline_depth(entries: &[LeveledEntry]) -> usize {
    let mut previous = None;
    let mut deepest = None;
    for entry in entries {
        let level = clamp_level(entry.level, previous);
        previous = Some(level);
        deepest = deepest.max(Some(level));
    }
    deepest.map_or(0, |level| level + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn entry(level: usize, label: &str) -> LeveledEntry {
        LeveledEntry::new(level, label).unwrap()
    }

    #[test]
    fn given_places_outline_when_parsing_then_counts_markers() {
        let text = "Europe\n- France\n-- Paris\n- United Kingdom\nAsia\n- Japan\n";

        let parsed = OutlineParser::new().parse(text);

        assert!(parsed.is_clean());
        assert_eq!(
            parsed.entries,
            vec![
                entry(0, "Europe"),
                entry(1, "France"),
                entry(2, "Paris"),
                entry(1, "United Kingdom"),
                entry(0, "Asia"),
                entry(1, "Japan"),
            ]
        );
    }

    #[rstest]
    #[case("Paris", 0, "Paris")]
    #[case("  Paris  ", 0, "Paris")]
    #[case("- Paris", 1, "Paris")]
    #[case("--- Paris", 3, "Paris")]
    #[case("--  Paris", 2, "Paris")]
    #[case("- Saint-Denis - Nord", 1, "Saint-Denis - Nord")]
    #[case("Ile-de-France", 0, "Ile-de-France")]
    fn given_single_line_when_parsing_then_level_and_label_match(
        #[case] line: &str,
        #[case] level: usize,
        #[case] label: &str,
    ) {
        let parsed = OutlineParser::new().parse(line);

        assert_eq!(parsed.entries, vec![entry(level, label)]);
    }

    #[rstest]
    #[case("--Paris")]
    #[case("---")]
    #[case("-- ")]
    #[case("-\tParis")]
    fn given_malformed_line_when_parsing_then_kept_at_top_level_with_warning(#[case] line: &str) {
        let parsed = OutlineParser::new().parse(line);

        assert_eq!(parsed.entries, vec![entry(0, line.trim())]);
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(parsed.warnings[0].kind, WarningKind::MalformedLine);
        assert_eq!(parsed.warnings[0].line, 1);
    }

    #[test]
    fn given_blank_lines_when_parsing_then_ignored_but_line_numbers_kept() {
        let text = "\n\nEurope\n   \n--Paris\n";

        let parsed = OutlineParser::new().parse(text);

        assert_eq!(parsed.entries.len(), 2);
        assert_eq!(parsed.warnings[0].line, 5);
    }

    #[rstest]
    #[case("Europe\r\n- France\r\n")]
    #[case("Europe\r- France\r")]
    #[case("Europe\n\r- France\n\r")]
    fn given_foreign_line_endings_when_parsing_then_lines_split(#[case] text: &str) {
        assert_eq!(parse(text), vec![entry(0, "Europe"), entry(1, "France")]);
    }

    #[rstest]
    #[case("a\nb\nc\nd")]
    #[case("a\rb\rc\rd")]
    #[case("a\n\rb\n\rc\n\rd")]
    #[case("\r\na\r\n\r\nb\rc\n\n d \r")]
    fn given_any_line_ending_when_counting_lines_then_blank_lines_skipped(#[case] text: &str) {
        assert_eq!(OutlineParser::new().line_count(text), 4);
    }

    #[test]
    fn given_over_indented_line_when_parsing_then_level_kept_and_warned() {
        let parsed = OutlineParser::new().parse("Europe\n--- Lost");

        assert_eq!(parsed.entries[1], entry(3, "Lost"));
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(parsed.warnings[0].kind, WarningKind::DepthJump);
        assert_eq!(parsed.warnings[0].line, 2);
    }

    #[test]
    fn given_indented_first_line_when_parsing_then_depth_jump_reported() {
        let parsed = OutlineParser::new().parse("- France");

        assert_eq!(parsed.warnings[0].kind, WarningKind::DepthJump);
    }

    #[test]
    fn given_empty_text_when_parsing_then_no_entries() {
        let parsed = OutlineParser::new().parse("");

        assert!(parsed.entries.is_empty());
        assert!(parsed.is_clean());
    }

    #[test]
    fn given_jumping_levels_when_measuring_depth_then_clamped_depth_returned() {
        let entries = vec![entry(0, "a"), entry(5, "b"), entry(2, "c"), entry(0, "d")];

        assert_eq!(outline_depth(&entries), 3);
        assert_eq!(outline_depth(&[]), 0);
    }

    #[test]
    fn given_jumping_levels_when_normalizing_then_depth_grows_by_one_at_most() {
        let entries = vec![entry(2, "a"), entry(4, "b"), entry(1, "c"), entry(3, "d")];

        let levels: Vec<usize> = normalize_levels(&entries).iter().map(|e| e.level).collect();

        assert_eq!(levels, vec![0, 1, 1, 2]);
    }

    #[test]
    fn given_blank_label_when_creating_entry_then_errors() {
        assert_eq!(
            LeveledEntry::new(2, "   "),
            Err(DomainError::EmptyLabel { level: 2 })
        );
    }

    #[rstest]
    #[case(0, "Europe", "Europe")]
    #[case(1, "France", "- France")]
    #[case(3, "London", "--- London")]
    fn given_entry_when_displaying_then_outline_line(
        #[case] level: usize,
        #[case] label: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(entry(level, label).to_string(), expected);
    }
}
