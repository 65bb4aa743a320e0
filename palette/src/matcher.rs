//! Single-field string matching: exact, prefix, substring, then fuzzy subsequence.
//!
//! Scores are tuned so that, for realistic palette labels, each tier lands
//! well above the next. The ranker still sorts on `MatchKind` first, so an
//! exact match outranks a fuzzy one even where the numbers would overlap.
//!
//! Matching runs on normalized (trimmed, lower-cased) text, but the ranges
//! handed back are char indices into the value as given, so they can be
//! applied to the displayed field directly.

use crate::interface::{HighlightRange, MatchKind};

pub const EXACT_SCORE: f64 = 1600.0;

pub const PREFIX_SCORE: f64 = 1300.0;
/// Per char of value left over after the prefix
const PREFIX_TAIL_PENALTY: f64 = 2.0;

pub const SUBSTRING_SCORE: f64 = 1020.0;
/// Per char of offset before the occurrence
const SUBSTRING_OFFSET_PENALTY: f64 = 12.0;

pub const FUZZY_BASE_SCORE: f64 = 520.0;
const FUZZY_GAP_PENALTY: f64 = 7.0;
const FUZZY_CONTIGUITY_BONUS: f64 = 18.0;
const FUZZY_START_BONUS: f64 = 16.0;
const FUZZY_BOUNDARY_BONUS: f64 = 8.0;
const FUZZY_DENSITY_PENALTY: f64 = 0.75;

/// Leading sigil on slash-command labels. A query that doesn't type it
/// matches as if the label didn't carry it.
pub const COMMAND_SIGIL: char = '/';

/// Outcome of matching one query against one string.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub score: f64,
    pub match_kind: MatchKind,
    pub ranges: Vec<HighlightRange>,
}

impl MatchResult {
    fn empty() -> Self {
        Self {
            score: 0.0,
            match_kind: MatchKind::Empty,
            ranges: Vec::new(),
        }
    }

    fn shifted(mut self, offset: usize) -> Self {
        for r in &mut self.ranges {
            r.start += offset;
            r.end += offset;
        }
        self
    }
}

/// Trim and lower-case text for comparison.
///
/// Lower-cases char by char so each output char traces back to exactly one
/// input char (see [`NormalizedText`]).
pub fn normalize(text: &str) -> String {
    text.trim().chars().flat_map(char::to_lowercase).collect()
}

/// Normalized copy of a field plus, for every normalized char, the index of
/// the displayed char it came from.
///
/// Trimming shifts offsets, and lower-casing can expand one char into several
/// (`İ` becomes `i̇`), so the two texts are not index-compatible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText {
    text: String,
    origins: Vec<usize>,
}

impl NormalizedText {
    pub fn new(raw: &str) -> Self {
        let leading = raw.chars().take_while(|c| c.is_whitespace()).count();
        let mut text = String::with_capacity(raw.len());
        let mut origins = Vec::with_capacity(raw.len());
        for (i, ch) in raw.trim().chars().enumerate() {
            for lower in ch.to_lowercase() {
                text.push(lower);
                origins.push(leading + i);
            }
        }
        Self { text, origins }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Map ranges over the normalized text onto the displayed text.
    ///
    /// Runs that land on the same or adjacent displayed chars are merged, so
    /// the output stays sorted, disjoint and maximal.
    pub fn display_ranges(&self, ranges: &[HighlightRange]) -> Vec<HighlightRange> {
        let mut out: Vec<HighlightRange> = Vec::with_capacity(ranges.len());
        for r in ranges.iter().filter(|r| !r.is_empty()) {
            let (Some(&start), Some(&last)) = (self.origins.get(r.start), self.origins.get(r.end - 1)) else {
                continue;
            };
            let end = last + 1;
            match out.last_mut() {
                Some(prev) if prev.end >= start => prev.end = prev.end.max(end),
                _ => out.push(HighlightRange::new(start, end)),
            }
        }
        out
    }
}

/// Match `query` against `value`, normalizing both first.
///
/// A blank query yields an `Empty` result, never `None`. `None` means no
/// match: there is no partial credit for a query that isn't fully found.
pub fn match_string(query: &str, value: &str) -> Option<MatchResult> {
    match_field(&normalize(query), &NormalizedText::new(value))
}

/// Match an already-normalized query against a prepared field. Ranges come
/// back in displayed-text positions.
pub(crate) fn match_field(query: &str, field: &NormalizedText) -> Option<MatchResult> {
    match_normalized(query, field.as_str()).map(|mut m| {
        m.ranges = field.display_ranges(&m.ranges);
        m
    })
}

/// Like [`match_string`], for inputs that are already normalized. Ranges are
/// positions in the normalized `value`.
fn match_normalized(query: &str, value: &str) -> Option<MatchResult> {
    if query.is_empty() {
        return Some(MatchResult::empty());
    }
    if value.is_empty() {
        return None;
    }

    if !query.starts_with(COMMAND_SIGIL) {
        if let Some(rest) = value.strip_prefix(COMMAND_SIGIL) {
            if !rest.is_empty() {
                return match_value(query, rest).map(|m| m.shifted(1));
            }
        }
    }

    match_value(query, value)
}

fn match_value(query: &str, value: &str) -> Option<MatchResult> {
    let query_len = query.chars().count();

    if value == query {
        return Some(MatchResult {
            score: EXACT_SCORE,
            match_kind: MatchKind::Exact,
            ranges: vec![HighlightRange::new(0, query_len)],
        });
    }

    let value_len = value.chars().count();

    if value.starts_with(query) {
        let tail = value_len.saturating_sub(query_len);
        return Some(MatchResult {
            score: PREFIX_SCORE - PREFIX_TAIL_PENALTY * tail as f64,
            match_kind: MatchKind::Prefix,
            ranges: vec![HighlightRange::new(0, query_len)],
        });
    }

    if let Some(byte_pos) = value.find(query) {
        let pos = value[..byte_pos].chars().count();
        return Some(MatchResult {
            score: SUBSTRING_SCORE - SUBSTRING_OFFSET_PENALTY * pos as f64,
            match_kind: MatchKind::Substring,
            ranges: vec![HighlightRange::new(pos, pos + query_len)],
        });
    }

    fuzzy_match(query, value, query_len, value_len)
}

/// Greedy left-to-right subsequence match.
fn fuzzy_match(query: &str, value: &str, query_len: usize, value_len: usize) -> Option<MatchResult> {
    let mut positions: Vec<usize> = Vec::with_capacity(query_len);
    let mut bonus = 0.0;
    let mut penalty = 0.0;

    let mut value_chars = value.chars().enumerate();
    // Char just before the scan position, for word-boundary checks
    let mut prev_char: Option<char> = None;
    let mut last_pos: Option<usize> = None;

    for qc in query.chars() {
        let mut found = None;
        for (idx, vc) in value_chars.by_ref() {
            let before = prev_char;
            prev_char = Some(vc);
            if vc == qc {
                found = Some((idx, before));
                break;
            }
        }
        let (pos, before) = found?;

        let skipped = match last_pos {
            Some(last) => pos - last - 1,
            None => pos,
        };
        penalty += FUZZY_GAP_PENALTY * skipped as f64;

        if last_pos.is_some_and(|last| pos == last + 1) {
            bonus += FUZZY_CONTIGUITY_BONUS;
        }
        if pos == 0 {
            bonus += FUZZY_START_BONUS;
        } else if before.is_some_and(|c| !c.is_alphanumeric()) {
            bonus += FUZZY_BOUNDARY_BONUS;
        }

        positions.push(pos);
        last_pos = Some(pos);
    }

    let density_penalty = FUZZY_DENSITY_PENALTY * value_len.saturating_sub(query_len) as f64;

    Some(MatchResult {
        score: FUZZY_BASE_SCORE + bonus - penalty - density_penalty,
        match_kind: MatchKind::Fuzzy,
        ranges: indices_to_ranges(&positions),
    })
}

/// Collapse ascending char indices into maximal contiguous half-open runs.
fn indices_to_ranges(indices: &[usize]) -> Vec<HighlightRange> {
    let mut ranges: Vec<HighlightRange> = Vec::new();
    for &idx in indices {
        match ranges.last_mut() {
            Some(last) if last.end == idx => last.end = idx + 1,
            _ => ranges.push(HighlightRange::new(idx, idx + 1)),
        }
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hr(start: usize, end: usize) -> HighlightRange {
        HighlightRange::new(start, end)
    }

    // ── tier tests ───────────────────────────────────────────────

    #[test]
    fn test_exact_match() {
        let m = match_string("Help", "  help ").unwrap();
        assert_eq!(m.match_kind, MatchKind::Exact);
        assert_eq!(m.score, 1600.0);
        // Positions in the value as given, leading spaces included
        assert_eq!(m.ranges, vec![hr(2, 6)]);
    }

    #[test]
    fn test_prefix_match_penalizes_tail() {
        let m = match_string("set", "settings").unwrap();
        assert_eq!(m.match_kind, MatchKind::Prefix);
        assert_eq!(m.score, 1290.0);
        assert_eq!(m.ranges, vec![hr(0, 3)]);

        let shorter = match_string("set", "setup").unwrap();
        assert!(shorter.score > m.score);
    }

    #[test]
    fn test_substring_match_prefers_earlier_occurrence() {
        let m = match_string("ing", "settings").unwrap();
        assert_eq!(m.match_kind, MatchKind::Substring);
        assert_eq!(m.score, 960.0);
        assert_eq!(m.ranges, vec![hr(5, 8)]);

        let earlier = match_string("ing", "xingxx").unwrap();
        assert!(earlier.score > m.score);
    }

    #[test]
    fn test_fuzzy_match_ranges_and_score() {
        let m = match_string("hlp", "help").unwrap();
        assert_eq!(m.match_kind, MatchKind::Fuzzy);
        assert_eq!(m.ranges, vec![hr(0, 1), hr(2, 4)]);
        // 520 + start 16 + contiguity 18 - gap 7 - density 0.75
        assert_eq!(m.score, 546.25);
    }

    #[test]
    fn test_fuzzy_word_boundary_bonus() {
        let m = match_string("nc", "new chat").unwrap();
        assert_eq!(m.match_kind, MatchKind::Fuzzy);
        assert_eq!(m.ranges, vec![hr(0, 1), hr(4, 5)]);
        // 520 + start 16 + boundary 8 - gap 21 - density 4.5
        assert_eq!(m.score, 518.5);
    }

    #[test]
    fn test_fuzzy_requires_every_char_in_order() {
        assert!(match_string("hpl", "help").is_none());
        assert!(match_string("xyz", "help").is_none());
        assert!(match_string("helps", "help").is_none());
    }

    #[test]
    fn test_tier_ordering() {
        let exact = match_string("theme", "theme").unwrap();
        let prefix = match_string("theme", "theme settings").unwrap();
        let substring = match_string("theme", "dark theme").unwrap();
        let fuzzy = match_string("theme", "the meeting").unwrap();
        assert_eq!(fuzzy.match_kind, MatchKind::Fuzzy);
        assert!(exact.score > prefix.score);
        assert!(prefix.score > substring.score);
        assert!(substring.score > fuzzy.score);
    }

    // ── blank input tests ────────────────────────────────────────

    #[test]
    fn test_empty_query_is_empty_kind() {
        let m = match_string("   ", "anything").unwrap();
        assert_eq!(m, MatchResult::empty());
        let m = match_string("", "").unwrap();
        assert_eq!(m.match_kind, MatchKind::Empty);
    }

    #[test]
    fn test_empty_value_never_matches() {
        assert!(match_string("a", "").is_none());
        assert!(match_string("a", "   ").is_none());
    }

    // ── command sigil tests ──────────────────────────────────────

    #[test]
    fn test_sigil_is_optional_in_query() {
        let m = match_string("he", "/help").unwrap();
        assert_eq!(m.match_kind, MatchKind::Prefix);
        assert_eq!(m.score, 1296.0);
        assert_eq!(m.ranges, vec![hr(1, 3)]);

        let m = match_string("help", "/help").unwrap();
        assert_eq!(m.match_kind, MatchKind::Exact);
        assert_eq!(m.ranges, vec![hr(1, 5)]);
    }

    #[test]
    fn test_sigil_typed_in_query_matches_literally() {
        let m = match_string("/he", "/help").unwrap();
        assert_eq!(m.match_kind, MatchKind::Prefix);
        assert_eq!(m.ranges, vec![hr(0, 3)]);
        assert_eq!(match_string("/help", "/help").unwrap().match_kind, MatchKind::Exact);
    }

    #[test]
    fn test_sigil_stripped_substring_and_fuzzy_scores() {
        // Scored against "help": substring at 1, not at 2
        let m = match_string("elp", "/help").unwrap();
        assert_eq!(m.match_kind, MatchKind::Substring);
        assert_eq!(m.score, 1008.0);
        assert_eq!(m.ranges, vec![hr(2, 5)]);

        // Start bonus instead of boundary bonus; density over 4 chars, not 5
        let m = match_string("hlp", "/help").unwrap();
        assert_eq!(m.match_kind, MatchKind::Fuzzy);
        assert_eq!(m.score, 546.25);
        assert_eq!(m.ranges, vec![hr(1, 2), hr(3, 5)]);
    }

    #[test]
    fn test_bare_sigil_value() {
        assert!(match_string("h", "/").is_none());
        assert_eq!(match_string("/", "/").unwrap().match_kind, MatchKind::Exact);
    }

    // ── unicode tests ────────────────────────────────────────────

    #[test]
    fn test_ranges_use_char_positions() {
        let m = match_string("café", "le café").unwrap();
        assert_eq!(m.match_kind, MatchKind::Substring);
        assert_eq!(m.ranges, vec![hr(3, 7)]);

        let m = match_string("éé", "éclair été").unwrap();
        assert_eq!(m.match_kind, MatchKind::Fuzzy);
        assert_eq!(m.ranges, vec![hr(0, 1), hr(7, 8)]);
    }

    #[test]
    fn test_ranges_point_into_displayed_text() {
        // "İ" lower-cases to two chars; ranges must still fit the 8-char label
        let m = match_string("stanbul", "İstanbul").unwrap();
        assert_eq!(m.match_kind, MatchKind::Substring);
        assert_eq!(m.ranges, vec![hr(1, 8)]);

        let m = match_string("i", "İstanbul").unwrap();
        assert_eq!(m.match_kind, MatchKind::Prefix);
        assert_eq!(m.ranges, vec![hr(0, 1)]);

        let m = match_string("help", "  Help me").unwrap();
        let shown: String = "  Help me".chars().skip(m.ranges[0].start).take(m.ranges[0].len()).collect();
        assert_eq!(shown, "Help");
    }

    #[test]
    fn test_normalized_text_origins() {
        let text = NormalizedText::new("  İx ");
        assert_eq!(text.as_str(), "i\u{307}x");
        assert_eq!(text.display_ranges(&[hr(0, 1), hr(2, 3)]), vec![hr(2, 4)]);
        assert_eq!(text.display_ranges(&[hr(1, 2)]), vec![hr(2, 3)]);
        assert!(NormalizedText::new("   ").is_empty());
    }

    #[test]
    fn test_indices_to_ranges() {
        assert!(indices_to_ranges(&[]).is_empty());
        assert_eq!(indices_to_ranges(&[0, 1, 2, 5, 7, 8]), vec![hr(0, 3), hr(5, 6), hr(7, 9)]);
    }
}
