//! Palette Search Interface Definition
//!
//! This file defines the public types shared between the search core and the
//! palette UI that renders its results. It acts as the source of truth for
//! shared types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// ENUMS
// ═══════════════════════════════════════════════════════════════════════════════

/// Category of a palette entry. Also the default priority order for ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Command,
    Action,
    Conversation,
    Note,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Command,
        Category::Action,
        Category::Conversation,
        Category::Note,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Command => "command",
            Category::Action => "action",
            Category::Conversation => "conversation",
            Category::Note => "note",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = PaletteError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "command" => Ok(Category::Command),
            "action" => Ok(Category::Action),
            "conversation" => Ok(Category::Conversation),
            "note" => Ok(Category::Note),
            other => Err(PaletteError::UnknownCategory(other.to_string())),
        }
    }
}

/// Quality of a match, best first.
///
/// Derived `Ord` follows declaration order, so `Exact < Prefix < ... < Empty`
/// and a lower value always sorts ahead. `Empty` marks a blank query: it is a
/// non-match sentinel, distinct from "no match" which is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Exact,
    Prefix,
    Substring,
    Fuzzy,
    Empty,
}

impl MatchKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            MatchKind::Exact => "exact",
            MatchKind::Prefix => "prefix",
            MatchKind::Substring => "substring",
            MatchKind::Fuzzy => "fuzzy",
            MatchKind::Empty => "empty",
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which field of an item produced the winning match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchedField {
    Label,
    /// Index into the item's `keywords`; ranges refer to that keyword's text.
    Keyword(usize),
    Description,
    None,
}

/// Payload carried through to the caller when an entry is picked.
/// The search core never looks inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PaletteAction {
    Command { name: String },
    Action { id: String },
    Conversation { id: String },
    Note { id: String },
}

// ═══════════════════════════════════════════════════════════════════════════════
// RECORDS (Structs)
// ═══════════════════════════════════════════════════════════════════════════════

/// A half-open `[start, end)` span of chars in the matched field's displayed text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HighlightRange {
    pub start: usize,
    pub end: usize,
}

impl HighlightRange {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// An entry the palette can search.
///
/// Identity is by `id`. `last_used_at` is unix milliseconds; `popularity` is
/// expected in `0..=100` and anything non-finite counts as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchableItem<A = PaletteAction> {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub action: A,
    #[serde(default)]
    pub last_used_at: Option<i64>,
    #[serde(default)]
    pub popularity: Option<f64>,
}

impl<A> SearchableItem<A> {
    pub fn new(id: impl Into<String>, label: impl Into<String>, category: Category, action: A) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: String::new(),
            category,
            keywords: Vec::new(),
            action,
            last_used_at: None,
            popularity: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_last_used_at(mut self, last_used_at: i64) -> Self {
        self.last_used_at = Some(last_used_at);
        self
    }

    pub fn with_popularity(mut self, popularity: f64) -> Self {
        self.popularity = Some(popularity);
        self
    }
}

/// Per-item match for one query. Absent when no field matched.
#[derive(Debug, Clone)]
pub struct FuzzySearchResult<'a, A = PaletteAction> {
    pub item: &'a SearchableItem<A>,
    pub score: f64,
    pub match_kind: MatchKind,
    pub ranges: Vec<HighlightRange>,
    pub matched_field: MatchedField,
}

/// A match plus its final sort key.
#[derive(Debug, Clone)]
pub struct RankedSearchResult<'a, A = PaletteAction> {
    pub item: &'a SearchableItem<A>,
    pub score: f64,
    pub match_kind: MatchKind,
    pub ranges: Vec<HighlightRange>,
    pub matched_field: MatchedField,
    pub rank_score: f64,
}

impl<'a, A> RankedSearchResult<'a, A> {
    pub(crate) fn from_match(m: FuzzySearchResult<'a, A>, rank_score: f64) -> Self {
        Self {
            item: m.item,
            score: m.score,
            match_kind: m.match_kind,
            ranges: m.ranges,
            matched_field: m.matched_field,
            rank_score,
        }
    }

    /// Text the highlight ranges index into, exactly as stored on the item.
    pub fn matched_text(&self) -> &'a str {
        let item: &'a SearchableItem<A> = self.item;
        match self.matched_field {
            MatchedField::Label | MatchedField::None => &item.label,
            MatchedField::Keyword(i) => item.keywords.get(i).map_or("", String::as_str),
            MatchedField::Description => &item.description,
        }
    }
}

/// Error type for palette configuration and catalog loading.
/// Searching itself never fails.
#[derive(Debug, Error)]
pub enum PaletteError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
