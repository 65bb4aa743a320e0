//! Immutable search index over palette entries.
//!
//! The index is built once per data-source change and then queried on every
//! keystroke. It is never mutated: new or changed entries mean building a new
//! index and swapping it in wholesale. Once built it is `Sync` for any
//! `Sync` payload and can be shared across threads without locking.

use std::cmp::Ordering;

use crate::candidate::PreparedItem;
use crate::interface::{FuzzySearchResult, MatchKind, MatchedField, SearchableItem};
use crate::matcher::{match_field, normalize};

/// Subtracted from a keyword's raw score so labels win ties with keywords.
pub const KEYWORD_PENALTY: f64 = 140.0;
/// Subtracted from a description's raw score.
pub const DESCRIPTION_PENALTY: f64 = 240.0;

#[derive(Debug, Clone)]
pub struct SearchIndex<A> {
    items: Vec<PreparedItem<A>>,
}

impl<A> Default for SearchIndex<A> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<A> FromIterator<SearchableItem<A>> for SearchIndex<A> {
    fn from_iter<I: IntoIterator<Item = SearchableItem<A>>>(items: I) -> Self {
        Self::build(items)
    }
}

impl<A> SearchIndex<A> {
    /// Prepare every item once. Order of `items` is preserved.
    pub fn build(items: impl IntoIterator<Item = SearchableItem<A>>) -> Self {
        #[cfg(feature = "perf-log")]
        let t0 = std::time::Instant::now();

        let items: Vec<PreparedItem<A>> = items.into_iter().map(PreparedItem::new).collect();

        #[cfg(feature = "perf-log")]
        tracing::debug!(
            items = items.len(),
            elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0,
            "[perf] index built"
        );
        #[cfg(not(feature = "perf-log"))]
        tracing::debug!(items = items.len(), "index built");

        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> impl ExactSizeIterator<Item = &SearchableItem<A>> {
        self.items.iter().map(PreparedItem::item)
    }

    /// Look an item up by id. Linear; meant for selection handling, not scoring.
    pub fn get(&self, id: &str) -> Option<&SearchableItem<A>> {
        self.items().find(|item| item.id == id)
    }

    /// Match every item against `query`, dropping non-matches. Index order.
    pub fn matches(&self, query: &str) -> Vec<FuzzySearchResult<'_, A>> {
        let query = normalize(query);
        self.items
            .iter()
            .filter_map(|prepared| match_item(prepared, &query))
            .collect()
    }

    /// Matches for `query`. A non-empty query is sorted by score descending,
    /// ties broken by label; an empty query keeps index order.
    pub fn search(&self, query: &str) -> Vec<FuzzySearchResult<'_, A>> {
        let mut results = self.matches(query);
        if !query.trim().is_empty() {
            results.sort_by(compare_by_score);
        }
        results
    }
}

fn compare_by_score<A>(a: &FuzzySearchResult<'_, A>, b: &FuzzySearchResult<'_, A>) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| compare_labels(&a.item.label, &b.item.label))
}

/// Case-insensitive label order, falling back to raw text so it stays total.
pub(crate) fn compare_labels(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

/// Best field match for one item. `query` must already be normalized.
///
/// Ranges index into the displayed text of the matched field, as returned by
/// [`RankedSearchResult::matched_text`](crate::RankedSearchResult::matched_text).
///
/// Fields are tried label, then keywords in order, then description. A later
/// field replaces the current best only when its adjusted score is strictly
/// higher.
pub fn match_item<'a, A>(prepared: &'a PreparedItem<A>, query: &str) -> Option<FuzzySearchResult<'a, A>> {
    let item = prepared.item();

    if query.is_empty() {
        return Some(FuzzySearchResult {
            item,
            score: 0.0,
            match_kind: MatchKind::Empty,
            ranges: Vec::new(),
            matched_field: MatchedField::None,
        });
    }

    let mut best: Option<FuzzySearchResult<'a, A>> = match_field(query, prepared.label())
        .map(|m| FuzzySearchResult {
            item,
            score: m.score,
            match_kind: m.match_kind,
            ranges: m.ranges,
            matched_field: MatchedField::Label,
        });

    for (i, keyword) in prepared.keywords().iter().enumerate() {
        if let Some(m) = match_field(query, keyword) {
            let score = m.score - KEYWORD_PENALTY;
            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(FuzzySearchResult {
                    item,
                    score,
                    match_kind: m.match_kind,
                    ranges: m.ranges,
                    matched_field: MatchedField::Keyword(i),
                });
            }
        }
    }

    if let Some(m) = match_field(query, prepared.description()) {
        let score = m.score - DESCRIPTION_PENALTY;
        if best.as_ref().map_or(true, |b| score > b.score) {
            best = Some(FuzzySearchResult {
                item,
                score,
                match_kind: m.match_kind,
                ranges: m.ranges,
                matched_field: MatchedField::Description,
            });
        }
    }

    best
}
