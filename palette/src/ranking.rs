//! Final ordering of palette matches.
//!
//! Match kind dominates: for a non-empty query every exact match sorts ahead
//! of every prefix match, and so on down to fuzzy, no matter what the boosts
//! add up to. Within a kind, the rank score decides:
//!
//! ```text
//! rank_score = match score + kind weight + recency + popularity + category (+ usage)
//! ```
//!
//! For an empty query nothing was matched, so only the boosts count and the
//! rank score is the primary key.

use std::cmp::Ordering;

use chrono::Utc;

use crate::index::{compare_labels, SearchIndex};
use crate::interface::{Category, FuzzySearchResult, MatchKind, RankedSearchResult, SearchableItem};
use crate::matcher::normalize;
use crate::recency::{RecencyTracker, UsageBoosts};

pub const DEFAULT_LIMIT: usize = 20;
pub const DEFAULT_RECENT_WINDOW_MS: i64 = 7 * 24 * 60 * 60 * 1000;
pub const DEFAULT_CATEGORY_ORDER: [Category; 4] = Category::ALL;

/// Boost for a conversation used just now, fading linearly to 0 at the window edge.
pub const RECENCY_BOOST_MAX: f64 = 180.0;
const POPULARITY_WEIGHT: f64 = 0.8;
const POPULARITY_MAX: f64 = 100.0;
const CATEGORY_BOOST_BASE: f64 = 30.0;
const CATEGORY_BOOST_STEP: f64 = 6.0;

/// Weight added to the raw match score for a non-empty query.
pub const fn match_weight(kind: MatchKind) -> f64 {
    match kind {
        MatchKind::Exact => 320.0,
        MatchKind::Prefix => 220.0,
        MatchKind::Substring => 120.0,
        MatchKind::Fuzzy => 40.0,
        MatchKind::Empty => 0.0,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankOptions {
    pub limit: usize,
    /// Clock reading in unix milliseconds. `None` reads the system clock.
    pub now_ms: Option<i64>,
    pub category_order: Vec<Category>,
    pub recent_window_ms: i64,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            now_ms: None,
            category_order: DEFAULT_CATEGORY_ORDER.to_vec(),
            recent_window_ms: DEFAULT_RECENT_WINDOW_MS,
        }
    }
}

impl RankOptions {
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_now_ms(mut self, now_ms: i64) -> Self {
        self.now_ms = Some(now_ms);
        self
    }

    pub fn with_category_order(mut self, order: impl Into<Vec<Category>>) -> Self {
        self.category_order = order.into();
        self
    }

    pub fn with_recent_window_ms(mut self, window_ms: i64) -> Self {
        self.recent_window_ms = window_ms;
        self
    }

    fn now(&self) -> i64 {
        self.now_ms.unwrap_or_else(|| Utc::now().timestamp_millis())
    }
}

/// Conversations only: linear decay from `RECENCY_BOOST_MAX` at age 0 to 0 at
/// `window_ms`. Future timestamps count as age 0.
pub fn recency_boost<A>(item: &SearchableItem<A>, now: i64, window_ms: i64) -> f64 {
    if item.category != Category::Conversation || window_ms <= 0 {
        return 0.0;
    }
    let Some(last_used_at) = item.last_used_at else {
        return 0.0;
    };
    let age = now.saturating_sub(last_used_at).max(0);
    if age >= window_ms {
        return 0.0;
    }
    (1.0 - age as f64 / window_ms as f64) * RECENCY_BOOST_MAX
}

/// `popularity` clamped to `0..=100`, scaled. Non-finite counts as absent.
pub fn popularity_boost<A>(item: &SearchableItem<A>) -> f64 {
    match item.popularity {
        Some(p) if p.is_finite() => p.clamp(0.0, POPULARITY_MAX) * POPULARITY_WEIGHT,
        _ => 0.0,
    }
}

/// `30 - 6 * position` in `order`, floored at 0; 0 when unlisted.
pub fn category_boost<A>(item: &SearchableItem<A>, order: &[Category]) -> f64 {
    match category_position(item.category, order) {
        Some(index) => (CATEGORY_BOOST_BASE - CATEGORY_BOOST_STEP * index as f64).max(0.0),
        None => 0.0,
    }
}

fn category_position(category: Category, order: &[Category]) -> Option<usize> {
    order.iter().position(|&c| c == category)
}

/// Rank `query` against `index` with no usage history.
pub fn rank<'a, A>(index: &'a SearchIndex<A>, query: &str, options: &RankOptions) -> Vec<RankedSearchResult<'a, A>> {
    rank_matches(index.matches(query), query, options, &UsageBoosts::default())
}

/// Rank `query` against `index`, adding each item's usage boost from `tracker`.
pub fn rank_with_usage<'a, A>(
    index: &'a SearchIndex<A>,
    query: &str,
    options: &RankOptions,
    tracker: &RecencyTracker,
) -> Vec<RankedSearchResult<'a, A>> {
    rank_matches(index.matches(query), query, options, &tracker.snapshot())
}

/// Score, order and truncate a raw match list produced for `query`.
pub fn rank_matches<'a, A>(
    matches: Vec<FuzzySearchResult<'a, A>>,
    query: &str,
    options: &RankOptions,
    usage: &UsageBoosts,
) -> Vec<RankedSearchResult<'a, A>> {
    #[cfg(feature = "perf-log")]
    let t0 = std::time::Instant::now();

    let now = options.now();
    let order = options.category_order.as_slice();
    let matched = matches.len();
    let query_len = normalize(query).chars().count();
    let empty_query = query_len == 0;

    let mut ranked: Vec<RankedSearchResult<'a, A>> = matches
        .into_iter()
        .map(|m| {
            let boosts = recency_boost(m.item, now, options.recent_window_ms)
                + popularity_boost(m.item)
                + category_boost(m.item, order)
                + usage.get(&m.item.id);
            let rank_score = if empty_query {
                boosts
            } else {
                m.score + match_weight(m.match_kind) + boosts
            };
            RankedSearchResult::from_match(m, rank_score)
        })
        .collect();

    if empty_query {
        ranked.sort_by(|a, b| {
            b.rank_score
                .total_cmp(&a.rank_score)
                .then_with(|| tie_break(a, b, order))
        });
    } else {
        ranked.sort_by(|a, b| {
            a.match_kind
                .cmp(&b.match_kind)
                .then_with(|| b.rank_score.total_cmp(&a.rank_score))
                .then_with(|| tie_break(a, b, order))
        });
    }
    ranked.truncate(options.limit);

    #[cfg(feature = "perf-log")]
    tracing::debug!(
        query_len,
        matched,
        returned = ranked.len(),
        elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0,
        "[perf] ranked"
    );
    #[cfg(not(feature = "perf-log"))]
    tracing::debug!(query_len, matched, returned = ranked.len(), "ranked");

    ranked
}

/// Category position (unlisted last), then label.
fn tie_break<A>(a: &RankedSearchResult<'_, A>, b: &RankedSearchResult<'_, A>, order: &[Category]) -> Ordering {
    let pos = |r: &RankedSearchResult<'_, A>| category_position(r.item.category, order).unwrap_or(usize::MAX);
    pos(a)
        .cmp(&pos(b))
        .then_with(|| compare_labels(&a.item.label, &b.item.label))
}

/// Split a ranked list into per-category sections.
///
/// Sections follow `order`; categories missing from it trail in the order they
/// first appear. Rank order is kept within each section and empty sections are
/// omitted.
pub fn group_by_category<'a, A>(
    results: Vec<RankedSearchResult<'a, A>>,
    order: &[Category],
) -> Vec<(Category, Vec<RankedSearchResult<'a, A>>)> {
    let mut sections: Vec<(Category, Vec<RankedSearchResult<'a, A>>)> =
        order.iter().map(|&c| (c, Vec::new())).collect();
    for result in results {
        let category = result.item.category;
        match sections.iter_mut().find(|(c, _)| *c == category) {
            Some((_, section)) => section.push(result),
            None => sections.push((category, vec![result])),
        }
    }
    sections.retain(|(_, section)| !section.is_empty());
    sections
}
