//! Palette - incremental search core for a command palette
//!
//! Scores, ranks and highlights heterogeneous palette entries (commands,
//! actions, conversations, notes) on every keystroke. Everything here is
//! synchronous and in-memory:
//!
//! - [`SearchIndex`] is built once per data change and only read afterwards.
//! - [`match_string`] scores one query against one field.
//! - [`rank`] / [`rank_with_usage`] combine the best field match with recency,
//!   popularity and category boosts into a capped, ordered result list.
//! - [`RecencyTracker`] records picks for the session and boosts recent ones.

mod candidate;
pub mod config;
pub mod index;
pub mod interface;
pub mod matcher;
pub mod providers;
pub mod ranking;
pub mod recency;

pub use candidate::PreparedItem;
pub use config::PaletteConfig;
pub use index::SearchIndex;
pub use interface::*;
pub use matcher::{match_string, MatchResult, NormalizedText};
pub use providers::Catalog;
pub use ranking::{group_by_category, rank, rank_with_usage, RankOptions};
pub use recency::RecencyTracker;

/// Build an index over `items`.
pub fn build_index<A>(items: impl IntoIterator<Item = SearchableItem<A>>) -> SearchIndex<A> {
    SearchIndex::build(items)
}

/// Matches for `query`, best score first (index order for an empty query).
pub fn search<'a, A>(index: &'a SearchIndex<A>, query: &str) -> Vec<FuzzySearchResult<'a, A>> {
    index.search(query)
}
