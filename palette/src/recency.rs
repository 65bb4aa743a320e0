//! Session-scoped usage tracking for palette entries.
//!
//! Each selection stamps the entry with the next sequence number. Boosts are a
//! function of an entry's rank among recorded usages, not of wall-clock time:
//! the most recently picked entry gets the largest boost and earlier picks
//! decay from there. Nothing here is persisted.

use std::collections::HashMap;

use parking_lot::Mutex;

/// Boost for the most recently used entry. Rank `r` (0 = latest) gets
/// `USAGE_BOOST_MAX / (r + 1)`.
pub const USAGE_BOOST_MAX: f64 = 120.0;

#[derive(Debug, Default)]
struct UsageLog {
    next_seq: u64,
    last_seq: HashMap<String, u64>,
}

/// Thread-safe usage tracker.
///
/// Sequence numbers come from a single counter behind the same lock as the
/// map, so concurrent `record_usage` calls still produce one total order.
#[derive(Debug, Default)]
pub struct RecencyTracker {
    log: Mutex<UsageLog>,
}

impl RecencyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id` as just used, replacing any earlier usage of it.
    pub fn record_usage(&self, id: &str) {
        let mut log = self.log.lock();
        log.next_seq += 1;
        let seq = log.next_seq;
        log.last_seq.insert(id.to_string(), seq);
        tracing::trace!(id, seq, "recorded usage");
    }

    /// Boost for `id`, or 0.0 if it was never used since the last reset.
    pub fn get_boost(&self, id: &str) -> f64 {
        let log = self.log.lock();
        let Some(&seq) = log.last_seq.get(id) else {
            return 0.0;
        };
        let rank = log.last_seq.values().filter(|&&other| other > seq).count();
        rank_boost(rank)
    }

    /// Boosts for every used id, computed under one lock.
    pub fn snapshot(&self) -> UsageBoosts {
        let log = self.log.lock();
        let mut by_recency: Vec<(&String, u64)> = log.last_seq.iter().map(|(id, &seq)| (id, seq)).collect();
        by_recency.sort_unstable_by(|a, b| b.1.cmp(&a.1));
        let boosts = by_recency
            .into_iter()
            .enumerate()
            .map(|(rank, (id, _))| (id.clone(), rank_boost(rank)))
            .collect();
        UsageBoosts { boosts }
    }

    /// Drop one id's usage.
    pub fn forget(&self, id: &str) -> bool {
        self.log.lock().last_seq.remove(id).is_some()
    }

    /// Clear all usage. Every boost reads 0.0 afterwards.
    pub fn reset(&self) {
        let mut log = self.log.lock();
        log.last_seq.clear();
        tracing::trace!("usage reset");
    }

    pub fn len(&self) -> usize {
        self.log.lock().last_seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.lock().last_seq.is_empty()
    }
}

fn rank_boost(rank: usize) -> f64 {
    USAGE_BOOST_MAX / (rank as f64 + 1.0)
}

/// Point-in-time usage boosts, read once per ranking pass.
#[derive(Debug, Clone, Default)]
pub struct UsageBoosts {
    boosts: HashMap<String, f64>,
}

impl UsageBoosts {
    pub fn get(&self, id: &str) -> f64 {
        self.boosts.get(id).copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.boosts.is_empty()
    }
}
