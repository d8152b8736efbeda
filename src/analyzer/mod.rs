//! Network analysis over the referral graph

pub mod centrality;
pub mod coverage;
pub mod reach;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// A user paired with an analysis score.
///
/// Score semantics depend on the producing operation: total reach,
/// marginal coverage, or shortest-path intermediacy count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedUser {
    /// User identifier
    pub user_id: String,

    /// Metric score
    pub score: usize,
}

/// Lazily-populated analysis cache, keyed by dense node index.
///
/// The three mappings are independent: each is filled on first use of
/// the corresponding metric and survives until
/// [`NetworkAnalyzer::clear_cache`].
#[derive(Debug, Default)]
struct AnalyzerCache {
    /// node → total downstream reach
    total_reach: HashMap<u32, usize>,

    /// source → (node → shortest hop distance)
    shortest_distances: HashMap<u32, HashMap<u32, u32>>,

    /// node → downstream reach set (start node excluded)
    reach_sets: HashMap<u32, HashSet<u32>>,
}

/// Read-only metric computation over a [`ReferralGraph`](crate::graph::ReferralGraph).
///
/// The analyzer borrows the graph for the duration of each query and
/// never mutates it; it owns its cache exclusively. Cached results are
/// NOT invalidated when the graph changes: after a mutation, previously
/// computed metrics stay stale until the caller opts in with
/// [`clear_cache`](NetworkAnalyzer::clear_cache). That staleness is part
/// of the contract, so results within a session are stable and
/// recomputation happens only on request. Query one analyzer against one
/// graph; the cache carries no meaning across graphs.
#[derive(Debug, Default)]
pub struct NetworkAnalyzer {
    cache: AnalyzerCache,
}

impl NetworkAnalyzer {
    /// Create an analyzer with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all cached results.
    ///
    /// Subsequent queries recompute from the current graph state.
    pub fn clear_cache(&mut self) {
        self.cache.total_reach.clear();
        self.cache.shortest_distances.clear();
        self.cache.reach_sets.clear();
    }
}

/// Descending by score; equal scores ordered by ascending user ID so
/// rankings are deterministic.
pub(crate) fn sort_ranked(ranked: &mut [RankedUser]) {
    ranked.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
}
