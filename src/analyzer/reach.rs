//! Total downstream reach and the reach-based ranking

use std::collections::{HashSet, VecDeque};

use crate::analyzer::{sort_ranked, NetworkAnalyzer, RankedUser};
use crate::error::ReferralError;
use crate::graph::ReferralGraph;

impl NetworkAnalyzer {
    /// Number of distinct users downstream of `user_id`, excluding the
    /// user itself.
    ///
    /// Breadth-first traversal over forward referral edges, cached per
    /// user. Unknown users have a reach of 0; that is a neutral answer,
    /// not an error.
    pub fn calculate_total_reach(&mut self, graph: &ReferralGraph, user_id: &str) -> usize {
        match graph.index_of(user_id) {
            Some(idx) => self.total_reach_of(graph, idx),
            None => 0,
        }
    }

    /// Top `k` users by total reach.
    ///
    /// Scores every user (populating the reach cache as a side effect),
    /// keeps those with reach > 0, and sorts descending by reach with
    /// ties broken by ascending user ID. Returns fewer than `k` entries
    /// when fewer users qualify.
    pub fn get_top_referrers_by_reach(
        &mut self,
        graph: &ReferralGraph,
        k: usize,
    ) -> Result<Vec<RankedUser>, ReferralError> {
        if k == 0 {
            return Err(ReferralError::InvalidParameter(
                "k must be a positive integer".to_string(),
            ));
        }

        let mut ranked = Vec::new();
        for idx in 0..graph.user_count() as u32 {
            let score = self.total_reach_of(graph, idx);
            if score > 0 {
                ranked.push(RankedUser {
                    user_id: graph.user_id(idx).to_string(),
                    score,
                });
            }
        }

        sort_ranked(&mut ranked);
        ranked.truncate(k);
        Ok(ranked)
    }

    /// Cached index-level reach lookup.
    fn total_reach_of(&mut self, graph: &ReferralGraph, idx: u32) -> usize {
        if let Some(&cached) = self.cache.total_reach.get(&idx) {
            return cached;
        }
        let count = bfs_reach_count(graph, idx);
        self.cache.total_reach.insert(idx, count);
        count
    }
}

/// BFS over forward edges; counts every visited node except `start`.
fn bfs_reach_count(graph: &ReferralGraph, start: u32) -> usize {
    let mut visited = HashSet::new();
    visited.insert(start);

    let mut queue = VecDeque::new();
    queue.push_back(start);

    let mut count = 0;
    while let Some(node) = queue.pop_front() {
        for &next in graph.direct_referral_indices(node) {
            if visited.insert(next) {
                count += 1;
                queue.push_back(next);
            }
        }
    }

    count
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
