//! Flow centrality: shortest-path intermediacy counting

use std::collections::{HashMap, VecDeque};

use crate::analyzer::{sort_ranked, NetworkAnalyzer, RankedUser};
use crate::graph::ReferralGraph;

impl NetworkAnalyzer {
    /// Score each user by how often it sits on a shortest path between
    /// two other users.
    ///
    /// All-pairs shortest distances come from one BFS per source over
    /// forward edges (cached; rebuilt only when that cache is empty).
    /// For every ordered pair `(s, t)` with a finite distance and every
    /// other user `v`, the score of `v` grows by one whenever
    /// `dist(s, v) + dist(v, t) == dist(s, t)`. Pass-throughs are
    /// counted without normalizing by the number of equal-length
    /// shortest paths; this simplified form is kept for compatibility
    /// with the historical results. Users with score 0 are omitted; the
    /// rest sort descending with ties broken by ascending user ID.
    pub fn calculate_flow_centrality(&mut self, graph: &ReferralGraph) -> Vec<RankedUser> {
        if self.cache.shortest_distances.is_empty() {
            for idx in 0..graph.user_count() as u32 {
                self.cache
                    .shortest_distances
                    .insert(idx, bfs_distances(graph, idx));
            }
        }

        let distances = &self.cache.shortest_distances;
        let mut nodes: Vec<u32> = distances.keys().copied().collect();
        nodes.sort_unstable();

        let mut scores: HashMap<u32, usize> = HashMap::new();
        for &s in &nodes {
            let dist_s = &distances[&s];
            for (&t, &d_st) in dist_s {
                if t == s {
                    continue;
                }
                for &v in &nodes {
                    if v == s || v == t {
                        continue;
                    }
                    let Some(&d_sv) = dist_s.get(&v) else { continue };
                    let Some(&d_vt) = distances[&v].get(&t) else { continue };
                    if d_sv + d_vt == d_st {
                        *scores.entry(v).or_insert(0) += 1;
                    }
                }
            }
        }

        let mut ranked: Vec<RankedUser> = scores
            .into_iter()
            .map(|(idx, score)| RankedUser {
                user_id: graph.user_id(idx).to_string(),
                score,
            })
            .collect();
        sort_ranked(&mut ranked);
        ranked
    }
}

/// Hop distances from `start` over forward edges, including
/// `start → start = 0`. Unreachable users are absent from the map.
fn bfs_distances(graph: &ReferralGraph, start: u32) -> HashMap<u32, u32> {
    let mut dist = HashMap::new();
    dist.insert(start, 0);

    let mut queue = VecDeque::new();
    queue.push_back(start);

    while let Some(node) = queue.pop_front() {
        let d = dist[&node];
        for &next in graph.direct_referral_indices(node) {
            if !dist.contains_key(&next) {
                dist.insert(next, d + 1);
                queue.push_back(next);
            }
        }
    }

    dist
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
