//! Unique reach expansion: greedy maximum coverage over reach sets

use std::collections::{HashSet, VecDeque};

use crate::analyzer::{NetworkAnalyzer, RankedUser};
use crate::graph::ReferralGraph;

impl NetworkAnalyzer {
    /// Rank users by how much *new* audience each one adds.
    ///
    /// Precomputes every user's downstream reach set (cached; rebuilt in
    /// one pass only when that cache is empty), then greedily selects
    /// the user whose reach set contains the most identifiers not yet
    /// covered by earlier selections. Each entry's score is that
    /// marginal gain, so the score sequence is non-increasing. Selection
    /// stops when the best remaining gain is zero. Equal gains resolve
    /// to the lexicographically smallest user ID.
    pub fn calculate_unique_reach_expansion(&mut self, graph: &ReferralGraph) -> Vec<RankedUser> {
        if self.cache.reach_sets.is_empty() {
            for idx in 0..graph.user_count() as u32 {
                self.cache.reach_sets.insert(idx, bfs_reach_set(graph, idx));
            }
        }

        // Scan candidates in ascending user-ID order; on equal gains the
        // earlier candidate wins, which makes the ranking deterministic.
        let mut candidates: Vec<u32> = self.cache.reach_sets.keys().copied().collect();
        candidates.sort_by(|&a, &b| graph.user_id(a).cmp(graph.user_id(b)));

        let mut covered: HashSet<u32> = HashSet::new();
        let mut selections = Vec::new();

        while !candidates.is_empty() {
            let mut best_pos = 0;
            let mut best_gain = 0;
            for (pos, &idx) in candidates.iter().enumerate() {
                let gain = self.cache.reach_sets[&idx]
                    .iter()
                    .filter(|n| !covered.contains(n))
                    .count();
                if gain > best_gain {
                    best_pos = pos;
                    best_gain = gain;
                }
            }

            if best_gain == 0 {
                break;
            }

            let idx = candidates.remove(best_pos);
            covered.extend(self.cache.reach_sets[&idx].iter().copied());
            selections.push(RankedUser {
                user_id: graph.user_id(idx).to_string(),
                score: best_gain,
            });
        }

        selections
    }
}

/// Downstream reach set of `start` over forward edges, excluding `start`.
fn bfs_reach_set(graph: &ReferralGraph, start: u32) -> HashSet<u32> {
    let mut visited = HashSet::new();
    visited.insert(start);

    let mut queue = VecDeque::new();
    queue.push_back(start);

    while let Some(node) = queue.pop_front() {
        for &next in graph.direct_referral_indices(node) {
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    visited.remove(&start);
    visited
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// a → b → c → d
    fn linear_chain() -> ReferralGraph {
        let mut graph = ReferralGraph::new();
        for u in ["a", "b", "c", "d"] {
            graph.add_user(u).unwrap();
        }
        graph.add_referral("a", "b").unwrap();
        graph.add_referral("b", "c").unwrap();
        graph.add_referral("c", "d").unwrap();
        graph
    }

    /// Two disjoint trees: big → {b1, b2, b3}, small → {s1, s2}
    fn two_trees() -> ReferralGraph {
        let mut graph = ReferralGraph::new();
        for u in ["big", "b1", "b2", "b3", "small", "s1", "s2"] {
            graph.add_user(u).unwrap();
        }
        for b in ["b1", "b2", "b3"] {
            graph.add_referral("big", b).unwrap();
        }
        for s in ["s1", "s2"] {
            graph.add_referral("small", s).unwrap();
        }
        graph
    }

    #[test]
    fn chain_expansion_selects_only_the_head() {
        let graph = linear_chain();
        let mut analyzer = NetworkAnalyzer::new();

        let expansion = analyzer.calculate_unique_reach_expansion(&graph);
        assert_eq!(
            expansion,
            vec![RankedUser { user_id: "a".into(), score: 3 }]
        );
    }

    #[test]
    fn disjoint_trees_are_selected_largest_first() {
        let graph = two_trees();
        let mut analyzer = NetworkAnalyzer::new();

        let expansion = analyzer.calculate_unique_reach_expansion(&graph);
        assert_eq!(expansion.len(), 2);
        assert_eq!(expansion[0], RankedUser { user_id: "big".into(), score: 3 });
        assert_eq!(expansion[1], RankedUser { user_id: "small".into(), score: 2 });
    }

    #[test]
    fn marginal_scores_never_increase() {
        let graph = two_trees();
        let mut analyzer = NetworkAnalyzer::new();

        let expansion = analyzer.calculate_unique_reach_expansion(&graph);
        for pair in expansion.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn selected_reach_sets_cover_everything_reachable_from_them() {
        let graph = two_trees();
        let mut analyzer = NetworkAnalyzer::new();

        let expansion = analyzer.calculate_unique_reach_expansion(&graph);
        let total_marginal: usize = expansion.iter().map(|r| r.score).sum();

        // Every non-root is reachable from a selected root exactly once
        assert_eq!(total_marginal, graph.user_count() - expansion.len());
    }

    #[test]
    fn equal_gains_resolve_to_the_smallest_user_id() {
        let mut graph = ReferralGraph::new();
        for u in ["zeta", "z1", "alpha", "a1"] {
            graph.add_user(u).unwrap();
        }
        graph.add_referral("zeta", "z1").unwrap();
        graph.add_referral("alpha", "a1").unwrap();

        let mut analyzer = NetworkAnalyzer::new();
        let expansion = analyzer.calculate_unique_reach_expansion(&graph);
        assert_eq!(expansion[0].user_id, "alpha");
        assert_eq!(expansion[1].user_id, "zeta");
    }

    #[test]
    fn empty_graph_has_an_empty_expansion() {
        let graph = ReferralGraph::new();
        let mut analyzer = NetworkAnalyzer::new();
        assert!(analyzer.calculate_unique_reach_expansion(&graph).is_empty());
    }

    #[test]
    fn reach_sets_stay_stale_until_cache_is_cleared() {
        let mut graph = linear_chain();
        let mut analyzer = NetworkAnalyzer::new();
        let before = analyzer.calculate_unique_reach_expansion(&graph);
        assert_eq!(before[0].score, 3);

        graph.add_user("e").unwrap();
        graph.add_referral("d", "e").unwrap();

        // Cached reach sets predate the mutation
        let stale = analyzer.calculate_unique_reach_expansion(&graph);
        assert_eq!(stale[0].score, 3);

        analyzer.clear_cache();
        let fresh = analyzer.calculate_unique_reach_expansion(&graph);
        assert_eq!(fresh[0].score, 4);
    }
}
