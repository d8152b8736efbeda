//! Referral graph: nodes, single-referrer edges, structural invariants

use std::collections::{HashMap, HashSet};

use crate::error::ReferralError;

/// Directed acyclic referral graph.
///
/// Each user may be introduced by at most one other user, so the edge
/// relation is always a forest of out-trees rooted at users with no
/// referrer. Both invariants (single referrer, no cycles) are enforced
/// at mutation time; there is no deletion of users or edges.
///
/// Identifiers are interned to dense `u32` indices on first sight, and
/// all per-node state lives in parallel vectors indexed by them. This
/// keeps traversals over large graphs cheap without changing the
/// string-identifier API.
pub struct ReferralGraph {
    /// Mapping from string IDs to node indices
    id_to_index: HashMap<String, u32>,

    /// Node string IDs, indexed by node
    node_ids: Vec<String>,

    /// Direct-referral adjacency lists (forward edges)
    referrals: Vec<Vec<u32>>,

    /// Back-reference to the referrer, assigned at most once
    referrers: Vec<Option<u32>>,

    /// Mirrors `referrals[i].len()`
    referral_counts: Vec<u32>,

    /// Activity flags; always true in this core
    active: Vec<bool>,
}

impl Default for ReferralGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferralGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty graph with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id_to_index: HashMap::with_capacity(capacity),
            node_ids: Vec::with_capacity(capacity),
            referrals: Vec::with_capacity(capacity),
            referrers: Vec::with_capacity(capacity),
            referral_counts: Vec::with_capacity(capacity),
            active: Vec::with_capacity(capacity),
        }
    }

    // ── Mutations ──────────────────────────────────────

    /// Register a new user.
    ///
    /// Returns `Ok(false)` without touching the graph if the user
    /// already exists.
    pub fn add_user(&mut self, user_id: &str) -> Result<bool, ReferralError> {
        validate_identifier(user_id)?;

        if self.id_to_index.contains_key(user_id) {
            return Ok(false);
        }

        let idx = self.node_ids.len() as u32;
        self.id_to_index.insert(user_id.to_string(), idx);
        self.node_ids.push(user_id.to_string());
        self.referrals.push(Vec::new());
        self.referrers.push(None);
        self.referral_counts.push(0);
        self.active.push(true);

        Ok(true)
    }

    /// Record that `referrer_id` directly referred `candidate_id`.
    ///
    /// Checks run in a fixed order: identifier validity, self-referral,
    /// existence of both users, single-referrer rule, acyclicity. A
    /// failed call leaves the graph unchanged.
    pub fn add_referral(
        &mut self,
        referrer_id: &str,
        candidate_id: &str,
    ) -> Result<bool, ReferralError> {
        validate_identifier(referrer_id)?;
        validate_identifier(candidate_id)?;

        // Self-referral is reported before existence: the pair is
        // structurally illegal no matter what the graph contains.
        if referrer_id == candidate_id {
            return Err(ReferralError::SelfReferral(referrer_id.to_string()));
        }

        let referrer = self
            .id_to_index
            .get(referrer_id)
            .copied()
            .ok_or_else(|| ReferralError::UserNotFound(referrer_id.to_string()))?;
        let candidate = self
            .id_to_index
            .get(candidate_id)
            .copied()
            .ok_or_else(|| ReferralError::UserNotFound(candidate_id.to_string()))?;

        if self.referrers[candidate as usize].is_some() {
            return Err(ReferralError::DuplicateReferrer(candidate_id.to_string()));
        }

        if !self.acyclic_after(referrer, candidate) {
            return Err(ReferralError::CycleDetected {
                referrer_id: referrer_id.to_string(),
                candidate_id: candidate_id.to_string(),
            });
        }

        self.referrers[candidate as usize] = Some(referrer);
        self.referrals[referrer as usize].push(candidate);
        self.referral_counts[referrer as usize] += 1;

        Ok(true)
    }

    // ── Invariant checks ───────────────────────────────

    /// Would adding the edge `referrer_id -> candidate_id` keep the
    /// graph acyclic?
    ///
    /// Pure predicate, no mutation. Returns false immediately if either
    /// user is unknown. Otherwise walks forward edges from the
    /// candidate; if the walk reaches the referrer, the candidate can
    /// already reach it and the new edge would close a cycle.
    pub fn validate_acyclicity(&self, referrer_id: &str, candidate_id: &str) -> bool {
        let (Some(referrer), Some(candidate)) = (
            self.index_of(referrer_id),
            self.index_of(candidate_id),
        ) else {
            return false;
        };

        self.acyclic_after(referrer, candidate)
    }

    /// Index-level form of the acyclicity predicate: iterative DFS from
    /// `candidate` over forward edges, looking for `referrer`.
    ///
    /// Visited bookkeeping is a `HashSet` sized by the walk, not the
    /// graph, so the common case (a candidate with few descendants)
    /// stays cheap on large graphs.
    fn acyclic_after(&self, referrer: u32, candidate: u32) -> bool {
        let mut visited = HashSet::new();
        let mut stack = vec![candidate];
        visited.insert(candidate);

        while let Some(node) = stack.pop() {
            if node == referrer {
                return false;
            }
            for &next in &self.referrals[node as usize] {
                if visited.insert(next) {
                    stack.push(next);
                }
            }
        }

        true
    }

    // ── Queries ────────────────────────────────────────

    /// IDs directly referred by `user_id`; empty for unknown users.
    pub fn get_direct_referrals(&self, user_id: &str) -> Vec<String> {
        match self.index_of(user_id) {
            Some(idx) => self.referrals[idx as usize]
                .iter()
                .map(|&r| self.node_ids[r as usize].clone())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn has_user(&self, user_id: &str) -> bool {
        self.id_to_index.contains_key(user_id)
    }

    /// The user who referred `user_id`, if any.
    pub fn get_referrer(&self, user_id: &str) -> Option<String> {
        let idx = self.index_of(user_id)?;
        self.referrers[idx as usize].map(|r| self.node_ids[r as usize].clone())
    }

    /// All known user IDs, in no particular order.
    pub fn get_all_users(&self) -> Vec<String> {
        self.node_ids.clone()
    }

    // ── Arena surface ──────────────────────────────────

    /// Number of registered users.
    pub fn user_count(&self) -> usize {
        self.node_ids.len()
    }

    /// Total number of referral edges.
    pub fn edge_count(&self) -> usize {
        self.referral_counts.iter().map(|&c| c as usize).sum()
    }

    /// Dense index for a user ID.
    pub fn index_of(&self, user_id: &str) -> Option<u32> {
        self.id_to_index.get(user_id).copied()
    }

    /// User ID at a dense index.
    pub fn user_id(&self, idx: u32) -> &str {
        &self.node_ids[idx as usize]
    }

    /// Direct-referral indices of a node (forward edges).
    pub fn direct_referral_indices(&self, idx: u32) -> &[u32] {
        &self.referrals[idx as usize]
    }

    /// Number of direct referrals made by a node.
    pub fn referral_count(&self, idx: u32) -> u32 {
        self.referral_counts[idx as usize]
    }

    /// Referrer index of a node, if assigned.
    pub fn referrer_index(&self, idx: u32) -> Option<u32> {
        self.referrers[idx as usize]
    }

    /// A root has no referrer.
    pub fn is_root(&self, idx: u32) -> bool {
        self.referrers[idx as usize].is_none()
    }

    /// Activity flag; always true until deactivation exists.
    pub fn is_active(&self, idx: u32) -> bool {
        self.active[idx as usize]
    }
}

/// Identifiers must contain at least one non-whitespace character.
fn validate_identifier(id: &str) -> Result<(), ReferralError> {
    if id.trim().is_empty() {
        return Err(ReferralError::InvalidIdentifier(id.to_string()));
    }
    Ok(())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with(users: &[&str]) -> ReferralGraph {
        let mut graph = ReferralGraph::new();
        for u in users {
            graph.add_user(u).unwrap();
        }
        graph
    }

    /// a → b → c → d
    fn linear_chain() -> ReferralGraph {
        let mut graph = graph_with(&["a", "b", "c", "d"]);
        graph.add_referral("a", "b").unwrap();
        graph.add_referral("b", "c").unwrap();
        graph.add_referral("c", "d").unwrap();
        graph
    }

    // ── add_user ─────────────────────────────────────────

    #[test]
    fn add_user_registers_new_users() {
        let mut graph = ReferralGraph::new();
        assert!(graph.add_user("alice").unwrap());
        assert!(graph.has_user("alice"));
        assert!(graph.is_active(graph.index_of("alice").unwrap()));
        assert_eq!(graph.user_count(), 1);
    }

    #[test]
    fn add_user_is_a_noop_for_duplicates() {
        let mut graph = graph_with(&["alice"]);
        assert!(!graph.add_user("alice").unwrap());
        assert_eq!(graph.user_count(), 1);
    }

    #[test]
    fn add_user_rejects_empty_and_whitespace_ids() {
        let mut graph = ReferralGraph::new();
        assert!(matches!(
            graph.add_user(""),
            Err(ReferralError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            graph.add_user("   "),
            Err(ReferralError::InvalidIdentifier(_))
        ));
        assert_eq!(graph.user_count(), 0);
    }

    // ── add_referral ─────────────────────────────────────

    #[test]
    fn add_referral_links_referrer_and_candidate() {
        let mut graph = graph_with(&["a", "b"]);
        assert!(graph.add_referral("a", "b").unwrap());

        assert_eq!(graph.get_direct_referrals("a"), vec!["b".to_string()]);
        assert_eq!(graph.get_referrer("b"), Some("a".to_string()));
        assert_eq!(graph.referral_count(graph.index_of("a").unwrap()), 1);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn add_referral_rejects_malformed_ids() {
        let mut graph = graph_with(&["a"]);
        assert!(matches!(
            graph.add_referral("", "a"),
            Err(ReferralError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            graph.add_referral("a", "  "),
            Err(ReferralError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn add_referral_rejects_self_referral_before_existence() {
        let mut graph = ReferralGraph::new();
        // "ghost" is not registered; self-referral still wins
        assert!(matches!(
            graph.add_referral("ghost", "ghost"),
            Err(ReferralError::SelfReferral(_))
        ));
    }

    #[test]
    fn add_referral_requires_both_users() {
        let mut graph = graph_with(&["a"]);
        assert!(matches!(
            graph.add_referral("a", "missing"),
            Err(ReferralError::UserNotFound(_))
        ));
        assert!(matches!(
            graph.add_referral("missing", "a"),
            Err(ReferralError::UserNotFound(_))
        ));
    }

    #[test]
    fn referrer_is_write_once() {
        let mut graph = graph_with(&["a", "b", "c"]);
        graph.add_referral("a", "c").unwrap();

        // Any second assignment fails, whatever the referrer
        assert!(matches!(
            graph.add_referral("b", "c"),
            Err(ReferralError::DuplicateReferrer(_))
        ));
        assert!(matches!(
            graph.add_referral("a", "c"),
            Err(ReferralError::DuplicateReferrer(_))
        ));
        assert_eq!(graph.get_referrer("c"), Some("a".to_string()));
    }

    #[test]
    fn duplicate_referrer_wins_over_cycle_detection() {
        let mut graph = linear_chain();
        // d → c would also close a cycle, but b already referred c
        assert!(matches!(
            graph.add_referral("d", "c"),
            Err(ReferralError::DuplicateReferrer(_))
        ));
    }

    #[test]
    fn add_referral_detects_cycles() {
        let mut graph = graph_with(&["a", "b", "c"]);
        graph.add_referral("a", "b").unwrap();
        graph.add_referral("b", "c").unwrap();

        assert!(matches!(
            graph.add_referral("c", "a"),
            Err(ReferralError::CycleDetected { .. })
        ));
        // Failed call left the graph untouched
        assert_eq!(graph.get_referrer("a"), None);
        assert_eq!(graph.edge_count(), 2);
    }

    // ── validate_acyclicity ──────────────────────────────

    #[test]
    fn validate_acyclicity_agrees_with_add_referral() {
        let mut graph = linear_chain();

        assert!(!graph.validate_acyclicity("d", "a"));
        assert!(matches!(
            graph.add_referral("d", "a"),
            Err(ReferralError::CycleDetected { .. })
        ));

        graph.add_user("e").unwrap();
        assert!(graph.validate_acyclicity("d", "e"));
        assert!(graph.add_referral("d", "e").unwrap());
    }

    #[test]
    fn validate_acyclicity_is_false_for_unknown_users() {
        let graph = graph_with(&["a"]);
        assert!(!graph.validate_acyclicity("a", "missing"));
        assert!(!graph.validate_acyclicity("missing", "a"));
    }

    #[test]
    fn validate_acyclicity_does_not_mutate() {
        let graph = linear_chain();
        graph.validate_acyclicity("d", "a");
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.get_referrer("a"), None);
    }

    // ── Queries ──────────────────────────────────────────

    #[test]
    fn queries_on_unknown_users_return_neutral_values() {
        let graph = graph_with(&["a"]);
        assert!(graph.get_direct_referrals("missing").is_empty());
        assert_eq!(graph.get_referrer("missing"), None);
        assert!(!graph.has_user("missing"));
    }

    #[test]
    fn get_all_users_lists_every_registered_user() {
        let graph = linear_chain();
        let mut users = graph.get_all_users();
        users.sort();
        assert_eq!(users, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn roots_are_users_without_referrers() {
        let graph = linear_chain();
        assert!(graph.is_root(graph.index_of("a").unwrap()));
        assert!(!graph.is_root(graph.index_of("b").unwrap()));
    }

    // ── Scale ────────────────────────────────────────────

    #[test]
    fn handles_a_hundred_thousand_users() {
        let n = 100_000;
        let mut graph = ReferralGraph::with_capacity(n);
        for i in 0..n {
            graph.add_user(&format!("u{i}")).unwrap();
        }
        // One long chain: u0 → u1 → … → u99999
        for i in 1..n {
            graph
                .add_referral(&format!("u{}", i - 1), &format!("u{i}"))
                .unwrap();
        }

        assert_eq!(graph.user_count(), n);
        assert_eq!(graph.edge_count(), n - 1);
        assert_eq!(graph.get_referrer("u99999"), Some("u99998".to_string()));
        assert!(!graph.validate_acyclicity("u99999", "u0"));
    }
}
