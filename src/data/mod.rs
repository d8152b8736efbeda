//! Referral dataset loading

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::graph::ReferralGraph;

/// On-disk referral dataset: a user roster plus ordered
/// (referrer, candidate) pairs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferralDataset {
    /// Users to register, in roster order
    pub users: Vec<String>,

    /// Referral pairs, applied after the roster
    #[serde(default)]
    pub referrals: Vec<(String, String)>,
}

/// Load a JSON referral dataset into a graph.
pub fn load_referral_data(path: &str) -> Result<ReferralGraph> {
    log::info!("Reading referral dataset: {}", path);

    if !Path::new(path).exists() {
        return Err(anyhow!("File not found: {}", path));
    }

    let raw = fs::read_to_string(path)?;
    let dataset: ReferralDataset = serde_json::from_str(&raw)
        .with_context(|| format!("malformed referral dataset: {}", path))?;

    log::info!(
        "Dataset lists {} users and {} referral pairs",
        dataset.users.len(),
        dataset.referrals.len()
    );

    Ok(build_graph(&dataset))
}

/// Build a graph from an in-memory dataset.
///
/// Rows the graph rejects (malformed IDs, unknown users, duplicate
/// referrers, would-be cycles) are skipped with a warning rather than
/// aborting the load: dataset noise is data, not a program failure.
pub fn build_graph(dataset: &ReferralDataset) -> ReferralGraph {
    let mut graph = ReferralGraph::with_capacity(dataset.users.len());
    let mut rejected = 0usize;

    for user in &dataset.users {
        match graph.add_user(user) {
            Ok(true) => {}
            Ok(false) => log::debug!("duplicate roster entry: {}", user),
            Err(err) => {
                rejected += 1;
                log::warn!("skipping user entry: {}", err);
            }
        }
    }

    for (referrer, candidate) in &dataset.referrals {
        if let Err(err) = graph.add_referral(referrer, candidate) {
            rejected += 1;
            log::warn!("skipping referral {} -> {}: {}", referrer, candidate, err);
        }
    }

    log::info!(
        "Loaded graph with {} users and {} referrals ({} rows rejected)",
        graph.user_count(),
        graph.edge_count(),
        rejected
    );

    graph
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
