//! Analysis report persistence

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use itertools::Itertools;
use serde_json::{json, to_string_pretty};

use crate::analyzer::RankedUser;
use crate::graph::ReferralGraph;

/// Save analysis results to the specified directory.
///
/// Writes one JSON file per ranking plus a graph summary. The
/// centrality ranking is optional so callers can skip the expensive
/// stage entirely.
pub fn save_report(
    graph: &ReferralGraph,
    reach_ranking: &[RankedUser],
    expansion: &[RankedUser],
    centrality: Option<&[RankedUser]>,
    output_dir: &str,
) -> Result<()> {
    log::info!("Saving analysis reports to {}", output_dir);

    fs::create_dir_all(output_dir)?;

    save_ranking(reach_ranking, "reach_ranking.json", output_dir)?;
    save_ranking(expansion, "unique_reach_expansion.json", output_dir)?;
    if let Some(centrality) = centrality {
        save_ranking(centrality, "flow_centrality.json", output_dir)?;
    }
    save_summary(graph, output_dir)?;

    log::info!("Reports saved successfully");

    Ok(())
}

/// Save one ranked listing.
fn save_ranking(ranking: &[RankedUser], file_name: &str, output_dir: &str) -> Result<()> {
    let path = Path::new(output_dir).join(file_name);
    let mut file = File::create(path)?;

    let payload = json!({
        "count": ranking.len(),
        "ranking": ranking,
    });

    file.write_all(to_string_pretty(&payload)?.as_bytes())?;

    Ok(())
}

/// Save graph-level statistics.
fn save_summary(graph: &ReferralGraph, output_dir: &str) -> Result<()> {
    log::info!("Saving graph summary");

    let path = Path::new(output_dir).join("summary.json");
    let mut file = File::create(path)?;

    let node_indices = 0..graph.user_count() as u32;
    let root_count = node_indices.clone().filter(|&i| graph.is_root(i)).count();

    // How many users made 0, 1, 2, … direct referrals
    let referral_distribution: BTreeMap<String, usize> = node_indices
        .map(|i| graph.referral_count(i))
        .counts()
        .into_iter()
        .map(|(count, users)| (count.to_string(), users))
        .collect();

    let summary = json!({
        "user_count": graph.user_count(),
        "referral_count": graph.edge_count(),
        "root_count": root_count,
        "referral_distribution": referral_distribution,
    });

    file.write_all(to_string_pretty(&summary)?.as_bytes())?;

    Ok(())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
