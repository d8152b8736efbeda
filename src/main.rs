use anyhow::Result;
use clap::Parser;

use referral_network_analyzer::config::Config;
use referral_network_analyzer::{data, report, NetworkAnalyzer};

#[derive(Parser, Debug)]
#[clap(
    name = "referral-network-analyzer",
    about = "Network analysis of referral graphs: reach, coverage, centrality"
)]
struct Cli {
    /// Path to the input referral dataset (JSON)
    #[clap(long)]
    input: String,

    /// Output directory for results
    #[clap(long, default_value = "analysis_results")]
    output_dir: String,

    /// Number of entries in the reach-based ranking
    #[clap(long, default_value = "10")]
    top_k: usize,

    /// Skip the all-pairs flow-centrality stage
    #[clap(long)]
    skip_centrality: bool,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    let config = Config::new(args.top_k, args.skip_centrality);

    log::info!("Starting referral network analysis");
    log::info!("Input: {}", args.input);
    log::info!("Output: {}", args.output_dir);

    // 1. Load the referral graph
    let graph = data::load_referral_data(&args.input)?;

    log::info!(
        "Analyzing graph with {} users and {} referrals",
        graph.user_count(),
        graph.edge_count()
    );

    let mut analyzer = NetworkAnalyzer::new();

    // 2. Reach-based ranking
    let reach_ranking = analyzer.get_top_referrers_by_reach(&graph, config.top_k)?;
    log::info!("Ranked {} users by total reach", reach_ranking.len());

    // 3. Greedy unique-reach expansion
    let expansion = analyzer.calculate_unique_reach_expansion(&graph);
    log::info!("Unique reach expansion selected {} users", expansion.len());

    // 4. Flow centrality, unless skipped
    let centrality = if config.skip_centrality {
        log::info!("Skipping flow centrality");
        None
    } else {
        let ranked = analyzer.calculate_flow_centrality(&graph);
        log::info!("Scored {} intermediary users", ranked.len());
        Some(ranked)
    };

    // 5. Save results
    report::save_report(
        &graph,
        &reach_ranking,
        &expansion,
        centrality.as_deref(),
        &args.output_dir,
    )?;

    log::info!("Analysis complete. Results saved to {}", args.output_dir);

    Ok(())
}
