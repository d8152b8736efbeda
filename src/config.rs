//! Configuration for the referral network analyzer

/// Analysis knobs shared between the CLI and library callers.
pub struct Config {
    /// Number of entries in the reach-based ranking
    pub top_k: usize,

    /// Skip the all-pairs flow-centrality stage
    pub skip_centrality: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            top_k: 10,
            skip_centrality: false,
        }
    }
}

impl Config {
    /// Create a configuration with custom values.
    pub fn new(top_k: usize, skip_centrality: bool) -> Self {
        Self {
            top_k,
            skip_centrality,
        }
    }
}
