//! Core library for the referral network analyzer

pub mod analyzer;
pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod report;

pub use analyzer::{NetworkAnalyzer, RankedUser};
pub use error::ReferralError;
pub use graph::ReferralGraph;

pub use anyhow::{anyhow, Result};
