//! Referral graph representation module

pub mod referral;

pub use referral::ReferralGraph;
