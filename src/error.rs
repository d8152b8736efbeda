//! Error types for the referral graph and its analyzers

use thiserror::Error;

/// Failures raised by graph mutations and analyzer queries.
///
/// Every variant is a synchronous, immediately-raised failure of a single
/// call. A failed mutation leaves the graph exactly as it was; retrying
/// with the same input reproduces the same failure.
#[derive(Debug, Error)]
pub enum ReferralError {
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("user cannot refer themselves: {0}")]
    SelfReferral(String),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("user {0} already has a referrer")]
    DuplicateReferrer(String),

    #[error("referral {referrer_id} -> {candidate_id} would create a cycle")]
    CycleDetected {
        referrer_id: String,
        candidate_id: String,
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
