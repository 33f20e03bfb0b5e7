//! High-risk queue construction.

use std::cmp::Ordering;

use claims_core::classification::RiskClassifier;
use claims_core::models::{ClaimResult, RiskFilter};

// ── FilterEngine ──────────────────────────────────────────────────────────────

/// Stateless builder of the sorted, filtered high-risk queue.
pub struct FilterEngine;

impl FilterEngine {
    /// Build the queue of fraud-flagged claims for the given filter.
    ///
    /// Legitimate records never enter the queue regardless of probability.
    /// Candidates are sorted by fraud probability descending; the sort is
    /// stable, so records with equal probability keep their input order.
    /// That tie-break is part of the contract, not an implementation detail.
    pub fn build_queue(results: &[ClaimResult], filter: RiskFilter) -> Vec<ClaimResult> {
        let mut queue: Vec<ClaimResult> =
            results.iter().filter(|r| r.is_fraud).cloned().collect();

        queue.sort_by(|a, b| {
            b.fraud_probability
                .partial_cmp(&a.fraud_probability)
                .unwrap_or(Ordering::Equal)
        });

        match filter {
            RiskFilter::All => queue,
            RiskFilter::High => queue
                .into_iter()
                .filter(|c| c.fraud_probability >= RiskClassifier::HIGH_THRESHOLD)
                .collect(),
            RiskFilter::Medium => queue
                .into_iter()
                .filter(|c| {
                    c.fraud_probability >= RiskClassifier::MEDIUM_THRESHOLD
                        && c.fraud_probability < RiskClassifier::HIGH_THRESHOLD
                })
                .collect(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
