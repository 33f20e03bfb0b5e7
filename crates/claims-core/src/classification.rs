use serde::{Deserialize, Serialize};

// ── RiskTier ──────────────────────────────────────────────────────────────────

/// Risk tier derived from a claim's fraud probability by fixed thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskTier {
    /// Probability at or above 0.8.
    High,
    /// Probability in `[0.6, 0.8)`.
    Medium,
    /// Probability below 0.6.
    Low,
}

impl RiskTier {
    /// Badge text shown in the queue table.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::High => "HIGH",
            RiskTier::Medium => "MEDIUM",
            RiskTier::Low => "LOW",
        }
    }
}

// ── RiskClassifier ────────────────────────────────────────────────────────────

/// Stateless mapping from fraud probabilities to risk tiers.
///
/// The tiers partition `[0, 1]` exhaustively with inclusive lower bounds.
/// Values outside the unit interval are accepted and fall through the same
/// comparisons rather than being validated.
pub struct RiskClassifier;

impl RiskClassifier {
    /// Lower bound of the HIGH tier (inclusive).
    pub const HIGH_THRESHOLD: f64 = 0.8;
    /// Lower bound of the MEDIUM tier (inclusive).
    pub const MEDIUM_THRESHOLD: f64 = 0.6;
    /// Lower bound of the critical highlight, nested inside HIGH.
    pub const CRITICAL_THRESHOLD: f64 = 0.85;

    /// Map a fraud probability to its risk tier.
    pub fn classify(probability: f64) -> RiskTier {
        if probability >= Self::HIGH_THRESHOLD {
            RiskTier::High
        } else if probability >= Self::MEDIUM_THRESHOLD {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    /// Whether a probability warrants the critical row highlight.
    ///
    /// A display-only sub-flag of [`RiskTier::High`]; it never forms a
    /// fourth tier.
    pub fn is_critical(probability: f64) -> bool {
        probability >= Self::CRITICAL_THRESHOLD
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
