//! Batch-level KPI and chart aggregation.
//!
//! Everything here is a pure function of the input [`Batch`]; aggregates are
//! recomputed in full whenever the batch is replaced, never updated
//! incrementally.

use claims_core::formatting;
use claims_core::models::{Batch, ChartView, Summary};

// ── AgeGroups ─────────────────────────────────────────────────────────────────

/// Claim counts over four fixed, left-closed/right-open age bins.
///
/// Records without a patient age fall into no bin, so the bin counts need
/// not sum to the batch total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgeGroups {
    /// Ages below 30.
    pub under_30: u64,
    /// Ages in `[30, 45)`.
    pub from_30_to_44: u64,
    /// Ages in `[45, 60)`.
    pub from_45_to_59: u64,
    /// Ages 60 and above.
    pub sixty_plus: u64,
}

impl AgeGroups {
    /// Chart labels paired with counts, in fixed display order.
    pub fn labelled(&self) -> [(&'static str, u64); 4] {
        [
            ("Under 30", self.under_30),
            ("30-45", self.from_30_to_44),
            ("45-60", self.from_45_to_59),
            ("60+", self.sixty_plus),
        ]
    }

    /// Number of records that landed in any bin (= records with a known age).
    pub fn total(&self) -> u64 {
        self.under_30 + self.from_30_to_44 + self.from_45_to_59 + self.sixty_plus
    }

    fn add_age(&mut self, age: i64) {
        if age < 30 {
            self.under_30 += 1;
        } else if age < 45 {
            self.from_30_to_44 += 1;
        } else if age < 60 {
            self.from_45_to_59 += 1;
        } else {
            self.sixty_plus += 1;
        }
    }
}

// ── Aggregates ────────────────────────────────────────────────────────────────

/// Dashboard KPIs and chart groupings derived from one batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregates {
    /// Fraud share of the batch as a percentage, one decimal. Zero for an
    /// empty batch.
    pub fraud_rate: f64,
    /// Sum of claim amounts over legitimate records with a known amount.
    pub legitimate_amount: f64,
    /// Sum of claim amounts over fraud-flagged records with a known amount.
    pub fraud_amount: f64,
    /// The fraud amount presented as the "prevented" KPI.
    pub estimated_prevented: f64,
    /// Age distribution counts.
    pub age_groups: AgeGroups,
    /// Fraud counts per provider type, first-occurrence order. Providers
    /// with no fraud records never appear.
    pub provider_fraud: Vec<(String, u64)>,
}

// ── AggregationEngine ─────────────────────────────────────────────────────────

/// Stateless computation of [`Aggregates`] from a batch.
pub struct AggregationEngine;

impl AggregationEngine {
    /// Compute all dashboard aggregates for `batch`.
    ///
    /// Deterministic for identical input and total for every batch; an empty
    /// batch yields all-zero aggregates rather than a division fault.
    pub fn compute(batch: &Batch) -> Aggregates {
        let summary = &batch.summary;

        let fraud_rate = formatting::percentage(
            summary.fraud_cases as f64,
            summary.total_claims as f64,
            1,
        );

        let mut legitimate_amount = 0.0;
        let mut fraud_amount = 0.0;
        let mut age_groups = AgeGroups::default();
        let mut provider_fraud: Vec<(String, u64)> = Vec::new();

        for result in &batch.results {
            if let Some(amount) = result.claim_amount {
                if result.is_fraud {
                    fraud_amount += amount;
                } else {
                    legitimate_amount += amount;
                }
            }

            if let Some(age) = result.patient_age {
                age_groups.add_age(age);
            }

            if result.is_fraud {
                match provider_fraud
                    .iter_mut()
                    .find(|(provider, _)| provider == &result.provider_type)
                {
                    Some((_, count)) => *count += 1,
                    None => provider_fraud.push((result.provider_type.clone(), 1)),
                }
            }
        }

        Aggregates {
            fraud_rate,
            legitimate_amount,
            fraud_amount,
            estimated_prevented: fraud_amount,
            age_groups,
            provider_fraud,
        }
    }

    /// The Legitimate/Fraudulent pair backing the distribution chart.
    ///
    /// Count mode reads the externally supplied summary; amount mode reads
    /// the computed amount sums.
    pub fn fraud_distribution(
        summary: &Summary,
        aggregates: &Aggregates,
        view: ChartView,
    ) -> [(&'static str, f64); 2] {
        match view {
            ChartView::Count => [
                ("Legitimate", summary.legitimate_cases as f64),
                ("Fraudulent", summary.fraud_cases as f64),
            ],
            ChartView::Amount => [
                ("Legitimate", aggregates.legitimate_amount),
                ("Fraudulent", aggregates.fraud_amount),
            ],
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
