use serde::{Deserialize, Serialize};

/// Number of queue rows shown per dashboard page.
pub const PAGE_SIZE: usize = 10;

/// Provider label substituted when a record carries none.
pub const UNKNOWN_PROVIDER: &str = "Unknown";

/// Display string substituted when a record carries no risk reasons.
pub const FALLBACK_RISK_REASON: &str = "High fraud probability score";

/// One scored claim row from an uploaded batch.
///
/// Produced by the external classification service and normalised at
/// ingestion: `provider_type` and `risk_reasons` always hold displayable
/// values after that step, while `claim_amount` and `patient_age` stay
/// optional so missing data can be excluded from sums and bins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimResult {
    /// Stable identity within a batch; shown to the user as `row_id + 1`.
    pub row_id: u64,
    /// Claimed monetary amount in euros; absent amounts are excluded from sums.
    #[serde(default)]
    pub claim_amount: Option<f64>,
    /// Patient age in years, if known.
    #[serde(default)]
    pub patient_age: Option<i64>,
    /// Resolved provider label (never empty; `"Unknown"` when unreported).
    pub provider_type: String,
    /// Authoritative fraud flag from the classifier.
    pub is_fraud: bool,
    /// Classifier fraud probability in `[0, 1]`.
    pub fraud_probability: f64,
    /// Human-readable risk factors, most significant first.
    #[serde(default)]
    pub risk_reasons: Vec<String>,
}

impl ClaimResult {
    /// One-based claim number shown in the UI (`#1`, `#2`, ...).
    pub fn display_id(&self) -> u64 {
        self.row_id + 1
    }

    /// First risk reason, falling back to the standard display string when
    /// the record carries none.
    pub fn primary_risk_reason(&self) -> &str {
        self.risk_reasons
            .first()
            .map(|s| s.as_str())
            .unwrap_or(FALLBACK_RISK_REASON)
    }
}

/// Batch-level counts reported by the classification service.
///
/// These are externally supplied and never recomputed from the result list;
/// downstream code must not assume `fraud_cases + legitimate_cases` equals
/// `total_claims`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of rows in the uploaded batch.
    pub total_claims: u64,
    /// Rows the classifier flagged as fraudulent.
    pub fraud_cases: u64,
    /// Rows the classifier flagged as legitimate.
    pub legitimate_cases: u64,
}

/// One uploaded set of claims plus its summary.
///
/// Immutable once built: a new upload replaces the batch wholesale and a
/// reset discards it. Derived dashboard structures are recomputed from
/// scratch on every replacement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    /// Classifier-reported counts for the whole batch.
    pub summary: Summary,
    /// Scored rows in upload order.
    pub results: Vec<ClaimResult>,
}

// ── View state ────────────────────────────────────────────────────────────────

/// Risk-tier narrowing applied to the high-risk queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskFilter {
    /// Every fraud-flagged claim.
    #[default]
    All,
    /// Probability at or above 0.8 only.
    High,
    /// Probability in `[0.6, 0.8)` only.
    Medium,
}

impl RiskFilter {
    /// Dropdown label matching the dashboard filter control.
    pub fn label(&self) -> &'static str {
        match self {
            RiskFilter::All => "All Risks",
            RiskFilter::High => "High Risk Only",
            RiskFilter::Medium => "Medium Risk Only",
        }
    }

    /// Next filter in the cycle order All → High → Medium → All.
    pub fn next(&self) -> RiskFilter {
        match self {
            RiskFilter::All => RiskFilter::High,
            RiskFilter::High => RiskFilter::Medium,
            RiskFilter::Medium => RiskFilter::All,
        }
    }
}

/// Whether the fraud distribution chart shows case counts or amounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartView {
    /// Legitimate vs fraudulent case counts from the summary.
    #[default]
    Count,
    /// Legitimate vs fraudulent claim-amount sums.
    Amount,
}

impl ChartView {
    /// The other chart mode.
    pub fn toggled(&self) -> ChartView {
        match self {
            ChartView::Count => ChartView::Amount,
            ChartView::Amount => ChartView::Count,
        }
    }
}

/// User-selected dashboard parameters, reset whenever a batch is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Active queue narrowing.
    pub risk_filter: RiskFilter,
    /// Requested page, 1-based. Clamped against the queue length at
    /// pagination time, never here.
    pub current_page: u64,
    /// Active fraud distribution chart mode.
    pub chart_view: ChartView,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            risk_filter: RiskFilter::All,
            current_page: 1,
            chart_view: ChartView::Count,
        }
    }
}

impl ViewState {
    /// Select a queue filter.
    ///
    /// Changing the filter returns to page 1 so the visible page can never
    /// point past the end of a shorter filtered queue.
    pub fn set_filter(&mut self, filter: RiskFilter) {
        if self.risk_filter != filter {
            self.risk_filter = filter;
            self.current_page = 1;
        }
    }

    /// Advance to the next filter in cycle order.
    pub fn cycle_filter(&mut self) {
        self.set_filter(self.risk_filter.next());
    }

    /// Request a page. Values below 1 snap to 1; the upper bound is enforced
    /// against the actual queue when the page is sliced.
    pub fn set_page(&mut self, page: u64) {
        self.current_page = page.max(1);
    }

    /// Flip the fraud distribution chart between count and amount mode.
    pub fn toggle_chart_view(&mut self) {
        self.chart_view = self.chart_view.toggled();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_claim(row_id: u64, reasons: &[&str]) -> ClaimResult {
        ClaimResult {
            row_id,
            claim_amount: Some(100.0),
            patient_age: Some(40),
            provider_type: "Clinic".to_string(),
            is_fraud: true,
            fraud_probability: 0.9,
            risk_reasons: reasons.iter().map(|s| s.to_string()).collect(),
        }
    }

    // ── ClaimResult ───────────────────────────────────────────────────────────

    #[test]
    fn test_display_id_is_one_based() {
        assert_eq!(make_claim(0, &[]).display_id(), 1);
        assert_eq!(make_claim(41, &[]).display_id(), 42);
    }

    #[test]
    fn test_primary_risk_reason_first_entry() {
        let claim = make_claim(0, &["Unusual billing pattern", "Distant provider"]);
        assert_eq!(claim.primary_risk_reason(), "Unusual billing pattern");
    }

    #[test]
    fn test_primary_risk_reason_fallback() {
        let claim = make_claim(0, &[]);
        assert_eq!(claim.primary_risk_reason(), FALLBACK_RISK_REASON);
    }

    #[test]
    fn test_claim_result_serde_defaults() {
        // Optional fields may be absent entirely on the wire.
        let json = r#"{
            "row_id": 3,
            "provider_type": "Hospital",
            "is_fraud": false,
            "fraud_probability": 0.12
        }"#;
        let claim: ClaimResult = serde_json::from_str(json).unwrap();
        assert_eq!(claim.row_id, 3);
        assert!(claim.claim_amount.is_none());
        assert!(claim.patient_age.is_none());
        assert!(claim.risk_reasons.is_empty());
    }

    // ── RiskFilter / ChartView ────────────────────────────────────────────────

    #[test]
    fn test_risk_filter_cycle_order() {
        assert_eq!(RiskFilter::All.next(), RiskFilter::High);
        assert_eq!(RiskFilter::High.next(), RiskFilter::Medium);
        assert_eq!(RiskFilter::Medium.next(), RiskFilter::All);
    }

    #[test]
    fn test_risk_filter_serde_lowercase() {
        let json = serde_json::to_string(&RiskFilter::High).unwrap();
        assert_eq!(json, r#""high""#);
        let back: RiskFilter = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RiskFilter::High);
    }

    #[test]
    fn test_chart_view_toggle_roundtrip() {
        assert_eq!(ChartView::Count.toggled(), ChartView::Amount);
        assert_eq!(ChartView::Amount.toggled(), ChartView::Count);
    }

    // ── ViewState ─────────────────────────────────────────────────────────────

    #[test]
    fn test_view_state_default() {
        let vs = ViewState::default();
        assert_eq!(vs.risk_filter, RiskFilter::All);
        assert_eq!(vs.current_page, 1);
        assert_eq!(vs.chart_view, ChartView::Count);
    }

    #[test]
    fn test_set_filter_resets_page() {
        let mut vs = ViewState::default();
        vs.set_page(7);
        vs.set_filter(RiskFilter::Medium);
        assert_eq!(vs.risk_filter, RiskFilter::Medium);
        assert_eq!(vs.current_page, 1);
    }

    #[test]
    fn test_set_same_filter_keeps_page() {
        let mut vs = ViewState::default();
        vs.set_page(4);
        vs.set_filter(RiskFilter::All);
        assert_eq!(vs.current_page, 4);
    }

    #[test]
    fn test_set_page_snaps_to_one() {
        let mut vs = ViewState::default();
        vs.set_page(0);
        assert_eq!(vs.current_page, 1);
    }
}
