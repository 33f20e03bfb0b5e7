//! Main analysis pipeline for Claimsight.
//!
//! Orchestrates batch discovery, validated ingestion, and aggregation,
//! returning an [`AnalysisResult`] ready for the UI layer. Queue filtering
//! and pagination stay out of this pipeline; they are cheap pure functions
//! the presentation layer applies per view-state change.

use chrono::Utc;

use claims_core::models::Batch;

use crate::aggregator::{AggregationEngine, Aggregates};
use crate::ingest::{latest_batch_file, load_batch, resolve_data_path};

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AnalysisMetadata {
    /// ISO-8601 timestamp when this result was generated.
    pub generated_at: String,
    /// Batch file the result was computed from, if one was found.
    pub source_file: Option<String>,
    /// Number of claim rows processed.
    pub records_processed: usize,
    /// Wall-clock seconds spent reading and validating the batch file.
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent computing aggregates.
    pub aggregate_time_seconds: f64,
}

/// The complete output of [`analyze_batch`].
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// The validated batch, or `None` when no usable batch file exists.
    pub batch: Option<Batch>,
    /// Dashboard aggregates (all zero when there is no batch).
    pub aggregates: Aggregates,
    /// Metadata about this analysis run.
    pub metadata: AnalysisMetadata,
    /// Human-readable rejection message when the newest batch file could not
    /// be ingested. A rejected batch never produces partial aggregates.
    pub error: Option<String>,
}

impl AnalysisResult {
    fn empty(source_file: Option<String>, load_time: f64, error: Option<String>) -> Self {
        AnalysisResult {
            batch: None,
            aggregates: Aggregates::default(),
            metadata: AnalysisMetadata {
                generated_at: Utc::now().to_rfc3339(),
                source_file,
                records_processed: 0,
                load_time_seconds: load_time,
                aggregate_time_seconds: 0.0,
            },
            error,
        }
    }
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full analysis pipeline.
///
/// 1. Resolve the drop directory and pick the newest `.json` batch file.
/// 2. Load and validate it (missing or malformed → empty result, never a
///    panic; the rejection message rides along for the UI to surface).
/// 3. Compute [`Aggregates`] from the validated batch.
pub fn analyze_batch(data_path: Option<&str>) -> AnalysisResult {
    let dir = resolve_data_path(data_path);

    let Some(file) = latest_batch_file(&dir) else {
        tracing::debug!("no batch files under {}", dir.display());
        return AnalysisResult::empty(None, 0.0, None);
    };
    let source = file.display().to_string();

    // ── Step 1: Load + validate ───────────────────────────────────────────────
    let load_start = std::time::Instant::now();
    let batch = match load_batch(&file) {
        Ok(batch) => batch,
        Err(e) => {
            tracing::warn!(error = %e, file = %source, "batch rejected");
            return AnalysisResult::empty(
                Some(source),
                load_start.elapsed().as_secs_f64(),
                Some(e.to_string()),
            );
        }
    };
    let load_time = load_start.elapsed().as_secs_f64();

    // ── Step 2: Aggregate ─────────────────────────────────────────────────────
    let aggregate_start = std::time::Instant::now();
    let aggregates = AggregationEngine::compute(&batch);
    let aggregate_time = aggregate_start.elapsed().as_secs_f64();

    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        source_file: Some(source),
        records_processed: batch.results.len(),
        load_time_seconds: load_time,
        aggregate_time_seconds: aggregate_time,
    };

    AnalysisResult {
        batch: Some(batch),
        aggregates,
        metadata,
        error: None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use claims_core::classification::{RiskClassifier, RiskTier};
    use claims_core::models::{RiskFilter, PAGE_SIZE};
    use tempfile::TempDir;

    use crate::pagination::Paginator;
    use crate::queue::FilterEngine;

    fn write_batch(dir: &std::path::Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    fn two_claim_batch() -> String {
        serde_json::json!({
            "summary": {"total_claims": 2, "fraud_cases": 1, "legitimate_cases": 1},
            "results": [
                {"row_id": 0, "is_fraud": true, "fraud_probability": 0.92,
                 "claim_amount": 500, "patient_age": 25, "provider_type": "Clinic"},
                {"row_id": 1, "is_fraud": false, "fraud_probability": 0.10,
                 "claim_amount": 300, "patient_age": 50, "provider_type": "Hospital"}
            ]
        })
        .to_string()
    }

    // ── analyze_batch ─────────────────────────────────────────────────────────

    #[test]
    fn test_analyze_batch_empty_directory() {
        let dir = TempDir::new().unwrap();
        let result = analyze_batch(Some(dir.path().to_str().unwrap()));

        assert!(result.batch.is_none());
        assert!(result.error.is_none());
        assert_eq!(result.aggregates, Aggregates::default());
        assert_eq!(result.metadata.records_processed, 0);
    }

    #[test]
    fn test_analyze_batch_missing_directory() {
        let result = analyze_batch(Some("/no/such/claimsight/dir"));
        assert!(result.batch.is_none());
        assert!(result.error.is_none());
    }

    #[test]
    fn test_analyze_batch_basic_pipeline() {
        let dir = TempDir::new().unwrap();
        write_batch(dir.path(), "batch.json", &two_claim_batch());

        let result = analyze_batch(Some(dir.path().to_str().unwrap()));

        let batch = result.batch.expect("batch loaded");
        assert_eq!(batch.results.len(), 2);
        assert_eq!(result.metadata.records_processed, 2);
        assert!(result
            .metadata
            .source_file
            .as_deref()
            .unwrap()
            .ends_with("batch.json"));
        assert!(result.metadata.load_time_seconds >= 0.0);
        assert!(!result.metadata.generated_at.is_empty());
    }

    #[test]
    fn test_analyze_batch_malformed_rejected_without_partial_aggregates() {
        let dir = TempDir::new().unwrap();
        write_batch(dir.path(), "bad.json", r#"{"results": []}"#);

        let result = analyze_batch(Some(dir.path().to_str().unwrap()));

        assert!(result.batch.is_none());
        assert_eq!(result.aggregates, Aggregates::default());
        let error = result.error.expect("rejection message");
        assert!(error.contains("summary"), "error was: {error}");
    }

    #[test]
    fn test_analyze_batch_newest_file_wins() {
        let dir = TempDir::new().unwrap();
        write_batch(
            dir.path(),
            "first.json",
            &serde_json::json!({
                "summary": {"total_claims": 1, "fraud_cases": 0, "legitimate_cases": 1},
                "results": [{"row_id": 0, "is_fraud": false, "fraud_probability": 0.1}]
            })
            .to_string(),
        );
        write_batch(dir.path(), "second.json", &two_claim_batch());

        let future = std::time::SystemTime::now() + std::time::Duration::from_secs(60);
        std::fs::File::options()
            .append(true)
            .open(dir.path().join("second.json"))
            .unwrap()
            .set_modified(future)
            .unwrap();

        let result = analyze_batch(Some(dir.path().to_str().unwrap()));
        assert_eq!(result.metadata.records_processed, 2);
    }

    // ── end-to-end scenario ───────────────────────────────────────────────────

    #[test]
    fn test_end_to_end_two_claim_scenario() {
        let dir = TempDir::new().unwrap();
        write_batch(dir.path(), "batch.json", &two_claim_batch());

        let result = analyze_batch(Some(dir.path().to_str().unwrap()));
        let batch = result.batch.expect("batch loaded");
        let aggregates = &result.aggregates;

        assert!((aggregates.fraud_rate - 50.0).abs() < 1e-9);
        assert!((aggregates.estimated_prevented - 500.0).abs() < 1e-9);
        assert_eq!(aggregates.age_groups.under_30, 1);
        assert_eq!(aggregates.age_groups.from_30_to_44, 0);
        assert_eq!(aggregates.age_groups.from_45_to_59, 1);
        assert_eq!(aggregates.age_groups.sixty_plus, 0);

        let queue = FilterEngine::build_queue(&batch.results, RiskFilter::All);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].row_id, 0);
        assert_eq!(
            RiskClassifier::classify(queue[0].fraud_probability),
            RiskTier::High
        );
        assert!(RiskClassifier::is_critical(queue[0].fraud_probability));

        let page = Paginator::paginate(&queue, PAGE_SIZE, 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.slice.len(), 1);
    }
}
