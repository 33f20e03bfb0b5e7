//! Async dashboard orchestrator.
//!
//! Coordinates the [`DataManager`] in a tokio task, sending periodic
//! [`DashboardData`] snapshots through an `mpsc` channel so the TUI event
//! loop can consume them without any shared mutable state. A batch replace
//! is an atomic event from the UI's perspective: each snapshot is immutable
//! and supersedes the previous one wholesale.

use std::collections::HashSet;
use std::time::Duration;

use claims_data::analysis::AnalysisResult;
use tokio::sync::mpsc;
use tokio::time;

use crate::data_manager::DataManager;

// ── Public types ──────────────────────────────────────────────────────────────

/// A single dashboard snapshot forwarded to the TUI layer.
///
/// This is the primary data contract between the background runtime and the
/// presentation layer.
#[derive(Debug, Clone)]
pub struct DashboardData {
    /// Full analysis result from the data pipeline.
    pub analysis: AnalysisResult,
    /// Number of distinct batch files observed since startup.
    pub batches_seen: usize,
    /// Ingestion failure to surface, if the newest file was rejected.
    pub ingest_error: Option<String>,
}

// ── DashboardOrchestrator ─────────────────────────────────────────────────────

/// Background refresh coordinator.
///
/// Call [`DashboardOrchestrator::start`] to spin up the polling loop in a
/// dedicated tokio task and receive a channel endpoint for [`DashboardData`]
/// updates.
pub struct DashboardOrchestrator {
    /// How often to re-check the drop directory.
    update_interval: Duration,
    /// Optional override for the batch drop directory.
    data_path: Option<String>,
}

impl DashboardOrchestrator {
    /// Create a new orchestrator.
    ///
    /// # Parameters
    /// - `update_interval_secs` – seconds between drop-directory checks.
    /// - `data_path`            – optional drop directory override.
    pub fn new(update_interval_secs: u64, data_path: Option<String>) -> Self {
        Self {
            update_interval: Duration::from_secs(update_interval_secs),
            data_path,
        }
    }

    /// Start the polling loop.
    ///
    /// Spawns a tokio task that runs the loop. Returns:
    /// - An `mpsc::Receiver<DashboardData>` for the caller to poll.
    /// - A [`DashboardHandle`] that can be used to abort the loop.
    pub fn start(self) -> (mpsc::Receiver<DashboardData>, DashboardHandle) {
        // Buffer a modest number of snapshots so slow consumers don't stall the loop.
        let (tx, rx) = mpsc::channel(16);

        let handle = tokio::spawn(async move {
            self.polling_loop(tx).await;
        });

        (rx, DashboardHandle { handle })
    }

    // ── Private implementation ────────────────────────────────────────────

    /// The main polling loop.
    ///
    /// Performs an immediate fetch on startup, then repeats on `update_interval`.
    /// The loop exits when the receiver side of the channel is closed.
    async fn polling_loop(self, tx: mpsc::Sender<DashboardData>) {
        let mut data_manager = DataManager::new(self.data_path.clone());
        let mut seen_sources: HashSet<String> = HashSet::new();

        // Initial fetch (force refresh to populate immediately).
        Self::fetch_and_send(&mut data_manager, &mut seen_sources, &tx, true).await;

        let mut interval = time::interval(self.update_interval);
        // Consume the first tick which fires immediately; we already fetched above.
        interval.tick().await;

        loop {
            interval.tick().await;

            if tx.is_closed() {
                tracing::debug!("dashboard channel closed; exiting loop");
                break;
            }

            Self::fetch_and_send(&mut data_manager, &mut seen_sources, &tx, false).await;
        }
    }

    /// Fetch fresh data and send a [`DashboardData`] snapshot to the channel.
    async fn fetch_and_send(
        data_manager: &mut DataManager,
        seen_sources: &mut HashSet<String>,
        tx: &mpsc::Sender<DashboardData>,
        force: bool,
    ) {
        // Obtain the analysis result (clone so we can own it for the snapshot).
        let analysis = match data_manager.get_data(force) {
            Some(r) => r.clone(),
            None => {
                tracing::warn!("no analysis data available; skipping send");
                return;
            }
        };

        if let Some(source) = &analysis.metadata.source_file {
            seen_sources.insert(source.clone());
        }

        let snapshot = DashboardData {
            batches_seen: seen_sources.len(),
            ingest_error: data_manager.last_error().map(|s| s.to_string()),
            analysis,
        };

        if let Err(e) = tx.send(snapshot).await {
            tracing::warn!(error = %e, "failed to send dashboard snapshot; receiver dropped");
        }
    }
}

// ── DashboardHandle ───────────────────────────────────────────────────────────

/// A handle to the background polling task.
///
/// Drop or call [`DashboardHandle::abort`] to stop the loop.
pub struct DashboardHandle {
    handle: tokio::task::JoinHandle<()>,
}

impl DashboardHandle {
    /// Immediately abort the polling loop.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use claims_data::aggregator::Aggregates;
    use claims_data::analysis::{AnalysisMetadata, AnalysisResult};

    // ── helpers ───────────────────────────────────────────────────────────

    fn empty_result() -> AnalysisResult {
        AnalysisResult {
            batch: None,
            aggregates: Aggregates::default(),
            metadata: AnalysisMetadata {
                generated_at: "2026-01-01T00:00:00Z".to_string(),
                source_file: None,
                records_processed: 0,
                load_time_seconds: 0.0,
                aggregate_time_seconds: 0.0,
            },
            error: None,
        }
    }

    // ── orchestrator creation ─────────────────────────────────────────────

    #[test]
    fn test_orchestrator_creation() {
        let orch = DashboardOrchestrator::new(5, Some("/tmp/test-batches".to_string()));
        assert_eq!(orch.update_interval, Duration::from_secs(5));
        assert_eq!(orch.data_path.as_deref(), Some("/tmp/test-batches"));
    }

    // ── DashboardData structure ───────────────────────────────────────────

    #[test]
    fn test_dashboard_data_structure() {
        let data = DashboardData {
            analysis: empty_result(),
            batches_seen: 2,
            ingest_error: Some("Malformed batch: missing field `summary`".to_string()),
        };

        assert_eq!(data.batches_seen, 2);
        assert!(data.analysis.batch.is_none());
        assert!(data.ingest_error.as_deref().unwrap().contains("summary"));
    }

    #[test]
    fn test_dashboard_data_clone() {
        let data = DashboardData {
            analysis: empty_result(),
            batches_seen: 0,
            ingest_error: None,
        };
        let cloned = data.clone();
        assert_eq!(cloned.batches_seen, 0);
        assert!(cloned.ingest_error.is_none());
    }

    // ── async: start / abort ──────────────────────────────────────────────

    #[tokio::test]
    async fn test_orchestrator_start_and_abort() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().to_str().unwrap().to_string();

        let orch = DashboardOrchestrator::new(60, Some(path));
        let (_rx, handle) = orch.start();

        // Give the task a moment to start, then abort it.
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.abort();
    }

    // ── async: receives initial snapshot ─────────────────────────────────

    #[tokio::test]
    async fn test_orchestrator_sends_initial_snapshot() {
        let dir = tempfile::TempDir::new().unwrap();
        let batch = serde_json::json!({
            "summary": {"total_claims": 1, "fraud_cases": 1, "legitimate_cases": 0},
            "results": [{"row_id": 0, "is_fraud": true, "fraud_probability": 0.9}]
        });
        std::fs::write(dir.path().join("batch.json"), batch.to_string()).unwrap();
        let path = dir.path().to_str().unwrap().to_string();

        let orch = DashboardOrchestrator::new(60, Some(path));
        let (mut rx, handle) = orch.start();

        // The first snapshot should arrive quickly.
        let snapshot = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for snapshot")
            .expect("channel closed before receiving snapshot");

        assert_eq!(snapshot.batches_seen, 1);
        assert_eq!(snapshot.analysis.metadata.records_processed, 1);

        handle.abort();
    }
}
