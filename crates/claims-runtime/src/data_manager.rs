//! Identity-cached data manager for the dashboard runtime.
//!
//! Wraps [`analyze_batch`] with a cache keyed on the newest batch file's
//! path and modification time, so unrelated UI events (theme toggles, filter
//! clicks) never trigger a recomputation; only a genuinely new or rewritten
//! batch file does. A rejected batch keeps the previous good snapshot on
//! screen while its rejection message is surfaced.

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, SystemTime};

use claims_data::analysis::{analyze_batch, AnalysisResult};
use claims_data::ingest::{latest_batch_file, resolve_data_path};

// ── Defaults ──────────────────────────────────────────────────────────────────

/// Maximum number of fetch attempts before giving up and returning stale data.
const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Identity of the batch file a cached result was computed from.
type BatchIdentity = (PathBuf, SystemTime);

// ── DataManager ───────────────────────────────────────────────────────────────

/// Identity-cached wrapper around the full analysis pipeline.
///
/// # Example
/// ```no_run
/// use claims_runtime::data_manager::DataManager;
///
/// let mut mgr = DataManager::new(None);
/// if let Some(result) = mgr.get_data(false) {
///     println!("records: {}", result.metadata.records_processed);
/// }
/// ```
pub struct DataManager {
    /// Optional override for the batch drop directory.
    data_path: Option<String>,
    /// Most recently accepted analysis result.
    cache: Option<AnalysisResult>,
    /// Identity of the batch file the cache was computed from.
    cache_identity: Option<BatchIdentity>,
    /// Human-readable description of the last ingestion failure, if any.
    last_error: Option<String>,
}

impl DataManager {
    /// Create a new manager watching `data_path` (or the default drop
    /// directory when `None`).
    pub fn new(data_path: Option<String>) -> Self {
        Self {
            data_path,
            cache: None,
            cache_identity: None,
            last_error: None,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Return analysis data, reusing the cache while the newest batch file
    /// is unchanged.
    ///
    /// When `force_refresh` is `true` the identity check is bypassed and a
    /// fresh fetch is always attempted. A fetch that rejects the batch (or
    /// fails outright) falls back to the previous snapshot so the dashboard
    /// never goes blank over a bad upload.
    pub fn get_data(&mut self, force_refresh: bool) -> Option<&AnalysisResult> {
        let identity = self.current_identity();

        if !force_refresh && self.cache.is_some() && identity == self.cache_identity {
            tracing::debug!("returning cached analysis result");
            return self.cache.as_ref();
        }

        match self.fetch_with_retry() {
            Ok(result) => {
                if result.batch.is_none() && result.error.is_some() && self.has_batch() {
                    // Rejected replacement: keep the last good snapshot but
                    // remember why the new file was refused. The identity is
                    // still advanced so the bad file is not re-parsed on
                    // every poll.
                    tracing::warn!(
                        error = result.error.as_deref().unwrap_or(""),
                        "batch rejected; keeping previous snapshot"
                    );
                    self.last_error = result.error;
                    self.cache_identity = identity;
                } else {
                    tracing::debug!(
                        records = result.metadata.records_processed,
                        "analysis cache updated"
                    );
                    self.last_error = result.error.clone();
                    self.cache = Some(result);
                    self.cache_identity = identity;
                }
                self.cache.as_ref()
            }
            Err(e) => {
                tracing::warn!(error = %e, "fetch failed; falling back to cached data");
                self.last_error = Some(e);
                // Return whatever we have, even if stale.
                self.cache.as_ref()
            }
        }
    }

    /// Discard the current cache, forcing the next [`get_data`] call to fetch.
    ///
    /// [`get_data`]: DataManager::get_data
    pub fn invalidate_cache(&mut self) {
        self.cache = None;
        self.cache_identity = None;
        tracing::debug!("cache invalidated");
    }

    /// Human-readable description of the last ingestion failure, or `None`.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // ── Private helpers ───────────────────────────────────────────────────

    /// `true` when the cached result carries a loaded batch.
    fn has_batch(&self) -> bool {
        self.cache.as_ref().is_some_and(|r| r.batch.is_some())
    }

    /// Identity of the newest batch file right now, or `None` when there is
    /// no batch file at all.
    fn current_identity(&self) -> Option<BatchIdentity> {
        let dir = resolve_data_path(self.data_path.as_deref());
        let path = latest_batch_file(&dir)?;
        let mtime = std::fs::metadata(&path).and_then(|m| m.modified()).ok()?;
        Some((path, mtime))
    }

    /// Attempt up to [`MAX_RETRY_ATTEMPTS`] fetches with back-off.
    ///
    /// Back-off schedule: attempt 1 → 0 ms, attempt 2 → 100 ms, attempt 3 → 200 ms.
    fn fetch_with_retry(&mut self) -> Result<AnalysisResult, String> {
        let mut last_err = String::new();

        for attempt in 0..MAX_RETRY_ATTEMPTS {
            if attempt > 0 {
                let sleep_ms = (attempt as u64) * 100;
                tracing::debug!(attempt, sleep_ms, "retrying fetch after back-off");
                thread::sleep(Duration::from_millis(sleep_ms));
            }

            match self.fetch_fresh() {
                Ok(result) => return Ok(result),
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "fetch attempt failed");
                    last_err = e;
                }
            }
        }

        Err(last_err)
    }

    /// Call the analysis pipeline with this manager's configuration.
    fn fetch_fresh(&self) -> Result<AnalysisResult, String> {
        // analyze_batch reports ingestion problems inside the result rather
        // than panicking, so catch_unwind is pure belt-and-braces.
        let result =
            std::panic::catch_unwind(|| analyze_batch(self.data_path.as_deref())).map_err(|e| {
                format!(
                    "analyze_batch panicked: {:?}",
                    e.downcast_ref::<&str>().unwrap_or(&"unknown panic")
                )
            })?;

        Ok(result)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_batch_json() -> String {
        serde_json::json!({
            "summary": {"total_claims": 1, "fraud_cases": 1, "legitimate_cases": 0},
            "results": [
                {"row_id": 0, "is_fraud": true, "fraud_probability": 0.9,
                 "claim_amount": 400.0, "patient_age": 33, "provider_type": "Clinic"}
            ]
        })
        .to_string()
    }

    /// Returns a DataManager + TempDir. The TempDir MUST be kept alive for
    /// the duration of the test.
    fn make_manager_with_dir() -> (DataManager, tempfile::TempDir) {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().to_str().unwrap().to_string();
        let mgr = DataManager::new(Some(path));
        (mgr, dir)
    }

    // ── empty directory ───────────────────────────────────────────────────

    #[test]
    fn test_empty_directory_yields_empty_result() {
        let (mut mgr, _dir) = make_manager_with_dir();
        let result = mgr.get_data(false).expect("result");
        assert!(result.batch.is_none());
        assert!(mgr.last_error().is_none());
    }

    // ── identity cache ────────────────────────────────────────────────────

    #[test]
    fn test_unchanged_file_served_from_cache() {
        let (mut mgr, dir) = make_manager_with_dir();
        std::fs::write(dir.path().join("batch.json"), valid_batch_json()).unwrap();

        let first_generated = mgr
            .get_data(false)
            .expect("first fetch")
            .metadata
            .generated_at
            .clone();

        // Second call with an unchanged file must return the same snapshot,
        // not a recomputation.
        let second_generated = mgr
            .get_data(false)
            .expect("second fetch")
            .metadata
            .generated_at
            .clone();
        assert_eq!(first_generated, second_generated);
    }

    #[test]
    fn test_new_file_invalidates_cache() {
        let (mut mgr, dir) = make_manager_with_dir();
        std::fs::write(dir.path().join("batch.json"), valid_batch_json()).unwrap();
        let first = mgr.get_data(false).expect("first").metadata.generated_at.clone();

        // Drop a newer batch file into the directory.
        let newer = dir.path().join("newer.json");
        std::fs::write(&newer, valid_batch_json()).unwrap();
        let future = std::time::SystemTime::now() + Duration::from_secs(60);
        std::fs::File::options()
            .append(true)
            .open(&newer)
            .unwrap()
            .set_modified(future)
            .unwrap();

        let second = mgr.get_data(false).expect("second").metadata.generated_at.clone();
        assert_ne!(first, second, "new batch file must bypass the cache");
    }

    #[test]
    fn test_force_refresh_bypasses_cache() {
        let (mut mgr, dir) = make_manager_with_dir();
        std::fs::write(dir.path().join("batch.json"), valid_batch_json()).unwrap();

        let first = mgr.get_data(false).expect("first").metadata.generated_at.clone();
        let forced = mgr.get_data(true).expect("forced").metadata.generated_at.clone();
        // Forced refresh recomputes even though the identity is unchanged.
        assert_ne!(first, forced);
    }

    #[test]
    fn test_invalidate_cache() {
        let (mut mgr, dir) = make_manager_with_dir();
        std::fs::write(dir.path().join("batch.json"), valid_batch_json()).unwrap();

        mgr.get_data(false);
        assert!(mgr.cache.is_some());

        mgr.invalidate_cache();
        assert!(mgr.cache.is_none());
        assert!(mgr.cache_identity.is_none());
    }

    // ── rejected replacement ──────────────────────────────────────────────

    #[test]
    fn test_malformed_replacement_keeps_previous_snapshot() {
        let (mut mgr, dir) = make_manager_with_dir();
        std::fs::write(dir.path().join("batch.json"), valid_batch_json()).unwrap();
        mgr.get_data(false);
        assert!(mgr.last_error().is_none());

        // Replace with a malformed file that is newer.
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, r#"{"results": []}"#).unwrap();
        let future = std::time::SystemTime::now() + Duration::from_secs(60);
        std::fs::File::options()
            .append(true)
            .open(&bad)
            .unwrap()
            .set_modified(future)
            .unwrap();

        let result = mgr.get_data(false).expect("fallback snapshot");
        // Previous good batch is still on screen.
        assert!(result.batch.is_some());
        // The rejection is surfaced.
        let err = mgr.last_error().expect("rejection message");
        assert!(err.contains("summary"), "error was: {err}");
    }

    #[test]
    fn test_malformed_first_batch_yields_error_result() {
        let (mut mgr, dir) = make_manager_with_dir();
        std::fs::write(dir.path().join("bad.json"), "{not json").unwrap();

        let result = mgr.get_data(false).expect("result");
        // No earlier snapshot exists, so the empty result is served as-is.
        assert!(result.batch.is_none());
        assert!(mgr.last_error().is_some());
    }
}
