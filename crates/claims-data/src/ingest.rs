//! Batch file discovery and validated ingestion for Claimsight.
//!
//! The classification service's JSON response is consumed from a drop
//! directory: each new `.json` file replaces the dashboard's batch wholesale,
//! newest file wins. Ingestion is the only place wire-level fallbacks are
//! applied; downstream code sees fully resolved [`Batch`] values.

use std::path::{Path, PathBuf};

use claims_core::error::{ClaimsError, Result};
use claims_core::models::{
    Batch, ClaimResult, Summary, FALLBACK_RISK_REASON, UNKNOWN_PROVIDER,
};
use serde::Deserialize;
use tracing::warn;

// ── Wire model ────────────────────────────────────────────────────────────────

/// Raw classifier response shape.
///
/// `summary` and `results` are optional here so their absence is detectable
/// and reportable as a [`ClaimsError::MalformedBatch`] instead of a bare
/// deserialization failure. Unknown fields (e.g. the service's redundant
/// `prediction` integer) are ignored.
#[derive(Debug, Deserialize)]
struct RawBatch {
    summary: Option<Summary>,
    results: Option<Vec<RawClaimResult>>,
}

/// One raw result row as it appears on the wire.
#[derive(Debug, Deserialize)]
struct RawClaimResult {
    row_id: u64,
    #[serde(default)]
    claim_amount: Option<f64>,
    #[serde(default)]
    patient_age: Option<i64>,
    #[serde(default)]
    provider_type: Option<String>,
    is_fraud: bool,
    fraud_probability: f64,
    #[serde(default)]
    risk_reasons: Vec<String>,
}

// ── Default resolution ────────────────────────────────────────────────────────

/// Resolve a raw provider label to its display value.
///
/// Missing or blank labels become [`UNKNOWN_PROVIDER`]; everything else is
/// kept verbatim.
pub fn resolve_provider_type(provider: Option<String>) -> String {
    match provider {
        Some(p) if !p.trim().is_empty() => p,
        _ => UNKNOWN_PROVIDER.to_string(),
    }
}

/// Resolve a raw risk-reason list to its display value.
///
/// An empty list becomes the single [`FALLBACK_RISK_REASON`] entry so every
/// queue row has something to show.
pub fn resolve_risk_reasons(reasons: Vec<String>) -> Vec<String> {
    if reasons.is_empty() {
        vec![FALLBACK_RISK_REASON.to_string()]
    } else {
        reasons
    }
}

impl RawClaimResult {
    /// Apply the ingestion-time fallbacks, producing a domain row.
    fn into_claim(self) -> ClaimResult {
        ClaimResult {
            row_id: self.row_id,
            claim_amount: self.claim_amount,
            patient_age: self.patient_age,
            provider_type: resolve_provider_type(self.provider_type),
            is_fraud: self.is_fraud,
            fraud_probability: self.fraud_probability,
            risk_reasons: resolve_risk_reasons(self.risk_reasons),
        }
    }
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse and validate a classifier response document.
///
/// Syntax errors surface as [`ClaimsError::JsonParse`]. A well-formed JSON
/// document whose `summary` or `results` is missing, `null`, or of the wrong
/// shape is rejected as [`ClaimsError::MalformedBatch`] before any
/// aggregation can run.
pub fn parse_batch(content: &str) -> Result<Batch> {
    let value: serde_json::Value = serde_json::from_str(content)?;

    let raw: RawBatch = serde_json::from_value(value)
        .map_err(|e| ClaimsError::MalformedBatch(e.to_string()))?;

    let summary = raw
        .summary
        .ok_or_else(|| ClaimsError::MalformedBatch("missing field `summary`".to_string()))?;
    let results = raw
        .results
        .ok_or_else(|| ClaimsError::MalformedBatch("missing field `results`".to_string()))?;

    Ok(Batch {
        summary,
        results: results.into_iter().map(RawClaimResult::into_claim).collect(),
    })
}

/// Read and parse a batch file from disk.
pub fn load_batch(path: &Path) -> Result<Batch> {
    let content = std::fs::read_to_string(path).map_err(|source| ClaimsError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_batch(&content)
}

// ── Discovery ─────────────────────────────────────────────────────────────────

/// Find all `.json` files recursively under `data_path`, sorted by path.
pub fn find_batch_files(data_path: &Path) -> Vec<PathBuf> {
    if !data_path.exists() {
        warn!("Data path does not exist: {}", data_path.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(data_path)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext == "json")
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Pick the current batch file: the newest `.json` under `data_path` by
/// modification time, with path order breaking ties.
pub fn latest_batch_file(data_path: &Path) -> Option<PathBuf> {
    find_batch_files(data_path)
        .into_iter()
        .filter_map(|path| {
            let mtime = std::fs::metadata(&path).and_then(|m| m.modified()).ok()?;
            Some((mtime, path))
        })
        .max_by(|a, b| a.cmp(b))
        .map(|(_, path)| path)
}

/// Resolve the drop directory: use `data_path` when given, otherwise fall
/// back to `~/.claimsight/batches`, then `./batches`.
pub fn resolve_data_path(data_path: Option<&str>) -> PathBuf {
    if let Some(p) = data_path {
        return PathBuf::from(p);
    }

    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let default = home.join(".claimsight").join("batches");
    if default.exists() {
        return default;
    }
    PathBuf::from("batches")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
