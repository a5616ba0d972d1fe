//! Batch decoding and parallel file loading.
//!
//! A batch is accepted whole or not at all: the only structural requirement
//! is a top-level JSON array. Per-field problems inside an accepted batch are
//! left to the averaging stage, which treats them as absent values.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde_json::Value;

use crate::record::MetricRecord;

/// Why a batch was rejected.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read batch: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a top-level array of records, found {found}")]
    NotArray { found: &'static str },
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Decode one uploaded batch.
pub fn parse_batch(data: &str, fallback_model: &str) -> Result<Vec<MetricRecord>, IngestError> {
    let root: Value = serde_json::from_str(data)?;
    let Value::Array(items) = root else {
        return Err(IngestError::NotArray {
            found: json_type_name(&root),
        });
    };
    Ok(items
        .iter()
        .map(|item| MetricRecord::from_json(item, fallback_model))
        .collect())
}

/// Read and decode one batch file.
pub fn load_batch(path: &Path, fallback_model: &str) -> Result<Vec<MetricRecord>, IngestError> {
    let data = std::fs::read_to_string(path)?;
    parse_batch(&data, fallback_model)
}

/// Result of loading one file.
#[derive(Debug)]
pub struct BatchOutcome {
    pub path: PathBuf,
    pub result: Result<Vec<MetricRecord>, IngestError>,
}

/// Load every file independently on the rayon pool and wait for all of them.
///
/// Outcomes are returned in input order regardless of completion order, and a
/// failing file never affects its siblings.
pub fn load_batches<P>(paths: &[P], fallback_model: &str) -> Vec<BatchOutcome>
where
    P: AsRef<Path> + Sync,
{
    paths
        .par_iter()
        .map(|path| {
            let path = path.as_ref();
            let result = load_batch(path, fallback_model);
            if let Err(err) = &result {
                tracing::warn!(path = %path.display(), error = %err, "rejected batch");
            }
            BatchOutcome {
                path: path.to_path_buf(),
                result,
            }
        })
        .collect()
}

/// Summary of a fan-in append.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub accepted_batches: usize,
    pub records_appended: usize,
    pub rejected: Vec<(PathBuf, IngestError)>,
}

impl IngestReport {
    pub fn has_rejections(&self) -> bool {
        !self.rejected.is_empty()
    }
}

/// Split outcomes into the concatenation of accepted records (in outcome
/// order) and a report describing what was rejected.
pub(crate) fn collect_outcomes(outcomes: Vec<BatchOutcome>) -> (Vec<MetricRecord>, IngestReport) {
    let mut records = Vec::new();
    let mut report = IngestReport::default();
    for outcome in outcomes {
        match outcome.result {
            Ok(batch) => {
                report.accepted_batches += 1;
                records.extend(batch);
            }
            Err(err) => report.rejected.push((outcome.path, err)),
        }
    }
    report.records_appended = records.len();
    (records, report)
}
