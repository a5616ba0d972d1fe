//! High-level comparison API.
//!
//! [`Comparison`] is the primary entry point. It owns the record store and
//! the latest [`Snapshot`], and recomputes the snapshot after every store
//! mutation.

use std::path::Path;
use std::sync::Arc;

use crate::config::{CompareConfig, ConfigError};
use crate::ingest::{self, BatchOutcome, IngestError, IngestReport};
use crate::metric::MetricField;
use crate::pipeline::{self, AveragedMetric, Snapshot};
use crate::present::{self, ChartPayload, ChartView, TableFormat};
use crate::record::MetricRecord;
use crate::store::RecordStore;

/// Accumulating metrics comparison.
///
/// Create once, append batches as they arrive, read the derived views.
///
/// # Examples
///
/// ```
/// use iqcompare::{ChartView, Comparison, MetricField};
///
/// let mut cmp = Comparison::new();
/// cmp.append_json(r#"[{"model": "a", "psnr": 30.0}, {"model": "b", "psnr": 28.0}]"#)
///     .unwrap();
/// assert_eq!(cmp.model_names(), ["a", "b"]);
/// assert!(cmp.chart_payload(ChartView::Bar(MetricField::Psnr)).is_some());
/// ```
#[derive(Debug)]
pub struct Comparison {
    store: RecordStore,
    config: CompareConfig,
    snapshot: Arc<Snapshot>,
}

impl Default for Comparison {
    fn default() -> Self {
        Self::new()
    }
}

impl Comparison {
    /// Create an empty comparison with default configuration.
    pub fn new() -> Self {
        Self {
            store: RecordStore::new(),
            config: CompareConfig::default(),
            snapshot: Arc::new(Snapshot::empty()),
        }
    }

    /// Create an empty comparison with a validated configuration.
    pub fn with_config(config: CompareConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    /// Load configuration JSON and create a comparison in one step.
    pub fn from_config_file(path: &Path) -> Result<Self, ConfigError> {
        Self::with_config(CompareConfig::from_json_file(path)?)
    }

    /// Append one batch and recompute. An empty batch changes nothing.
    ///
    /// Returns the number of records added.
    pub fn append(&mut self, records: Vec<MetricRecord>) -> usize {
        if records.is_empty() {
            return 0;
        }
        let added = self.store.append(records);
        tracing::info!(
            added,
            total = self.store.len(),
            batches = self.store.batch_count(),
            "appended records"
        );
        self.refresh();
        added
    }

    /// Decode one JSON batch and append it. A rejected batch leaves the
    /// store untouched.
    pub fn append_json(&mut self, data: &str) -> Result<usize, IngestError> {
        let records = ingest::parse_batch(data, &self.config.fallback_model)?;
        Ok(self.append(records))
    }

    /// Append every accepted batch of `outcomes` with a single append.
    pub fn ingest(&mut self, outcomes: Vec<BatchOutcome>) -> IngestReport {
        let (records, report) = ingest::collect_outcomes(outcomes);
        self.append(records);
        report
    }

    /// Load `paths` in parallel and ingest the results.
    pub fn load_files<P>(&mut self, paths: &[P]) -> IngestReport
    where
        P: AsRef<Path> + Sync,
    {
        let outcomes = ingest::load_batches(paths, &self.config.fallback_model);
        self.ingest(outcomes)
    }

    /// Drop every record and reset all derived views.
    pub fn clear(&mut self) {
        let dropped = self.store.len();
        self.store.clear();
        self.snapshot = Arc::new(Snapshot::empty());
        tracing::info!(dropped, "cleared record store");
    }

    /// Distinct models in first-seen order.
    pub fn model_names(&self) -> &[String] {
        self.snapshot.model_names()
    }

    pub fn averaged_metrics(&self) -> &[AveragedMetric] {
        self.snapshot.averaged_metrics()
    }

    /// Payload of one view, or `None` if the view has no available axis or
    /// is disabled in the configuration.
    pub fn chart_payload(&self, view: ChartView) -> Option<&ChartPayload> {
        self.snapshot.chart_payload(view)
    }

    pub fn has_field(&self, field: MetricField) -> bool {
        self.snapshot.has_field(field)
    }

    /// Shared handle to the current snapshot. Later mutations do not affect it.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn records(&self) -> &[MetricRecord] {
        self.store.records()
    }

    pub fn config(&self) -> &CompareConfig {
        &self.config
    }

    /// Render the current averages with the configured cell formatting.
    pub fn render_table(&self, format: TableFormat) -> String {
        present::render_table(&self.snapshot, format, &self.config.table)
    }

    fn refresh(&mut self) {
        self.snapshot = Arc::new(pipeline::recompute(self.store.records(), &self.config));
    }
}
