use serde::Serialize;

use crate::metric::MetricField;
use crate::present::{Chart, ChartPayload, ChartView};
use crate::record::MetricSet;

use super::availability::Availability;
use super::normalize::{NormalizedFamily, RadarFamily};

/// Per-model tolerant averages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AveragedMetric {
    pub model: String,
    /// Number of records grouped under this model.
    pub record_count: usize,
    /// Averaged values; a field is present only if some record supplied a
    /// finite value for it. Statistic fields carry only `mean`.
    pub metrics: MetricSet,
}

impl AveragedMetric {
    pub fn value(&self, field: MetricField) -> Option<f64> {
        self.metrics.mean(field)
    }
}

/// Best model(s) on one available field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldBest {
    pub field: MetricField,
    pub value: f64,
    /// All models tied at `value`, in grouping order.
    pub models: Vec<String>,
}

/// Everything derived from one state of the record store.
///
/// Built in full by [`crate::pipeline::recompute`] and never patched; a store
/// mutation produces a new snapshot.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    pub record_count: usize,
    pub models: Vec<String>,
    pub averaged: Vec<AveragedMetric>,
    pub availability: Availability,
    pub normalized: Vec<NormalizedFamily>,
    pub best: Vec<FieldBest>,
    pub charts: Vec<Chart>,
}

impl Snapshot {
    /// The snapshot of an empty store.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn model_names(&self) -> &[String] {
        &self.models
    }

    pub fn averaged_metrics(&self) -> &[AveragedMetric] {
        &self.averaged
    }

    pub fn has_field(&self, field: MetricField) -> bool {
        self.availability.has_field(field)
    }

    pub fn normalized(&self, family: RadarFamily) -> Option<&NormalizedFamily> {
        self.normalized.iter().find(|n| n.family == family)
    }

    pub fn best_for(&self, field: MetricField) -> Option<&FieldBest> {
        self.best.iter().find(|b| b.field == field)
    }

    pub fn chart(&self, view: ChartView) -> Option<&Chart> {
        self.charts.iter().find(|c| c.view == view)
    }

    pub fn chart_payload(&self, view: ChartView) -> Option<&ChartPayload> {
        self.chart(view).map(|c| &c.payload)
    }

    /// Every present payload in canonical view order.
    pub fn payloads(&self) -> impl Iterator<Item = (ChartView, &ChartPayload)> + '_ {
        self.charts.iter().map(|c| (c.view, &c.payload))
    }
}
