//! iqcompare: aggregation and normalization engine for image-quality metrics.
//!
//! Takes per-image metric records from any number of uploads and turns them
//! into comparison-ready, per-model views. The pipeline stages are:
//!
//! 1. **Ingest** – tolerant JSON decoding; a batch is accepted whole or rejected.
//! 2. **Group** – records keyed by model in first-seen order.
//! 3. **Average** – per-field means over finite values only; absent stays absent.
//! 4. **Availability** – which fields have any data at all.
//! 5. **Normalize** – ratio-to-minimum scores for lower-is-better families.
//! 6. **Present** – `{labels, series}` chart payloads, best-model summary, tables.
//!
//! # Public API
//! - [`Comparison`] as the primary entry point
//! - [`CompareConfig`] for fallback labelling, table formatting and view selection
//! - [`recompute`] for a pure, store-free run of the whole pipeline
//! - the metric catalogue ([`MetricField`]) and result types

mod api;
mod config;
mod ingest;
mod metric;
mod pipeline;
mod present;
mod record;
mod store;

#[cfg(test)]
pub(crate) mod test_utils;

pub use api::Comparison;
pub use config::{CompareConfig, ConfigError, TableConfig, ViewSelection};
pub use ingest::{load_batch, load_batches, parse_batch, BatchOutcome, IngestError, IngestReport};
pub use metric::{Direction, MetricFamily, MetricField, ValueShape};
pub use pipeline::{
    axis_minimum, normalize_axis, normalize_lower_better, recompute, tolerant_mean,
    Availability, AveragedMetric, FieldBest, NormalizedFamily, RadarFamily, Snapshot,
};
pub use present::{
    bar_payload, escape_latex, fidelity_area_payload, format_cell, radar_payload, render_table,
    Chart, ChartPayload, ChartView, Series, TableFormat,
};
pub use record::{MeanStat, MetricRecord, MetricSet, MetricValue};
pub use store::RecordStore;
