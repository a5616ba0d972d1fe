//! Tolerant per-model averaging.
//!
//! Missing, null and non-finite inputs are skipped rather than counted as
//! zero, so a sparse field never drags a mean downward. A field with no
//! usable input stays absent in the output.

use crate::metric::MetricField;
use crate::record::{MetricRecord, MetricSet, MetricValue};

use super::group::ModelGroups;
use super::result::AveragedMetric;

/// Running mean over finite inputs only.
///
/// Updated as `mean += v/n - mean/n` so the state never holds a raw sum and
/// cannot overflow while every input is finite.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TolerantMean {
    mean: f64,
    count: usize,
}

impl TolerantMean {
    pub(crate) fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value.filter(|v| v.is_finite()) {
            self.count += 1;
            let n = self.count as f64;
            self.mean += v / n - self.mean / n;
        }
    }

    pub(crate) fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        self.mean.is_finite().then_some(self.mean)
    }
}

/// Arithmetic mean of the finite values in `values`; `None` if there are none.
pub fn tolerant_mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut acc = TolerantMean::default();
    for v in values {
        acc.push(v);
    }
    acc.mean()
}

/// Average one field across `records`, reading each value through `accessor`.
pub(crate) fn average_field<F>(records: &[&MetricRecord], accessor: F) -> Option<f64>
where
    F: Fn(&MetricRecord) -> Option<f64>,
{
    tolerant_mean(records.iter().copied().map(accessor))
}

fn average_group(model: &str, records: &[&MetricRecord]) -> AveragedMetric {
    let mut metrics = MetricSet::default();
    for field in MetricField::ALL {
        if let Some(mean) = average_field(records, |r| r.metrics.mean(field)) {
            metrics.insert(field, MetricValue::with_shape(field.shape(), mean));
        }
    }
    AveragedMetric {
        model: model.to_string(),
        record_count: records.len(),
        metrics,
    }
}

/// One [`AveragedMetric`] per group, in group order.
pub(crate) fn average_groups(groups: &ModelGroups<'_>) -> Vec<AveragedMetric> {
    groups
        .iter()
        .map(|(model, records)| average_group(model, records))
        .collect()
}
