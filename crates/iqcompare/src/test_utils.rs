//! Shared record builders for unit tests.

use crate::metric::MetricField;
use crate::record::{MeanStat, MetricRecord, MetricValue};

/// A record carrying plain values, shaped per field.
pub(crate) fn record(model: &str, values: &[(MetricField, f64)]) -> MetricRecord {
    values
        .iter()
        .fold(MetricRecord::new(model), |rec, &(field, v)| {
            rec.with_value(field, v)
        })
}

/// A record carrying full `{mean, std, max}` statistics.
pub(crate) fn stat_record(model: &str, values: &[(MetricField, f64)]) -> MetricRecord {
    values.iter().fold(MetricRecord::new(model), |rec, &(field, mean)| {
        rec.with(
            field,
            MetricValue::Stat(MeanStat {
                mean,
                std: Some(mean * 0.1),
                max: Some(mean * 2.0),
            }),
        )
    })
}
