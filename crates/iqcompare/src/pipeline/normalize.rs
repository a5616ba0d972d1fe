//! Ratio-to-minimum normalization for lower-is-better metrics.
//!
//! Each axis is scored against its own minimum across models:
//! `score = min / v`, so the best model on an axis sits at exactly 1 and the
//! others fall off hyperbolically towards 0. This is intentionally not a
//! min-max rescale.

use serde::{Deserialize, Serialize};

use crate::metric::{MetricFamily, MetricField};

use super::availability::Availability;
use super::result::AveragedMetric;

/// The lower-is-better families that get a normalized radar chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadarFamily {
    ImageQuality,
    ColorVsOriginal,
    ColorVsReference,
}

impl RadarFamily {
    pub const ALL: [RadarFamily; 3] = [
        Self::ImageQuality,
        Self::ColorVsOriginal,
        Self::ColorVsReference,
    ];

    pub const fn family(self) -> MetricFamily {
        match self {
            Self::ImageQuality => MetricFamily::ImageQuality,
            Self::ColorVsOriginal => MetricFamily::ColorVsOriginal,
            Self::ColorVsReference => MetricFamily::ColorVsReference,
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::ImageQuality => "image_quality",
            Self::ColorVsOriginal => "color_vs_original",
            Self::ColorVsReference => "color_vs_reference",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::ImageQuality => "Image quality (normalized, higher is better)",
            Self::ColorVsOriginal => "Color accuracy vs original (normalized)",
            Self::ColorVsReference => "Color accuracy vs reference (normalized)",
        }
    }
}

/// Score one lower-is-better value against the axis minimum.
///
/// - `value <= 0` is a perfect result and scores 1.
/// - a non-positive `min` with positive `value` means another model was
///   perfect while this one was not, so it scores 0.
/// - otherwise `min / value`, which lies in `(0, 1]` and equals 1 at `value == min`.
pub fn normalize_lower_better(value: f64, min: f64) -> f64 {
    if value <= 0.0 {
        1.0
    } else if min <= 0.0 {
        0.0
    } else {
        min / value
    }
}

/// Smallest finite value on an axis.
pub fn axis_minimum(values: &[Option<f64>]) -> Option<f64> {
    values
        .iter()
        .flatten()
        .copied()
        .filter(|v| v.is_finite())
        .reduce(f64::min)
}

/// Normalize one axis. Absent cells stay absent; with no finite minimum every
/// present cell scores 0.
pub fn normalize_axis(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let min = axis_minimum(values);
    values
        .iter()
        .map(|v| {
            v.map(|v| match min {
                Some(min) => normalize_lower_better(v, min),
                None => 0.0,
            })
        })
        .collect()
}

/// Normalized scores of one radar family.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedFamily {
    pub family: RadarFamily,
    /// Available axes of the family, in catalogue order.
    pub axes: Vec<MetricField>,
    /// `scores[model_idx][axis_idx]`, models in grouping order.
    pub scores: Vec<Vec<Option<f64>>>,
}

impl NormalizedFamily {
    /// Score of `model_idx` on `field`, if both exist and the cell is defined.
    pub fn score(&self, model_idx: usize, field: MetricField) -> Option<f64> {
        let axis = self.axes.iter().position(|f| *f == field)?;
        self.scores.get(model_idx)?.get(axis).copied().flatten()
    }
}

/// Normalize every available axis of `family`. Returns `None` when the family
/// has no available axis.
pub(crate) fn normalize_family(
    family: RadarFamily,
    averaged: &[AveragedMetric],
    availability: &Availability,
) -> Option<NormalizedFamily> {
    let axes = availability.fields_in(family.family());
    if axes.is_empty() {
        return None;
    }

    let columns: Vec<Vec<Option<f64>>> = axes
        .iter()
        .map(|&field| {
            let raw: Vec<Option<f64>> = averaged.iter().map(|m| m.value(field)).collect();
            normalize_axis(&raw)
        })
        .collect();

    let scores = (0..averaged.len())
        .map(|model_idx| columns.iter().map(|col| col[model_idx]).collect())
        .collect();

    Some(NormalizedFamily {
        family,
        axes,
        scores,
    })
}
