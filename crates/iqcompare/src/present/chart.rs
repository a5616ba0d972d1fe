//! Chart payload assembly.
//!
//! Every payload uses the same `{labels, series}` schema: `labels` are the
//! visible metric axes, and there is one series per model in grouping order.
//! Missing cells are `null`, never `0`. Styling (colors, fills) belongs to
//! whatever renders the payload; series order is stable so index-derived
//! colors stay consistent across recomputes.

use serde::{Serialize, Serializer};

use crate::config::ViewSelection;
use crate::metric::{MetricFamily, MetricField};
use crate::pipeline::{AveragedMetric, Availability, NormalizedFamily, RadarFamily};

/// Identifies one chart the engine can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartView {
    /// Raw averages of one metric.
    Bar(MetricField),
    /// Ratio-to-minimum scores of a lower-is-better family.
    Radar(RadarFamily),
    /// Raw PSNR / SSIM averages over the axes that have data.
    FidelityArea,
}

impl ChartView {
    /// Every view in canonical order: bars in catalogue order, radars, area.
    pub fn all() -> impl Iterator<Item = ChartView> {
        MetricField::ALL
            .into_iter()
            .map(ChartView::Bar)
            .chain(RadarFamily::ALL.into_iter().map(ChartView::Radar))
            .chain(std::iter::once(ChartView::FidelityArea))
    }

    /// Stable string id (`bar:psnr`, `radar:color_vs_original`, `area:fidelity`).
    pub fn id(&self) -> String {
        match self {
            Self::Bar(field) => format!("bar:{}", field.key()),
            Self::Radar(family) => format!("radar:{}", family.key()),
            Self::FidelityArea => "area:fidelity".to_string(),
        }
    }

    /// Parse an id produced by [`ChartView::id`].
    pub fn from_id(id: &str) -> Option<Self> {
        let (kind, target) = id.split_once(':')?;
        match kind {
            "bar" => MetricField::from_key(target).map(Self::Bar),
            "radar" => RadarFamily::ALL
                .into_iter()
                .find(|f| f.key() == target)
                .map(Self::Radar),
            "area" if target == "fidelity" => Some(Self::FidelityArea),
            _ => None,
        }
    }

    pub fn title(&self) -> String {
        match self {
            Self::Bar(field) => field.label().to_string(),
            Self::Radar(family) => family.title().to_string(),
            Self::FidelityArea => "PSNR / SSIM".to_string(),
        }
    }
}

impl Serialize for ChartView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.id())
    }
}

/// One model's values along the payload's labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// The rendering contract: axes plus one series per model.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ChartPayload {
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

/// A payload tagged with the view that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    #[serde(rename = "id")]
    pub view: ChartView,
    pub title: String,
    #[serde(flatten)]
    pub payload: ChartPayload,
}

fn raw_payload(averaged: &[AveragedMetric], axes: &[MetricField]) -> ChartPayload {
    ChartPayload {
        labels: axes.iter().map(|f| f.label().to_string()).collect(),
        series: averaged
            .iter()
            .map(|m| Series {
                name: m.model.clone(),
                values: axes.iter().map(|&f| m.value(f)).collect(),
            })
            .collect(),
    }
}

/// Bar chart for one metric, or `None` if no model has a value for it.
pub fn bar_payload(
    field: MetricField,
    averaged: &[AveragedMetric],
    availability: &Availability,
) -> Option<ChartPayload> {
    availability
        .has_field(field)
        .then(|| raw_payload(averaged, &[field]))
}

/// Radar chart from an already normalized family.
pub fn radar_payload(normalized: &NormalizedFamily, averaged: &[AveragedMetric]) -> ChartPayload {
    ChartPayload {
        labels: normalized
            .axes
            .iter()
            .map(|f| f.label().to_string())
            .collect(),
        series: averaged
            .iter()
            .zip(&normalized.scores)
            .map(|(m, scores)| Series {
                name: m.model.clone(),
                values: scores.clone(),
            })
            .collect(),
    }
}

/// PSNR / SSIM area chart over exactly the fidelity axes that have data.
pub fn fidelity_area_payload(
    averaged: &[AveragedMetric],
    availability: &Availability,
) -> Option<ChartPayload> {
    let axes = availability.fields_in(MetricFamily::Fidelity);
    if axes.is_empty() {
        return None;
    }
    Some(raw_payload(averaged, &axes))
}

/// Assemble every selected chart that has at least one axis.
pub(crate) fn build_charts(
    averaged: &[AveragedMetric],
    availability: &Availability,
    normalized: &[NormalizedFamily],
    views: &ViewSelection,
) -> Vec<Chart> {
    let mut charts = Vec::new();
    let mut push = |view: ChartView, payload: Option<ChartPayload>| {
        if let Some(payload) = payload {
            charts.push(Chart {
                view,
                title: view.title(),
                payload,
            });
        }
    };

    if views.bars {
        for field in availability.fields() {
            push(
                ChartView::Bar(field),
                bar_payload(field, averaged, availability),
            );
        }
    }
    if views.radars {
        for family in RadarFamily::ALL {
            let payload = normalized
                .iter()
                .find(|n| n.family == family)
                .map(|n| radar_payload(n, averaged));
            push(ChartView::Radar(family), payload);
        }
    }
    if views.fidelity_area {
        push(
            ChartView::FidelityArea,
            fidelity_area_payload(averaged, availability),
        );
    }
    charts
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::record::{MetricSet, MetricValue};

    fn averaged(model: &str, values: &[(MetricField, f64)]) -> AveragedMetric {
        let mut metrics = MetricSet::default();
        for &(field, v) in values {
            metrics.insert(field, MetricValue::with_shape(field.shape(), v));
        }
        AveragedMetric {
            model: model.to_string(),
            record_count: 1,
            metrics,
        }
    }

    #[test]
    fn view_ids_round_trip() {
        for view in ChartView::all() {
            assert_eq!(ChartView::from_id(&view.id()), Some(view));
        }
        assert_eq!(ChartView::from_id("pie:psnr"), None);
        assert_eq!(ChartView::all().count(), 16);
    }

    #[test]
    fn bar_uses_null_for_missing_model() {
        let list = vec![
            averaged("C", &[(MetricField::Psnr, 30.0)]),
            averaged("D", &[(MetricField::Lpips, 0.2)]),
        ];
        let avail = Availability::detect(&list);
        let payload = bar_payload(MetricField::Lpips, &list, &avail).expect("lpips shown");
        assert_eq!(payload.labels, ["LPIPS"]);
        assert_eq!(payload.series[0].values, [None::<f64>]);
        assert_eq!(payload.series[1].values, [Some(0.2)]);

        let json = serde_json::to_value(&payload).expect("serialize");
        assert_eq!(
            json,
            json!({
                "labels": ["LPIPS"],
                "series": [
                    {"name": "C", "values": [null]},
                    {"name": "D", "values": [0.2]}
                ]
            })
        );
    }

    #[test]
    fn unavailable_metric_has_no_bar() {
        let list = vec![averaged("A", &[(MetricField::Psnr, 30.0)])];
        let avail = Availability::detect(&list);
        assert!(bar_payload(MetricField::Niqe, &list, &avail).is_none());
    }

    #[test]
    fn fidelity_area_covers_only_axes_with_data() {
        let list = vec![
            averaged("A", &[(MetricField::Ssim, 0.8)]),
            averaged("B", &[(MetricField::Ssim, 0.9), (MetricField::Niqe, 4.0)]),
        ];
        let avail = Availability::detect(&list);
        let payload = fidelity_area_payload(&list, &avail).expect("ssim present");
        assert_eq!(payload.labels, ["SSIM"]);
        assert_eq!(payload.series.len(), 2);

        let none = vec![averaged("A", &[(MetricField::Niqe, 4.0)])];
        assert!(fidelity_area_payload(&none, &Availability::detect(&none)).is_none());
    }

    #[test]
    fn build_respects_view_selection() {
        let list = vec![averaged(
            "A",
            &[(MetricField::Psnr, 30.0), (MetricField::Niqe, 4.0)],
        )];
        let avail = Availability::detect(&list);
        let normalized: Vec<NormalizedFamily> = RadarFamily::ALL
            .into_iter()
            .filter_map(|f| crate::pipeline::normalize::normalize_family(f, &list, &avail))
            .collect();

        let all = build_charts(&list, &avail, &normalized, &ViewSelection::default());
        let ids: Vec<String> = all.iter().map(|c| c.view.id()).collect();
        assert_eq!(
            ids,
            ["bar:psnr", "bar:niqe", "radar:image_quality", "area:fidelity"]
        );

        let radars_only = ViewSelection {
            bars: false,
            radars: true,
            fidelity_area: false,
        };
        let some = build_charts(&list, &avail, &normalized, &radars_only);
        assert_eq!(some.len(), 1);
        assert_eq!(some[0].view, ChartView::Radar(RadarFamily::ImageQuality));
    }
}
