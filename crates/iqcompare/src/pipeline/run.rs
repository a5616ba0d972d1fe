use crate::config::CompareConfig;
use crate::present::build_charts;
use crate::record::MetricRecord;

use super::availability::Availability;
use super::average::average_groups;
use super::group::group_by_model;
use super::normalize::{normalize_family, RadarFamily};
use super::rank::best_per_field;
use super::result::Snapshot;

/// Rebuild every derived artifact from the full record list.
///
/// Pure and deterministic: the same records and config always give the same
/// snapshot. Nothing from a previous snapshot is reused.
pub fn recompute(records: &[MetricRecord], config: &CompareConfig) -> Snapshot {
    if records.is_empty() {
        tracing::debug!("recompute on empty store");
        return Snapshot::empty();
    }

    let groups = group_by_model(records);
    let averaged = average_groups(&groups);
    let models: Vec<String> = averaged.iter().map(|m| m.model.clone()).collect();
    let availability = Availability::detect(&averaged);

    let normalized: Vec<_> = RadarFamily::ALL
        .into_iter()
        .filter_map(|family| normalize_family(family, &averaged, &availability))
        .collect();
    let best = best_per_field(&averaged, &availability);
    let charts = build_charts(&averaged, &availability, &normalized, &config.views);

    tracing::debug!(
        records = records.len(),
        models = models.len(),
        fields = availability.fields().count(),
        charts = charts.len(),
        "recomputed snapshot"
    );

    Snapshot {
        record_count: records.len(),
        models,
        averaged,
        availability,
        normalized,
        best,
        charts,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::metric::MetricField;
    use crate::present::ChartView;
    use crate::test_utils::{record, stat_record};

    #[test]
    fn empty_records_give_empty_snapshot() {
        let snap = recompute(&[], &CompareConfig::default());
        assert!(snap.is_empty());
        assert!(snap.charts.is_empty());
        assert!(snap.availability.is_empty());
    }

    #[test]
    fn recompute_is_deterministic() {
        let records = vec![
            record("a", &[(MetricField::Psnr, 30.0), (MetricField::Lpips, 0.2)]),
            stat_record("b", &[(MetricField::Ciede2000VsOriginal, 3.0)]),
            record("a", &[(MetricField::Psnr, 28.0)]),
        ];
        let config = CompareConfig::default();
        let first = serde_json::to_value(recompute(&records, &config)).expect("serialize");
        let second = serde_json::to_value(recompute(&records, &config)).expect("serialize");
        assert_eq!(first, second);
    }

    #[test]
    fn snapshot_carries_every_stage() {
        let records = vec![
            record("a", &[(MetricField::Psnr, 30.0), (MetricField::Niqe, 6.0)]),
            record("b", &[(MetricField::Psnr, 30.5), (MetricField::Niqe, 3.0)]),
            record("a", &[(MetricField::Psnr, 32.0)]),
        ];
        let snap = recompute(&records, &CompareConfig::default());
        assert_eq!(snap.record_count, 3);
        assert_eq!(snap.model_names(), ["a", "b"]);
        assert_relative_eq!(snap.averaged[0].value(MetricField::Psnr).expect("a"), 31.0);
        assert_eq!(snap.averaged[0].record_count, 2);

        let iq = snap.normalized(RadarFamily::ImageQuality).expect("niqe radar");
        assert_relative_eq!(iq.score(0, MetricField::Niqe).expect("a"), 0.5);

        assert_eq!(snap.best_for(MetricField::Psnr).expect("psnr").models, ["a"]);
        assert_eq!(snap.best_for(MetricField::Niqe).expect("niqe").models, ["b"]);

        assert!(snap.chart(ChartView::Bar(MetricField::Psnr)).is_some());
        assert!(snap.chart(ChartView::Bar(MetricField::Ssim)).is_none());
        assert!(snap.chart(ChartView::FidelityArea).is_some());
    }

    #[test]
    fn disabled_views_still_normalize() {
        let mut config = CompareConfig::default();
        config.views.radars = false;
        let records = vec![record("a", &[(MetricField::Lpips, 0.2)])];
        let snap = recompute(&records, &config);
        assert!(snap.normalized(RadarFamily::ImageQuality).is_some());
        assert!(snap
            .chart(ChartView::Radar(RadarFamily::ImageQuality))
            .is_none());
    }
}
