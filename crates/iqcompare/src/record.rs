//! Per-image metric records and their tolerant JSON decoding.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::metric::{MetricField, ValueShape};

/// `{mean, std, max}` statistic reported by the color / angular-error metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeanStat {
    pub mean: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub std: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl MeanStat {
    /// A statistic that only carries a mean (the shape of aggregated output).
    pub fn mean_only(mean: f64) -> Self {
        Self {
            mean,
            std: None,
            max: None,
        }
    }
}

/// A single metric value, either a plain number or a mean statistic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Scalar(f64),
    Stat(MeanStat),
}

impl MetricValue {
    /// The number the engine aggregates: the scalar itself or the statistic's
    /// `mean`. Non-finite values read as absent.
    pub fn mean(&self) -> Option<f64> {
        let v = match self {
            Self::Scalar(v) => *v,
            Self::Stat(stat) => stat.mean,
        };
        v.is_finite().then_some(v)
    }

    /// Build a value of the declared shape around `mean`.
    pub fn with_shape(shape: ValueShape, mean: f64) -> Self {
        match shape {
            ValueShape::Scalar => Self::Scalar(mean),
            ValueShape::MeanStat => Self::Stat(MeanStat::mean_only(mean)),
        }
    }

    /// Coerce into the declared shape. A bare number given for a statistic
    /// field becomes its mean; a statistic given for a scalar field
    /// contributes its mean.
    fn conform(self, shape: ValueShape) -> Self {
        match (shape, self) {
            (ValueShape::Scalar, Self::Stat(stat)) => Self::Scalar(stat.mean),
            (ValueShape::MeanStat, Self::Scalar(v)) => Self::Stat(MeanStat::mean_only(v)),
            (_, other) => other,
        }
    }

    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => finite(n.as_f64()).map(Self::Scalar),
            Value::Object(obj) => {
                let mean = finite(obj.get("mean").and_then(Value::as_f64))?;
                Some(Self::Stat(MeanStat {
                    mean,
                    std: finite(obj.get("std").and_then(Value::as_f64)),
                    max: finite(obj.get("max").and_then(Value::as_f64)),
                }))
            }
            _ => None,
        }
    }
}

fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}

/// Fixed-size map from [`MetricField`] to an optional value.
///
/// Serializes as a JSON object holding only the present fields, keyed by
/// [`MetricField::key`] in catalogue order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetricSet {
    values: [Option<MetricValue>; MetricField::COUNT],
}

impl MetricSet {
    pub fn get(&self, field: MetricField) -> Option<&MetricValue> {
        self.values[field.index()].as_ref()
    }

    /// Aggregatable number for `field`, if present and finite.
    pub fn mean(&self, field: MetricField) -> Option<f64> {
        self.get(field).and_then(MetricValue::mean)
    }

    /// Store `value` under `field`, coerced to the field's declared shape.
    pub fn insert(&mut self, field: MetricField, value: MetricValue) {
        self.values[field.index()] = Some(value.conform(field.shape()));
    }

    pub fn contains(&self, field: MetricField) -> bool {
        self.values[field.index()].is_some()
    }

    pub fn len(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Present fields with their values, in catalogue order.
    pub fn iter(&self) -> impl Iterator<Item = (MetricField, &MetricValue)> + '_ {
        MetricField::ALL
            .into_iter()
            .filter_map(move |field| self.get(field).map(|v| (field, v)))
    }

    /// Pick up every known, well-formed metric key from a JSON object.
    /// Unknown keys and malformed values are skipped.
    fn absorb(&mut self, obj: &Map<String, Value>) {
        for (key, raw) in obj {
            let Some(field) = MetricField::from_key(key) else {
                continue;
            };
            if let Some(value) = MetricValue::from_json(raw) {
                self.insert(field, value);
            }
        }
    }
}

impl Serialize for MetricSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.key(), value)?;
        }
        map.end()
    }
}

/// One evaluated image for one model / method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRecord {
    /// Comparison key.
    pub model: String,
    /// Source image name, kept for provenance only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub metrics: MetricSet,
}

impl MetricRecord {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            image: None,
            metrics: MetricSet::default(),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, field: MetricField, value: MetricValue) -> Self {
        self.metrics.insert(field, value);
        self
    }

    /// Builder-style insert of a plain number (shaped per the field).
    pub fn with_value(self, field: MetricField, value: f64) -> Self {
        self.with(field, MetricValue::with_shape(field.shape(), value))
    }

    /// Decode one element of an uploaded array.
    ///
    /// The model name is read from `model`, then `method`, and defaults to
    /// `fallback_model`. Metric keys may sit at the top level or inside a
    /// nested `metrics` object; the nested value wins when both are valid.
    /// Non-object elements decode to an empty record under `fallback_model`.
    pub fn from_json(value: &Value, fallback_model: &str) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::new(fallback_model);
        };

        let model = ["model", "method"]
            .iter()
            .find_map(|key| {
                obj.get(*key)
                    .and_then(Value::as_str)
                    .filter(|name| !name.is_empty())
            })
            .unwrap_or(fallback_model);

        let mut metrics = MetricSet::default();
        metrics.absorb(obj);
        if let Some(nested) = obj.get("metrics").and_then(Value::as_object) {
            metrics.absorb(nested);
        }

        Self {
            model: model.to_string(),
            image: obj.get("image").and_then(Value::as_str).map(str::to_owned),
            metrics,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_flat_and_nested_keys() {
        let raw = json!({
            "model": "retinex",
            "image": "0001.png",
            "PSNR": 27.5,
            "metrics": {
                "ssim": 0.81,
                "delta_e76_vs_original": {"mean": 4.2, "std": 1.1, "max": 9.0}
            }
        });
        let rec = MetricRecord::from_json(&raw, "Unknown");
        assert_eq!(rec.model, "retinex");
        assert_eq!(rec.image.as_deref(), Some("0001.png"));
        assert_eq!(rec.metrics.mean(MetricField::Psnr), Some(27.5));
        assert_eq!(rec.metrics.mean(MetricField::Ssim), Some(0.81));
        assert_eq!(
            rec.metrics.get(MetricField::DeltaE76VsOriginal),
            Some(&MetricValue::Stat(MeanStat {
                mean: 4.2,
                std: Some(1.1),
                max: Some(9.0)
            }))
        );
        assert_eq!(rec.metrics.len(), 3);
    }

    #[test]
    fn empty_model_falls_through_to_method() {
        let raw = json!({"model": "", "method": "clahe", "psnr": 30});
        assert_eq!(MetricRecord::from_json(&raw, "Unknown").model, "clahe");

        let raw = json!({"model": "", "method": ""});
        assert_eq!(MetricRecord::from_json(&raw, "Unknown").model, "Unknown");
    }

    #[test]
    fn nested_value_wins_over_top_level() {
        let raw = json!({"model": "a", "niqe": 5.0, "metrics": {"niqe": 4.0}});
        let rec = MetricRecord::from_json(&raw, "Unknown");
        assert_eq!(rec.metrics.mean(MetricField::Niqe), Some(4.0));
    }

    #[test]
    fn malformed_values_are_absent() {
        let raw = json!({
            "model": "a",
            "psnr": null,
            "ssim": "0.9",
            "lpips": {"std": 0.1},
            "ciede2000_vs_reference": {"mean": "NaN"},
            "unrelated": 3
        });
        let rec = MetricRecord::from_json(&raw, "Unknown");
        assert!(rec.metrics.is_empty());
    }

    #[test]
    fn model_falls_back_to_method_then_default() {
        let by_method = MetricRecord::from_json(&json!({"method": "clahe"}), "Unknown");
        assert_eq!(by_method.model, "clahe");

        let unnamed = MetricRecord::from_json(&json!({"psnr": 30.0}), "Unknown");
        assert_eq!(unnamed.model, "Unknown");

        let not_object = MetricRecord::from_json(&json!(42), "Unknown");
        assert_eq!(not_object.model, "Unknown");
        assert!(not_object.metrics.is_empty());
    }

    #[test]
    fn values_are_coerced_to_declared_shape() {
        let raw = json!({
            "model": "a",
            "psnr": {"mean": 31.0, "std": 2.0},
            "angular_error_vs_original": 3.5
        });
        let rec = MetricRecord::from_json(&raw, "Unknown");
        assert_eq!(
            rec.metrics.get(MetricField::Psnr),
            Some(&MetricValue::Scalar(31.0))
        );
        assert_eq!(
            rec.metrics.get(MetricField::AngularErrorVsOriginal),
            Some(&MetricValue::Stat(MeanStat::mean_only(3.5)))
        );
    }

    #[test]
    fn non_finite_mean_reads_as_absent() {
        let rec = MetricRecord::new("a").with_value(MetricField::Loe, f64::NAN);
        assert!(rec.metrics.contains(MetricField::Loe));
        assert_eq!(rec.metrics.mean(MetricField::Loe), None);
    }

    #[test]
    fn metric_set_serializes_present_fields_only() {
        let rec = MetricRecord::new("a")
            .with_value(MetricField::Psnr, 30.0)
            .with_value(MetricField::Ciede2000VsOriginal, 2.5);
        let json = serde_json::to_value(&rec.metrics).expect("serialize");
        assert_eq!(
            json,
            json!({"psnr": 30.0, "ciede2000_vs_original": {"mean": 2.5}})
        );
    }
}
