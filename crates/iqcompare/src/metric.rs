//! The fixed catalogue of metric fields understood by the engine.
//!
//! Every stage iterates [`MetricField::ALL`] instead of whatever keys happen
//! to be present in an upload, so adding a metric means adding one variant
//! here and nothing else.

use serde::{Deserialize, Serialize};

/// How a metric value is carried in a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueShape {
    /// A plain number.
    Scalar,
    /// A `{mean, std, max}` statistic; only `mean` is aggregated.
    MeanStat,
}

/// Which end of the value range is the good one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

/// Groups of fields that are charted together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricFamily {
    /// Full-reference fidelity metrics (PSNR, SSIM).
    Fidelity,
    /// No-reference and perceptual quality metrics (NIQE, BRISQUE, LOE, LPIPS).
    ImageQuality,
    /// Color / angular error against the original input image.
    ColorVsOriginal,
    /// Color / angular error against the reference (ground-truth) image.
    ColorVsReference,
}

impl MetricFamily {
    /// Fields belonging to this family, in catalogue order.
    pub fn fields(self) -> impl Iterator<Item = MetricField> {
        MetricField::ALL
            .into_iter()
            .filter(move |field| field.family() == self)
    }
}

/// One of the twelve known per-image metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricField {
    Psnr,
    Ssim,
    Niqe,
    Brisque,
    Loe,
    Lpips,
    DeltaE76VsOriginal,
    Ciede2000VsOriginal,
    AngularErrorVsOriginal,
    DeltaE76VsReference,
    Ciede2000VsReference,
    AngularErrorVsReference,
}

impl MetricField {
    pub const COUNT: usize = 12;

    /// Catalogue order. Table columns and chart axes follow it.
    pub const ALL: [MetricField; Self::COUNT] = [
        Self::Psnr,
        Self::Ssim,
        Self::Niqe,
        Self::Brisque,
        Self::Loe,
        Self::Lpips,
        Self::DeltaE76VsOriginal,
        Self::Ciede2000VsOriginal,
        Self::AngularErrorVsOriginal,
        Self::DeltaE76VsReference,
        Self::Ciede2000VsReference,
        Self::AngularErrorVsReference,
    ];

    /// Position in [`MetricField::ALL`]; used to index fixed-size per-field arrays.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Canonical JSON key.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Psnr => "psnr",
            Self::Ssim => "ssim",
            Self::Niqe => "niqe",
            Self::Brisque => "brisque",
            Self::Loe => "loe",
            Self::Lpips => "lpips",
            Self::DeltaE76VsOriginal => "delta_e76_vs_original",
            Self::Ciede2000VsOriginal => "ciede2000_vs_original",
            Self::AngularErrorVsOriginal => "angular_error_vs_original",
            Self::DeltaE76VsReference => "delta_e76_vs_reference",
            Self::Ciede2000VsReference => "ciede2000_vs_reference",
            Self::AngularErrorVsReference => "angular_error_vs_reference",
        }
    }

    /// Axis / column label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Psnr => "PSNR",
            Self::Ssim => "SSIM",
            Self::Niqe => "NIQE",
            Self::Brisque => "BRISQUE",
            Self::Loe => "LOE",
            Self::Lpips => "LPIPS",
            Self::DeltaE76VsOriginal => "ΔE76 (orig)",
            Self::Ciede2000VsOriginal => "CIEDE2000 (orig)",
            Self::AngularErrorVsOriginal => "Angular Error (orig)",
            Self::DeltaE76VsReference => "ΔE76 (ref)",
            Self::Ciede2000VsReference => "CIEDE2000 (ref)",
            Self::AngularErrorVsReference => "Angular Error (ref)",
        }
    }

    pub const fn shape(self) -> ValueShape {
        match self {
            Self::Psnr | Self::Ssim | Self::Niqe | Self::Brisque | Self::Loe | Self::Lpips => {
                ValueShape::Scalar
            }
            _ => ValueShape::MeanStat,
        }
    }

    pub const fn direction(self) -> Direction {
        match self {
            Self::Psnr | Self::Ssim => Direction::HigherIsBetter,
            _ => Direction::LowerIsBetter,
        }
    }

    pub const fn family(self) -> MetricFamily {
        match self {
            Self::Psnr | Self::Ssim => MetricFamily::Fidelity,
            Self::Niqe | Self::Brisque | Self::Loe | Self::Lpips => MetricFamily::ImageQuality,
            Self::DeltaE76VsOriginal | Self::Ciede2000VsOriginal | Self::AngularErrorVsOriginal => {
                MetricFamily::ColorVsOriginal
            }
            Self::DeltaE76VsReference
            | Self::Ciede2000VsReference
            | Self::AngularErrorVsReference => MetricFamily::ColorVsReference,
        }
    }

    /// Resolve a JSON key, ignoring ASCII case (`PSNR` and `psnr` are the same field).
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.key().eq_ignore_ascii_case(key))
    }
}

impl std::fmt::Display for MetricField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_indices_match_positions() {
        for (i, field) in MetricField::ALL.iter().enumerate() {
            assert_eq!(field.index(), i);
        }
    }

    #[test]
    fn from_key_is_case_insensitive() {
        assert_eq!(MetricField::from_key("PSNR"), Some(MetricField::Psnr));
        assert_eq!(
            MetricField::from_key("Delta_E76_vs_Original"),
            Some(MetricField::DeltaE76VsOriginal)
        );
        assert_eq!(MetricField::from_key("mAP@0.5"), None);
    }

    #[test]
    fn serde_names_match_keys() {
        for field in MetricField::ALL {
            let json = serde_json::to_string(&field).expect("serialize");
            assert_eq!(json, format!("\"{}\"", field.key()));
        }
    }

    #[test]
    fn only_fidelity_is_higher_is_better() {
        for field in MetricField::ALL {
            let higher = field.direction() == Direction::HigherIsBetter;
            assert_eq!(higher, field.family() == MetricFamily::Fidelity, "{field}");
        }
    }

    #[test]
    fn families_partition_the_catalogue() {
        let sizes = [
            MetricFamily::Fidelity.fields().count(),
            MetricFamily::ImageQuality.fields().count(),
            MetricFamily::ColorVsOriginal.fields().count(),
            MetricFamily::ColorVsReference.fields().count(),
        ];
        assert_eq!(sizes, [2, 4, 3, 3]);
        assert!(MetricFamily::ColorVsReference
            .fields()
            .all(|f| f.shape() == ValueShape::MeanStat));
    }
}
