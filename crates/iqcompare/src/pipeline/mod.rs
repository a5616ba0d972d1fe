//! Aggregation pipeline.
//!
//! Stages, in call order:
//! group by model -> tolerant average -> availability -> normalize -> rank -> charts.
//!
//! Every stage is a plain function over the output of the previous one.
//! [`recompute`] runs them all and packages the result as a [`Snapshot`].

mod availability;
mod average;
mod group;
pub(crate) mod normalize;
mod rank;
mod result;
mod run;

pub use availability::Availability;
pub use average::tolerant_mean;
pub use normalize::{
    axis_minimum, normalize_axis, normalize_lower_better, NormalizedFamily, RadarFamily,
};
pub use result::{AveragedMetric, FieldBest, Snapshot};
pub use run::recompute;
