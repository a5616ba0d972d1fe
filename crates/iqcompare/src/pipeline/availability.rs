use serde::{Serialize, Serializer};

use crate::metric::{MetricFamily, MetricField};

use super::result::AveragedMetric;

/// Which metric fields have at least one defined, finite average.
///
/// A field that is unavailable gets no chart, no radar axis and no table
/// column at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Availability {
    present: [bool; MetricField::COUNT],
}

impl Availability {
    pub fn detect(averaged: &[AveragedMetric]) -> Self {
        let mut present = [false; MetricField::COUNT];
        for field in MetricField::ALL {
            present[field.index()] = averaged.iter().any(|m| m.value(field).is_some());
        }
        Self { present }
    }

    pub fn has_field(&self, field: MetricField) -> bool {
        self.present[field.index()]
    }

    /// Available fields in catalogue order.
    pub fn fields(&self) -> impl Iterator<Item = MetricField> + '_ {
        MetricField::ALL
            .into_iter()
            .filter(move |field| self.has_field(*field))
    }

    /// Available fields of one family in catalogue order.
    pub fn fields_in(&self, family: MetricFamily) -> Vec<MetricField> {
        family.fields().filter(|f| self.has_field(*f)).collect()
    }

    pub fn is_empty(&self) -> bool {
        !self.present.iter().any(|p| *p)
    }
}

impl Serialize for Availability {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.fields())
    }
}
