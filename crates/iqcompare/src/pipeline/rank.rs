use crate::metric::Direction;

use super::availability::Availability;
use super::result::{AveragedMetric, FieldBest};

/// Best model(s) for every available field, honoring the field's direction.
pub(crate) fn best_per_field(
    averaged: &[AveragedMetric],
    availability: &Availability,
) -> Vec<FieldBest> {
    availability
        .fields()
        .filter_map(|field| {
            let values = averaged
                .iter()
                .filter_map(|m| m.value(field).map(|v| (m.model.as_str(), v)));
            let best = match field.direction() {
                Direction::LowerIsBetter => values.clone().map(|(_, v)| v).reduce(f64::min),
                Direction::HigherIsBetter => values.clone().map(|(_, v)| v).reduce(f64::max),
            }?;
            let models = values
                .filter(|(_, v)| *v == best)
                .map(|(model, _)| model.to_string())
                .collect();
            Some(FieldBest {
                field,
                value: best,
                models,
            })
        })
        .collect()
}
