use indexmap::IndexMap;

use crate::record::MetricRecord;

/// Records of each model, keyed in first-seen order.
pub(crate) type ModelGroups<'a> = IndexMap<&'a str, Vec<&'a MetricRecord>>;

/// Partition `records` by model. Key order is the order in which each model
/// first appears in `records`; records keep their relative order inside a group.
pub(crate) fn group_by_model(records: &[MetricRecord]) -> ModelGroups<'_> {
    let mut groups = ModelGroups::new();
    for record in records {
        groups.entry(record.model.as_str()).or_default().push(record);
    }
    groups
}
