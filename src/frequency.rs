use indexmap::IndexMap;

use crate::{data::Value, dataset::Dataset};

/// Category key under which missing cells are counted. A cell whose literal
/// text is `<missing>` lands in the same bucket; the per-column
/// `missing_values` count in the quality block only counts real missing cells.
pub const MISSING_LABEL: &str = "<missing>";

/// Value counts for every non-numeric column, keyed by column name.
pub fn categorical_summary(dataset: &Dataset) -> IndexMap<String, IndexMap<String, usize>> {
    dataset
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, column)| !column.datatype.is_numeric())
        .map(|(idx, column)| (column.name.clone(), value_counts(dataset.column_values(idx))))
        .collect()
}

/// Counts occurrences in descending frequency; equal counts keep the order in
/// which values first appeared.
pub fn value_counts<'a, I>(values: I) -> IndexMap<String, usize>
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for value in values {
        let key = match value {
            Value::Missing => MISSING_LABEL.to_string(),
            other => other.as_display(),
        };
        *counts.entry(key).or_insert(0) += 1;
    }
    counts.sort_by(|_, left, _, right| right.cmp(left));
    counts
}
