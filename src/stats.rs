use indexmap::IndexMap;
use serde::Serialize;

use crate::dataset::Dataset;

/// Descriptive statistics for one numeric column. Undefined metrics are
/// `None`: everything but `count` on an empty column, and `std` below two
/// observations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    #[serde(rename = "25%")]
    pub p25: Option<f64>,
    #[serde(rename = "50%")]
    pub p50: Option<f64>,
    #[serde(rename = "75%")]
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

/// Statistics for every numeric column, keyed by column name in column order.
pub fn numeric_summary(dataset: &Dataset) -> IndexMap<String, NumericSummary> {
    dataset
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, column)| column.datatype.is_numeric())
        .map(|(idx, column)| {
            let mut stats = ColumnStats::default();
            for value in dataset.column_values(idx) {
                if let Some(number) = value.as_f64() {
                    stats.add_value(number);
                }
            }
            (column.name.clone(), stats.finish())
        })
        .collect()
}

#[derive(Debug, Default)]
struct ColumnStats {
    values: Vec<f64>,
    sum: f64,
    min: Option<f64>,
    max: Option<f64>,
}

impl ColumnStats {
    fn add_value(&mut self, value: f64) {
        self.sum += value;
        self.min = Some(self.min.map_or(value, |current| current.min(value)));
        self.max = Some(self.max.map_or(value, |current| current.max(value)));
        self.values.push(value);
    }

    fn count(&self) -> usize {
        self.values.len()
    }

    fn mean(&self) -> Option<f64> {
        (self.count() > 0).then(|| self.sum / self.count() as f64)
    }

    fn std_dev(&self) -> Option<f64> {
        if self.count() < 2 {
            return None;
        }
        let mean = self.mean()?;
        let squared = self
            .values
            .iter()
            .map(|value| (value - mean).powi(2))
            .sum::<f64>();
        Some((squared / (self.count() as f64 - 1.0)).sqrt())
    }

    fn finish(mut self) -> NumericSummary {
        let mean = self.mean();
        let std = self.std_dev();
        self.values.sort_by(|a, b| a.total_cmp(b));
        NumericSummary {
            count: self.count(),
            mean,
            std,
            min: self.min,
            p25: quantile(&self.values, 0.25),
            p50: quantile(&self.values, 0.5),
            p75: quantile(&self.values, 0.75),
            max: self.max,
        }
    }
}

/// Linear interpolation between the closest ranks of an ascending slice.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summarize(values: &[f64]) -> NumericSummary {
        let mut stats = ColumnStats::default();
        for value in values {
            stats.add_value(*value);
        }
        stats.finish()
    }

    #[test]
    fn quantiles_interpolate_between_ranks() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&sorted, 0.25), Some(1.75));
        assert_eq!(quantile(&sorted, 0.5), Some(2.5));
        assert_eq!(quantile(&sorted, 0.75), Some(3.25));
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn summary_matches_describe_output() {
        let summary = summarize(&[30.0, 25.0, 25.0]);
        assert_eq!(summary.count, 3);
        assert!((summary.mean.unwrap() - 26.666_666_666_666_668).abs() < 1e-12);
        assert!((summary.std.unwrap() - 2.886_751_345_948_129).abs() < 1e-12);
        assert_eq!(summary.min, Some(25.0));
        assert_eq!(summary.p25, Some(25.0));
        assert_eq!(summary.p50, Some(25.0));
        assert_eq!(summary.p75, Some(27.5));
        assert_eq!(summary.max, Some(30.0));
    }

    #[test]
    fn single_value_has_no_std() {
        let summary = summarize(&[7.0]);
        assert_eq!(summary.std, None);
        assert_eq!(summary.p75, Some(7.0));
    }

    #[test]
    fn empty_column_reports_zero_count() {
        let summary = summarize(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.mean, None);
        assert_eq!(summary.min, None);
    }

    #[test]
    fn serializes_percentile_keys() {
        let json = serde_json::to_value(summarize(&[1.0, 2.0])).unwrap();
        assert_eq!(json["25%"], serde_json::json!(1.25));
        assert_eq!(json["std"], serde_json::json!(0.7071067811865476));
    }
}
