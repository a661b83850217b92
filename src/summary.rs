//! Summary statistics tool: numeric statistics, categorical value counts,
//! data-quality metrics, and recommendations derived from those metrics.

use std::collections::HashSet;

use indexmap::IndexMap;
use log::{debug, warn};
use serde::Serialize;

use crate::{
    data::Value,
    dataset::{self, Dataset},
    error::IntakeResult,
    frequency, report,
    stats::{self, NumericSummary},
};

const UNEXPECTED_PREFIX: &str = "Error generating CSV summary";
pub const NO_ISSUES_RECOMMENDATION: &str = "No major data quality issues detected.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataQuality {
    pub missing_values: IndexMap<String, usize>,
    pub duplicate_rows: usize,
    pub total_cells: usize,
    pub missing_cells: usize,
    pub missing_percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub success: bool,
    pub numeric_summary: IndexMap<String, NumericSummary>,
    pub categorical_summary: IndexMap<String, IndexMap<String, usize>>,
    #[serde(serialize_with = "report::empty_map_when_none")]
    pub data_quality: Option<DataQuality>,
    pub recommendations: Vec<String>,
    pub message: String,
}

impl SummaryReport {
    fn failure(message: String) -> Self {
        warn!("{message}");
        Self {
            success: false,
            numeric_summary: IndexMap::new(),
            categorical_summary: IndexMap::new(),
            data_quality: None,
            recommendations: Vec::new(),
            message,
        }
    }
}

pub fn get_csv_summary(csv_text: &str) -> SummaryReport {
    match build_report(csv_text) {
        Ok(report) => report,
        Err(err) => SummaryReport::failure(err.report_message(UNEXPECTED_PREFIX)),
    }
}

fn build_report(csv_text: &str) -> IntakeResult<SummaryReport> {
    let dataset = dataset::parse_dataset(csv_text)?;
    let quality = assess_quality(&dataset);
    let recommendations = recommendations(&quality);
    debug!(
        "Quality for {} row(s): {} missing cell(s), {} duplicate row(s)",
        dataset.row_count(),
        quality.missing_cells,
        quality.duplicate_rows
    );

    Ok(SummaryReport {
        success: true,
        numeric_summary: stats::numeric_summary(&dataset),
        categorical_summary: frequency::categorical_summary(&dataset),
        data_quality: Some(quality),
        recommendations,
        message: format!(
            "Summary generated for {} rows and {} columns.",
            dataset.row_count(),
            dataset.column_count()
        ),
    })
}

pub fn assess_quality(dataset: &Dataset) -> DataQuality {
    let missing_values = dataset
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let missing = dataset.column_values(idx).filter(|v| v.is_missing()).count();
            (column.name.clone(), missing)
        })
        .collect::<IndexMap<_, _>>();
    let missing_cells = missing_values.values().sum::<usize>();
    let total_cells = dataset.row_count() * dataset.column_count();
    let missing_percentage = if total_cells == 0 {
        0.0
    } else {
        (missing_cells as f64 / total_cells as f64 * 10_000.0).round() / 100.0
    };

    DataQuality {
        missing_values,
        duplicate_rows: count_duplicate_rows(dataset.rows()),
        total_cells,
        missing_cells,
        missing_percentage,
    }
}

/// Rows equal in every column to an earlier row.
pub fn count_duplicate_rows(rows: &[Vec<Value>]) -> usize {
    let mut seen = HashSet::with_capacity(rows.len());
    rows.iter().filter(|row| !seen.insert(row.as_slice())).count()
}

pub fn recommendations(quality: &DataQuality) -> Vec<String> {
    let mut messages = quality
        .missing_values
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(column, count)| format!("Column '{column}' has {count} missing values."))
        .collect::<Vec<_>>();
    if quality.duplicate_rows > 0 {
        messages.push(format!("Found {} duplicate rows.", quality.duplicate_rows));
    }
    if messages.is_empty() {
        messages.push(NO_ISSUES_RECOMMENDATION.to_string());
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quality(missing: &[(&str, usize)], duplicate_rows: usize) -> DataQuality {
        DataQuality {
            missing_values: missing.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            duplicate_rows,
            total_cells: 0,
            missing_cells: 0,
            missing_percentage: 0.0,
        }
    }

    #[test]
    fn recommendations_follow_column_order_then_duplicates() {
        let messages = recommendations(&quality(&[("b", 2), ("a", 0), ("c", 1)], 3));
        assert_eq!(
            messages,
            vec![
                "Column 'b' has 2 missing values.",
                "Column 'c' has 1 missing values.",
                "Found 3 duplicate rows.",
            ]
        );
    }

    #[test]
    fn recommendations_fall_back_when_clean() {
        assert_eq!(
            recommendations(&quality(&[("a", 0)], 0)),
            vec![NO_ISSUES_RECOMMENDATION]
        );
    }

    #[test]
    fn duplicates_count_repeats_beyond_first_occurrence() {
        let row = |name: &str, age: i64| vec![Value::String(name.into()), Value::Integer(age)];
        let rows = vec![row("a", 1), row("b", 2), row("a", 1), row("a", 1), row("b", 3)];
        assert_eq!(count_duplicate_rows(&rows), 2);
    }

    #[test]
    fn missing_percentage_rounds_to_two_places() {
        let dataset = dataset::parse_dataset("a,b,c\n1,,x\n2,3,y\n4,5,\n").unwrap();
        let quality = assess_quality(&dataset);
        assert_eq!(quality.total_cells, 9);
        assert_eq!(quality.missing_cells, 2);
        assert_eq!(quality.missing_percentage, 22.22);
    }
}
