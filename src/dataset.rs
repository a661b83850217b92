//! In-memory tabular dataset built from a raw CSV string.
//!
//! Parsing runs in two passes: the `csv` reader splits the text into string
//! records, then every column is scanned once to pick a [`ColumnType`] before
//! the cells are converted into typed [`Value`]s.

use std::collections::HashSet;

use anyhow::Context;
use log::debug;
use serde::Serialize;

use crate::{
    data::{Value, is_missing_token, parse_boolean, parse_float, parse_integer, parse_typed_value},
    error::{IntakeError, IntakeResult},
    io_utils,
};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Integer,
    Float,
    Boolean,
    String,
}

impl ColumnType {
    /// Label reported in `data_types`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Integer => "int64",
            ColumnType::Float => "float64",
            ColumnType::Boolean => "bool",
            ColumnType::String => "object",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnMeta {
    pub name: String,
    pub datatype: ColumnType,
}

#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<ColumnMeta>,
    rows: Vec<Vec<Value>>,
}

impl Dataset {
    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().map(move |row| &row[index])
    }
}

#[derive(Debug, Clone)]
struct TypeCandidate {
    observed: usize,
    possible_integer: bool,
    possible_float: bool,
    possible_boolean: bool,
}

impl TypeCandidate {
    fn new() -> Self {
        Self {
            observed: 0,
            possible_integer: true,
            possible_float: true,
            possible_boolean: true,
        }
    }

    fn update(&mut self, raw: &str) {
        if is_missing_token(raw) {
            return;
        }
        self.observed += 1;
        if self.possible_integer && parse_integer(raw).is_none() {
            self.possible_integer = false;
        }
        if self.possible_float && parse_float(raw).is_none() {
            self.possible_float = false;
        }
        if self.possible_boolean && parse_boolean(raw).is_none() {
            self.possible_boolean = false;
        }
    }

    fn decide(&self) -> ColumnType {
        // An all-missing column carries no evidence and reads as float.
        if self.observed == 0 {
            ColumnType::Float
        } else if self.possible_integer {
            ColumnType::Integer
        } else if self.possible_float {
            ColumnType::Float
        } else if self.possible_boolean {
            ColumnType::Boolean
        } else {
            ColumnType::String
        }
    }
}

/// Parses comma-delimited text whose first line is the header row.
pub fn parse_dataset(csv_text: &str) -> IntakeResult<Dataset> {
    if csv_text.trim().is_empty() {
        return Err(IntakeError::validation("CSV string cannot be empty"));
    }

    let mut reader =
        io_utils::open_csv_reader(csv_text.as_bytes(), io_utils::DEFAULT_CSV_DELIMITER, true);
    let headers = reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>();
    let headers = dedupe_headers(&headers);

    let mut raw_rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        raw_rows.push(record.iter().map(|s| s.to_string()).collect::<Vec<_>>());
    }
    if raw_rows.is_empty() {
        return Err(IntakeError::validation("CSV contains no data rows"));
    }

    let mut candidates = vec![TypeCandidate::new(); headers.len()];
    for row in &raw_rows {
        for (candidate, raw) in candidates.iter_mut().zip(row) {
            candidate.update(raw);
        }
    }

    let columns = headers
        .into_iter()
        .zip(&candidates)
        .map(|(name, candidate)| ColumnMeta {
            name,
            datatype: candidate.decide(),
        })
        .collect::<Vec<_>>();
    debug!(
        "Inferred column types: {:?}",
        columns
            .iter()
            .map(|c| (c.name.as_str(), c.datatype.as_str()))
            .collect::<Vec<_>>()
    );

    let mut rows = Vec::with_capacity(raw_rows.len());
    for (row_idx, raw) in raw_rows.iter().enumerate() {
        let typed = raw
            .iter()
            .zip(&columns)
            .map(|(cell, column)| {
                parse_typed_value(cell, &column.datatype)
                    .with_context(|| format!("Column '{}'", column.name))
            })
            .collect::<anyhow::Result<Vec<_>>>()
            .with_context(|| format!("Parsing row {}", row_idx + 2))?;
        rows.push(typed);
    }

    Ok(Dataset { columns, rows })
}

/// Names blank headers `Unnamed: <index>` and suffixes repeats with `.1`, `.2`.
fn dedupe_headers(headers: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut output = Vec::with_capacity(headers.len());
    for (idx, header) in headers.iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {idx}")
        } else {
            header.clone()
        };
        let mut candidate = base.clone();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{base}.{suffix}");
            suffix += 1;
        }
        seen.insert(candidate.clone());
        output.push(candidate);
    }
    output
}
