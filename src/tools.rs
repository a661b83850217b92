//! Registry of the callable tools, addressed by the stable names an
//! orchestration layer uses to invoke them.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

use crate::{canonical, summary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ToolKind {
    #[value(name = "process_csv_data")]
    ProcessCsvData,
    #[value(name = "get_csv_summary")]
    GetCsvSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
}

impl ToolKind {
    pub const ALL: [ToolKind; 2] = [ToolKind::ProcessCsvData, ToolKind::GetCsvSummary];

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::ProcessCsvData => "process_csv_data",
            ToolKind::GetCsvSummary => "get_csv_summary",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolKind::ProcessCsvData => {
                "Parse a CSV string, describe its columns, preview rows, and map headers to canonical HR fields"
            }
            ToolKind::GetCsvSummary => {
                "Compute numeric statistics, categorical counts, and data-quality recommendations for a CSV string"
            }
        }
    }
}

pub fn catalog() -> Vec<ToolDescriptor> {
    ToolKind::ALL
        .iter()
        .map(|kind| ToolDescriptor {
            name: kind.name(),
            description: kind.description(),
        })
        .collect()
}

/// Runs one tool and returns its report as a JSON document. Tool failures are
/// part of the document; only serialization problems surface as `Err`.
pub fn invoke(kind: ToolKind, csv_text: &str) -> Result<serde_json::Value> {
    let document = match kind {
        ToolKind::ProcessCsvData => serde_json::to_value(canonical::process_csv_data(csv_text)),
        ToolKind::GetCsvSummary => serde_json::to_value(summary::get_csv_summary(csv_text)),
    };
    document.with_context(|| format!("Serializing {} result", kind.name()))
}
