//! Canonical header vocabulary.
//!
//! The built-in vocabulary is the 32 HR-record field names. A YAML file with a
//! `headers` list can replace it for a single run:
//!
//! ```yaml
//! headers:
//!   - "Employee #"
//!   - First Name
//! ```
//!
//! Entries containing ` #` must be quoted; YAML reads the rest of an unquoted
//! line as a comment.

use std::{collections::HashSet, fs, path::Path};

use anyhow::{Context, Result, ensure};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::canonical::normalize_header;

pub const HR_CANONICAL_HEADERS: [&str; 32] = [
    "Status",
    "Employee #",
    "First Name",
    "Preferred Name",
    "Middle Name",
    "Last Name",
    "Birth Date",
    "SSN",
    "NIN",
    "Gender",
    "Marital Status",
    "Address Line 1",
    "Address Line 2",
    "City",
    "State",
    "ZIP Code",
    "Country",
    "Mobile Phone",
    "Home Phone",
    "Work Phone",
    "Work Ext.",
    "Work Email",
    "Home Email",
    "Hire Date",
    "Ethnicity",
    "EEO Job Category",
    "Veteran Status",
    "Nationality",
    "Partner Specific Employee ID",
    "Standard Hours Per Week",
    "Title",
    "Address",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vocabulary {
    headers: Vec<String>,
}

impl Vocabulary {
    pub fn hr_default() -> Self {
        Self {
            headers: HR_CANONICAL_HEADERS.iter().map(|h| h.to_string()).collect(),
        }
    }

    pub fn from_headers<I, S>(headers: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let vocabulary = Self {
            headers: headers.into_iter().map(Into::into).collect(),
        };
        vocabulary.validate()?;
        Ok(vocabulary)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Opening vocabulary file {path:?}"))?;
        for line in commented_entries(&text) {
            warn!("Vocabulary {path:?} line {line}: unquoted ' #' starts a YAML comment");
        }
        let parsed: Vocabulary = serde_yaml::from_str(&text)
            .with_context(|| format!("Parsing vocabulary YAML {path:?}"))?;
        Self::from_headers(parsed.headers)
            .with_context(|| format!("Validating vocabulary {path:?}"))
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    fn validate(&self) -> Result<()> {
        ensure!(!self.headers.is_empty(), "Vocabulary must list at least one header");
        let mut seen = HashSet::new();
        for header in &self.headers {
            let normalized = normalize_header(header);
            ensure!(
                !normalized.is_empty(),
                "Vocabulary header '{header}' normalizes to an empty name"
            );
            if !seen.insert(normalized.clone()) {
                warn!("Vocabulary header '{header}' duplicates normalized form '{normalized}'");
            }
        }
        Ok(())
    }
}

/// 1-based numbers of list entries that are unquoted and contain ` #`.
fn commented_entries(text: &str) -> Vec<usize> {
    text.lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let entry = line.trim_start().strip_prefix("- ")?.trim_start();
            let quoted = entry.starts_with('"') || entry.starts_with('\'');
            (!quoted && entry.contains(" #")).then_some(idx + 1)
        })
        .collect()
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::hr_default()
    }
}
