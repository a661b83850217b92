//! Header canonicalization: maps arbitrary CSV headers onto the canonical
//! HR-record vocabulary and expands every matched cell into a mapping entry.
//!
//! Headers are compared in normalized form (see [`normalize_header`]). Two
//! policies decide which canonical name a header takes:
//!
//! - [`MatchPolicy::Prioritized`] (default): an exact normalized match wins;
//!   otherwise the canonical name that contains, or is contained in, the header
//!   on word boundaries with the longest shared text wins. Ties prefer the
//!   candidate closest in length, then vocabulary order.
//! - [`MatchPolicy::FirstMatch`]: the first vocabulary entry whose normalized
//!   form equals, is a substring of, or contains the header. Short entries
//!   such as `NIN` can capture unrelated headers under this policy. Headers
//!   and entries are normalized with [`normalize_header_verbatim`] here, so
//!   `Employee#ID` reads `employeenumberid` and stays unmatched.

use std::{cmp::Reverse, sync::OnceLock};

use clap::ValueEnum;
use indexmap::IndexMap;
use itertools::Itertools;
use log::{debug, warn};
use serde::Serialize;

use crate::{
    data::Value,
    dataset::{self, Dataset},
    error::IntakeResult,
    report,
    vocabulary::Vocabulary,
};

pub const PREVIEW_ROWS: usize = 5;
const UNEXPECTED_PREFIX: &str = "Unexpected error processing CSV";

static HR_MATCHER: OnceLock<HeaderMatcher> = OnceLock::new();

/// Lowercases, spells `#` as `number`, drops periods, turns `_`, `-`, and `/`
/// into spaces, and collapses whitespace runs.
pub fn normalize_header(header: &str) -> String {
    header
        .to_lowercase()
        .replace('#', " number ")
        .chars()
        .filter(|c| *c != '.')
        .map(|c| match c {
            '_' | '-' | '/' => ' ',
            other => other,
        })
        .collect::<String>()
        .split_whitespace()
        .join(" ")
}

/// Plain character replacements: `#` becomes `number` without padding, and a
/// single pass turns double spaces into one.
pub fn normalize_header_verbatim(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .replace('#', "number")
        .replace('.', "")
        .replace(['_', '-', '/'], " ")
        .replace("  ", " ")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[value(rename_all = "kebab-case")]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    #[default]
    Prioritized,
    FirstMatch,
}

impl MatchPolicy {
    /// The normalization both sides of a comparison go through.
    pub fn normalize(self, header: &str) -> String {
        match self {
            MatchPolicy::Prioritized => normalize_header(header),
            MatchPolicy::FirstMatch => normalize_header_verbatim(header),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    /// The canonical name appears inside the header, e.g. `Job Title`.
    CanonicalInHeader,
    /// The header appears inside the canonical name, e.g. `Zip`.
    HeaderInCanonical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderMatch {
    pub canonical: String,
    pub kind: MatchKind,
}

#[derive(Debug, Clone)]
struct CanonicalEntry {
    canonical: String,
    normalized: String,
}

impl CanonicalEntry {
    fn tokens(&self) -> Vec<&str> {
        self.normalized.split(' ').collect()
    }
}

#[derive(Debug, Clone)]
pub struct HeaderMatcher {
    policy: MatchPolicy,
    entries: Vec<CanonicalEntry>,
}

impl HeaderMatcher {
    pub fn new(vocabulary: &Vocabulary, policy: MatchPolicy) -> Self {
        let entries = vocabulary
            .headers()
            .iter()
            .map(|canonical| CanonicalEntry {
                canonical: canonical.clone(),
                normalized: policy.normalize(canonical),
            })
            .collect();
        Self { policy, entries }
    }

    /// Shared matcher over the built-in vocabulary with the default policy.
    pub fn hr_default() -> &'static HeaderMatcher {
        HR_MATCHER.get_or_init(|| {
            HeaderMatcher::new(&Vocabulary::hr_default(), MatchPolicy::default())
        })
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Canonical names paired with their normalized forms, in vocabulary order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries
            .iter()
            .map(|e| (e.canonical.as_str(), e.normalized.as_str()))
    }

    pub fn match_header(&self, header: &str) -> Option<HeaderMatch> {
        let normalized = self.policy.normalize(header);
        let found = match self.policy {
            MatchPolicy::FirstMatch => self.first_match(&normalized),
            MatchPolicy::Prioritized => self.prioritized_match(&normalized),
        };
        match &found {
            Some(hit) => debug!(
                "Header '{header}' matched '{}' ({:?})",
                hit.canonical, hit.kind
            ),
            None => debug!("Header '{header}' has no canonical match"),
        }
        found
    }

    /// Matches every header independently; unmatched headers are omitted.
    pub fn match_headers(&self, headers: &[String]) -> Vec<(usize, HeaderMatch)> {
        headers
            .iter()
            .enumerate()
            .filter_map(|(idx, header)| self.match_header(header).map(|hit| (idx, hit)))
            .collect()
    }

    fn first_match(&self, normalized: &str) -> Option<HeaderMatch> {
        self.entries.iter().find_map(|entry| {
            let kind = if entry.normalized == normalized {
                MatchKind::Exact
            } else if normalized.contains(entry.normalized.as_str()) {
                MatchKind::CanonicalInHeader
            } else if entry.normalized.contains(normalized) {
                MatchKind::HeaderInCanonical
            } else {
                return None;
            };
            Some(HeaderMatch {
                canonical: entry.canonical.clone(),
                kind,
            })
        })
    }

    fn prioritized_match(&self, normalized: &str) -> Option<HeaderMatch> {
        if normalized.is_empty() {
            return None;
        }
        if let Some(entry) = self.entries.iter().find(|e| e.normalized == normalized) {
            return Some(HeaderMatch {
                canonical: entry.canonical.clone(),
                kind: MatchKind::Exact,
            });
        }

        let header_tokens = normalized.split(' ').collect::<Vec<_>>();
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(idx, entry)| {
                let entry_tokens = entry.tokens();
                let (kind, shared) = if contains_tokens(&header_tokens, &entry_tokens) {
                    (MatchKind::CanonicalInHeader, entry.normalized.len())
                } else if contains_tokens(&entry_tokens, &header_tokens) {
                    (MatchKind::HeaderInCanonical, normalized.len())
                } else {
                    return None;
                };
                let gap = entry.normalized.len().abs_diff(normalized.len());
                Some(((Reverse(shared), gap, idx), entry, kind))
            })
            .min_by_key(|(rank, _, _)| *rank)
            .map(|(_, entry, kind)| HeaderMatch {
                canonical: entry.canonical.clone(),
                kind,
            })
    }
}

/// True when `needle` occurs as a contiguous run of whole tokens in `haystack`.
fn contains_tokens(haystack: &[&str], needle: &[&str]) -> bool {
    !needle.is_empty()
        && needle.len() <= haystack.len()
        && haystack.windows(needle.len()).any(|window| window == needle)
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DataInfo {
    pub row_count: usize,
    pub column_count: usize,
    pub columns: Vec<String>,
    pub data_types: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderMapping {
    pub new_header: String,
    pub old_header: String,
    pub value: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessReport {
    pub success: bool,
    #[serde(serialize_with = "report::empty_map_when_none")]
    pub data_info: Option<DataInfo>,
    pub preview: Vec<IndexMap<String, Value>>,
    pub errors: Vec<String>,
    pub message: String,
    pub header_mappings: Vec<HeaderMapping>,
}

impl ProcessReport {
    fn failure(message: String) -> Self {
        warn!("{message}");
        Self {
            success: false,
            data_info: None,
            preview: Vec::new(),
            errors: vec![message.clone()],
            message,
            header_mappings: Vec::new(),
        }
    }
}

/// Processes `csv_text` against the built-in vocabulary.
pub fn process_csv_data(csv_text: &str) -> ProcessReport {
    process_csv_with(csv_text, HeaderMatcher::hr_default())
}

pub fn process_csv_with(csv_text: &str, matcher: &HeaderMatcher) -> ProcessReport {
    match build_report(csv_text, matcher) {
        Ok(report) => report,
        Err(err) => ProcessReport::failure(err.report_message(UNEXPECTED_PREFIX)),
    }
}

fn build_report(csv_text: &str, matcher: &HeaderMatcher) -> IntakeResult<ProcessReport> {
    let dataset = dataset::parse_dataset(csv_text)?;
    let columns = dataset.column_names();

    let data_info = DataInfo {
        row_count: dataset.row_count(),
        column_count: dataset.column_count(),
        columns: columns.clone(),
        data_types: dataset
            .columns()
            .iter()
            .map(|c| (c.name.clone(), c.datatype.as_str().to_string()))
            .collect(),
    };

    let preview = dataset
        .rows()
        .iter()
        .take(PREVIEW_ROWS)
        .map(|row| columns.iter().cloned().zip(row.iter().cloned()).collect())
        .collect();

    let matches = matcher.match_headers(&columns);
    let header_mappings = expand_mappings(&dataset, &columns, &matches);
    debug!(
        "Matched {} of {} header(s); emitted {} mapping entr(ies)",
        matches.len(),
        columns.len(),
        header_mappings.len()
    );

    Ok(ProcessReport {
        success: true,
        message: format!(
            "Successfully processed CSV with {} rows and {} columns",
            data_info.row_count, data_info.column_count
        ),
        data_info: Some(data_info),
        preview,
        errors: Vec::new(),
        header_mappings,
    })
}

fn expand_mappings(
    dataset: &Dataset,
    columns: &[String],
    matches: &[(usize, HeaderMatch)],
) -> Vec<HeaderMapping> {
    let mut mappings = Vec::with_capacity(dataset.row_count() * matches.len());
    for row in dataset.rows() {
        for (idx, hit) in matches {
            mappings.push(HeaderMapping {
                new_header: hit.canonical.clone(),
                old_header: columns[*idx].clone(),
                value: row[*idx].clone(),
            });
        }
    }
    mappings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(policy: MatchPolicy) -> HeaderMatcher {
        HeaderMatcher::new(&Vocabulary::hr_default(), policy)
    }

    fn canonical_for(policy: MatchPolicy, header: &str) -> Option<String> {
        matcher(policy).match_header(header).map(|hit| hit.canonical)
    }

    #[test]
    fn normalize_header_spells_out_and_strips_punctuation() {
        assert_eq!(normalize_header("  Employee # "), "employee number");
        assert_eq!(normalize_header("Work Ext."), "work ext");
        assert_eq!(normalize_header("first_name"), "first name");
        assert_eq!(normalize_header("Address-Line/1"), "address line 1");
        assert_eq!(normalize_header("Emp#"), "emp number");
        assert_eq!(normalize_header("Hire    Date"), "hire date");
    }

    #[test]
    fn verbatim_normalization_keeps_number_glued() {
        assert_eq!(normalize_header_verbatim("  Employee # "), "employee number");
        assert_eq!(normalize_header_verbatim("Employee#ID"), "employeenumberid");
        assert_eq!(normalize_header_verbatim("Emp#"), "empnumber");
        assert_eq!(normalize_header_verbatim("Hire    Date"), "hire  date");
        assert_eq!(normalize_header_verbatim("Address-Line/1"), "address line 1");
        assert_eq!(MatchPolicy::FirstMatch.normalize("Emp#"), "empnumber");
        assert_eq!(MatchPolicy::Prioritized.normalize("Emp#"), "emp number");
    }

    #[test]
    fn contains_tokens_requires_whole_words() {
        assert!(contains_tokens(&["job", "title"], &["title"]));
        assert!(!contains_tokens(&["running", "total"], &["nin"]));
        assert!(!contains_tokens(&["title"], &[]));
    }

    #[test]
    fn prioritized_prefers_exact_over_substring() {
        assert_eq!(
            canonical_for(MatchPolicy::Prioritized, "ADDRESS").as_deref(),
            Some("Address")
        );
        assert_eq!(
            canonical_for(MatchPolicy::FirstMatch, "ADDRESS").as_deref(),
            Some("Address Line 1")
        );
    }

    #[test]
    fn prioritized_ignores_partial_words() {
        assert_eq!(canonical_for(MatchPolicy::Prioritized, "Running Total"), None);
        assert_eq!(
            canonical_for(MatchPolicy::FirstMatch, "Running Total").as_deref(),
            Some("NIN")
        );
    }

    #[test]
    fn prioritized_prefers_longest_shared_text() {
        let hit = matcher(MatchPolicy::Prioritized)
            .match_header("Current Marital Status")
            .expect("match");
        assert_eq!(hit.canonical, "Marital Status");
        assert_eq!(hit.kind, MatchKind::CanonicalInHeader);

        let hit = matcher(MatchPolicy::Prioritized)
            .match_header("zip")
            .expect("match");
        assert_eq!(hit.canonical, "ZIP Code");
        assert_eq!(hit.kind, MatchKind::HeaderInCanonical);
    }

    #[test]
    fn empty_header_only_matches_under_first_match() {
        assert_eq!(canonical_for(MatchPolicy::Prioritized, " "), None);
        assert_eq!(
            canonical_for(MatchPolicy::FirstMatch, " ").as_deref(),
            Some("Status")
        );
    }

    #[test]
    fn expansion_is_row_major_over_matched_columns() {
        let report = process_csv_data("First Name,Notes,City\nAnn,x,Oslo\nBo,y,Rome\n");
        let pairs = report
            .header_mappings
            .iter()
            .map(|m| (m.new_header.as_str(), m.value.to_string()))
            .collect::<Vec<_>>();
        assert_eq!(
            pairs,
            vec![
                ("First Name", "Ann".to_string()),
                ("City", "Oslo".to_string()),
                ("First Name", "Bo".to_string()),
                ("City", "Rome".to_string()),
            ]
        );
    }
}
