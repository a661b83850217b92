use std::{
    fmt,
    hash::{Hash, Hasher},
};

use anyhow::{Context, Result, bail};
use serde::Serialize;

use crate::dataset::ColumnType;

/// Cell texts read as missing, compared after trimming.
pub const MISSING_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const TRUE_TOKENS: &[&str] = &["True", "TRUE", "true"];
const FALSE_TOKENS: &[&str] = &["False", "FALSE", "false"];

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    Missing,
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
}

// Floats are always finite, see `parse_float`.
impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Missing => {}
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => {
                let normalized = if *f == 0.0 { 0.0f64 } else { *f };
                normalized.to_bits().hash(state);
            }
            Value::Boolean(b) => b.hash(state),
            Value::String(s) => s.hash(state),
        }
    }
}

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_display(&self) -> String {
        match self {
            Value::Missing => String::new(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Boolean(b) => String::from(if *b { "True" } else { "False" }),
            Value::String(s) => s.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

pub fn is_missing_token(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || MISSING_TOKENS.contains(&trimmed)
}

pub fn parse_boolean(raw: &str) -> Option<bool> {
    let trimmed = raw.trim();
    if TRUE_TOKENS.contains(&trimmed) {
        Some(true)
    } else if FALSE_TOKENS.contains(&trimmed) {
        Some(false)
    } else {
        None
    }
}

pub fn parse_integer(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// Rejects `inf` and friends so every stored float stays finite.
pub fn parse_float(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

pub fn parse_typed_value(raw: &str, ty: &ColumnType) -> Result<Value> {
    if is_missing_token(raw) {
        return Ok(Value::Missing);
    }
    let parsed = match ty {
        ColumnType::String => Value::String(raw.to_string()),
        ColumnType::Integer => match parse_integer(raw) {
            Some(value) => Value::Integer(value),
            None => bail!("Failed to parse '{raw}' as integer"),
        },
        ColumnType::Float => {
            let value = parse_float(raw)
                .with_context(|| format!("Failed to parse '{raw}' as float"))?;
            Value::Float(value)
        }
        ColumnType::Boolean => {
            let value = parse_boolean(raw)
                .with_context(|| format!("Failed to parse '{raw}' as boolean"))?;
            Value::Boolean(value)
        }
    };
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn missing_tokens_include_blank_and_na_markers() {
        assert!(is_missing_token(""));
        assert!(is_missing_token("   "));
        assert!(is_missing_token("NA"));
        assert!(is_missing_token(" null "));
        assert!(!is_missing_token("Nan Smith"));
        assert!(!is_missing_token("missing"));
    }

    #[test]
    fn parse_typed_value_respects_column_type() {
        assert_eq!(
            parse_typed_value(" 42 ", &ColumnType::Integer).unwrap(),
            Value::Integer(42)
        );
        assert_eq!(
            parse_typed_value("2.5", &ColumnType::Float).unwrap(),
            Value::Float(2.5)
        );
        assert_eq!(
            parse_typed_value("FALSE", &ColumnType::Boolean).unwrap(),
            Value::Boolean(false)
        );
        assert_eq!(
            parse_typed_value(" padded ", &ColumnType::String).unwrap(),
            Value::String(" padded ".to_string())
        );
        assert_eq!(
            parse_typed_value("N/A", &ColumnType::Integer).unwrap(),
            Value::Missing
        );
        assert!(parse_typed_value("abc", &ColumnType::Integer).is_err());
    }

    #[test]
    fn parse_float_rejects_non_finite() {
        assert_eq!(parse_float("inf"), None);
        assert_eq!(parse_float("1e3"), Some(1000.0));
    }

    #[test]
    fn signed_zero_hashes_equal() {
        let mut set = HashSet::new();
        set.insert(Value::Float(0.0));
        assert!(set.contains(&Value::Float(-0.0)));
    }

    #[test]
    fn values_serialize_as_plain_json() {
        let json = serde_json::to_string(&vec![
            Value::Missing,
            Value::Integer(3),
            Value::Boolean(true),
            Value::String("x".into()),
        ])
        .unwrap();
        assert_eq!(json, r#"[null,3,true,"x"]"#);
    }
}
