//! Fact values and names
//!
//! A fact is a named piece of system information. Its value is a small
//! structured document: a scalar, a sequence, or a string-keyed mapping,
//! nested to any depth. Keys are always strings so a value read back from
//! disk compares equal to the value that was written.

use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml::Value;
use thiserror::Error;

/// A string-keyed mapping of fact values, kept in insertion order
pub type FactMapping = IndexMap<String, FactValue>;

/// Errors converting a parsed YAML value into a [`FactValue`]
#[derive(Debug, Error)]
pub enum FactValueError {
    /// The text is not valid YAML
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// A fact's value as a whole cannot be null
    #[error("a fact value cannot be null")]
    Null,
    /// A mapping was expected but some other node was found
    #[error("expected a mapping, found: {0}")]
    NotAMapping(String),
    /// Mapping keys must be strings
    #[error("mapping key is not a string: {0}")]
    NonStringKey(String),
    /// Explicit YAML tags (`!foo`) are not supported
    #[error("tagged value '{0}' is not supported")]
    Tagged(String),
    /// A number that fits neither i64 nor f64
    #[error("unrepresentable number: {0}")]
    Number(String),
}

/// The value of a single fact
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FactValue {
    /// Only appears nested inside a sequence or mapping
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Vec<FactValue>),
    Mapping(FactMapping),
}

impl FactValue {
    /// Parses a YAML snippet into a fact value.
    ///
    /// Used by the command line, where `put` takes its value as YAML text.
    /// A bare word parses as a string, `[a, b]` as a sequence, and so on.
    /// A null at the top level is rejected.
    pub fn from_yaml_str(s: &str) -> Result<Self, FactValueError> {
        let value: Value = serde_yaml::from_str(s)?;
        match FactValue::try_from(value)? {
            FactValue::Null => Err(FactValueError::Null),
            value => Ok(value),
        }
    }
}

impl From<&str> for FactValue {
    fn from(s: &str) -> Self {
        FactValue::String(s.to_string())
    }
}

impl From<String> for FactValue {
    fn from(s: String) -> Self {
        FactValue::String(s)
    }
}

impl From<i64> for FactValue {
    fn from(n: i64) -> Self {
        FactValue::Integer(n)
    }
}

impl From<bool> for FactValue {
    fn from(b: bool) -> Self {
        FactValue::Bool(b)
    }
}

impl<T: Into<FactValue>> From<Vec<T>> for FactValue {
    fn from(items: Vec<T>) -> Self {
        FactValue::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl From<FactMapping> for FactValue {
    fn from(m: FactMapping) -> Self {
        FactValue::Mapping(m)
    }
}

impl TryFrom<Value> for FactValue {
    type Error = FactValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(FactValue::Null),
            Value::Bool(b) => Ok(FactValue::Bool(b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(FactValue::Integer(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(FactValue::Float(f))
                } else {
                    Err(FactValueError::Number(n.to_string()))
                }
            }
            Value::String(s) => Ok(FactValue::String(s)),
            Value::Sequence(items) => items
                .into_iter()
                .map(FactValue::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(FactValue::Sequence),
            Value::Mapping(entries) => mapping_from_entries(entries).map(FactValue::Mapping),
            Value::Tagged(tagged) => Err(FactValueError::Tagged(tagged.tag.to_string())),
        }
    }
}

/// Converts a YAML mapping node into a [`FactMapping`].
///
/// Any node other than a mapping is rejected, as is any key that is not a
/// plain string.
pub fn mapping_from_yaml(value: Value) -> Result<FactMapping, FactValueError> {
    match value {
        Value::Mapping(entries) => mapping_from_entries(entries),
        other => Err(FactValueError::NotAMapping(describe(&other))),
    }
}

fn mapping_from_entries(entries: serde_yaml::Mapping) -> Result<FactMapping, FactValueError> {
    let mut mapping = FactMapping::with_capacity(entries.len());
    for (key, val) in entries {
        match key {
            Value::String(key) => {
                mapping.insert(key, FactValue::try_from(val)?);
            }
            other => return Err(FactValueError::NonStringKey(describe(&other))),
        }
    }
    Ok(mapping)
}

fn describe(value: &Value) -> String {
    serde_yaml::to_string(value)
        .map(|s| s.trim_end().to_string())
        .unwrap_or_else(|_| format!("{:?}", value))
}

/// Checks whether a fact name can be turned into a cache file name.
///
/// Names must be non-empty, must not be `.` or `..`, and must not contain a
/// path separator or NUL, so the entry always lands directly inside the cache
/// directory.
pub fn is_valid_fact_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_fact_names() {
        assert!(is_valid_fact_name("string_value"));
        assert!(is_valid_fact_name("os.release"));
        assert!(is_valid_fact_name("single"));
    }

    #[test]
    fn test_invalid_fact_names() {
        assert!(!is_valid_fact_name(""));
        assert!(!is_valid_fact_name("."));
        assert!(!is_valid_fact_name(".."));
        assert!(!is_valid_fact_name("../etc/passwd"));
        assert!(!is_valid_fact_name("a/b"));
        assert!(!is_valid_fact_name("a\\b"));
    }

    #[test]
    fn test_scalar_conversion() {
        assert_eq!(
            FactValue::try_from(Value::String("tested".into())).unwrap(),
            FactValue::String("tested".into())
        );
        assert_eq!(FactValue::try_from(Value::Bool(true)).unwrap(), FactValue::Bool(true));
        assert_eq!(
            FactValue::try_from(Value::Number(42.into())).unwrap(),
            FactValue::Integer(42)
        );
    }

    #[test]
    fn test_nested_nulls_are_kept() {
        let value: Value = serde_yaml::from_str("alpha: one\nbeta: ~\nitems:\n- thing1\n-\n").unwrap();
        let mapping = mapping_from_yaml(value).unwrap();
        assert_eq!(mapping["beta"], FactValue::Null);
        assert_eq!(
            mapping["items"],
            FactValue::Sequence(vec!["thing1".into(), FactValue::Null])
        );
    }

    #[test]
    fn test_null_document_is_not_a_mapping() {
        assert!(matches!(
            mapping_from_yaml(Value::Null),
            Err(FactValueError::NotAMapping(_))
        ));
    }

    #[test]
    fn test_nested_mapping_preserves_order() {
        let value: Value = serde_yaml::from_str("tres: three\nalpha: one\nbeta: two\n").unwrap();
        let mapping = mapping_from_yaml(value).unwrap();
        let keys: Vec<&str> = mapping.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["tres", "alpha", "beta"]);
    }

    #[test]
    fn test_non_string_key_is_rejected() {
        let value: Value = serde_yaml::from_str("1: one\n").unwrap();
        assert!(matches!(
            mapping_from_yaml(value),
            Err(FactValueError::NonStringKey(_))
        ));
    }

    #[test]
    fn test_scalar_is_not_a_mapping() {
        let value: Value = serde_yaml::from_str("random non-yaml garbage").unwrap();
        assert!(matches!(
            mapping_from_yaml(value),
            Err(FactValueError::NotAMapping(_))
        ));
    }

    #[test]
    fn test_from_yaml_str() {
        assert_eq!(FactValue::from_yaml_str("tested").unwrap(), FactValue::from("tested"));
        assert_eq!(
            FactValue::from_yaml_str("[thing1, ~]").unwrap(),
            FactValue::Sequence(vec!["thing1".into(), FactValue::Null])
        );
        assert!(matches!(FactValue::from_yaml_str("~"), Err(FactValueError::Null)));
        assert!(matches!(FactValue::from_yaml_str("[a, b"), Err(FactValueError::Yaml(_))));
    }

    #[test]
    fn test_serializes_as_plain_yaml() {
        let value = FactValue::from(vec!["thing1", "thing2"]);
        assert_eq!(serde_yaml::to_string(&value).unwrap(), "- thing1\n- thing2\n");
        let with_null = FactValue::Sequence(vec!["thing1".into(), FactValue::Null]);
        assert_eq!(serde_yaml::to_string(&with_null).unwrap(), "- thing1\n- null\n");
    }
}
