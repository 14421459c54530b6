//! Dotted key paths for attribute-style lookup
//!
//! Supports:
//! - a.b.c (nested mappings)
//! - layers[0].units (array index)
//! - layers.0.units (numeric segment: array index, or `"0"` key on a mapping)
//!
//! Does NOT support wildcards, filters or quoted keys containing dots.

use serde_json::Value;

use crate::error::{ArtifactError, Result};

/// A parsed key path segment
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Mapping key access: .key
    Key(String),
    /// Array index access: [0]
    Index(usize),
}

/// Parse a dotted key path into segments
///
/// Examples:
/// - "model.params.alpha" → [Key("model"), Key("params"), Key("alpha")]
/// - "layers[0].units" → [Key("layers"), Index(0), Key("units")]
pub fn parse(path: &str) -> Result<Vec<Segment>> {
    let invalid = || ArtifactError::InvalidKeyPath {
        path: path.to_string(),
    };

    if path.is_empty() {
        return Err(invalid());
    }

    let mut segments = Vec::new();

    for part in path.split('.') {
        if part.is_empty() {
            return Err(invalid());
        }

        if let Some(bracket_pos) = part.find('[') {
            let key = &part[..bracket_pos];
            if !key.is_empty() {
                segments.push(Segment::Key(key.to_string()));
            }

            // One or more trailing [n] groups: grid[1][2]
            let mut rest = &part[bracket_pos..];
            while !rest.is_empty() {
                let close = match (rest.starts_with('['), rest.find(']')) {
                    (true, Some(close)) => close,
                    _ => return Err(invalid()),
                };
                let index: usize = rest[1..close].parse().map_err(|_| invalid())?;
                segments.push(Segment::Index(index));
                rest = &rest[close + 1..];
            }
        } else if let Ok(index) = part.parse::<usize>() {
            segments.push(Segment::Index(index));
        } else {
            segments.push(Segment::Key(part.to_string()));
        }
    }

    Ok(segments)
}

/// Walk segments through a value, borrowing the result
///
/// A numeric segment applied to a mapping looks up the key `"<n>"`, so
/// integer-keyed YAML mappings stay reachable.
pub fn apply<'a>(value: &'a Value, segments: &[Segment]) -> Option<&'a Value> {
    segments.iter().try_fold(value, |current, segment| match (segment, current) {
        (Segment::Key(key), _) => current.get(key.as_str()),
        (Segment::Index(idx), Value::Object(map)) => map.get(&idx.to_string()),
        (Segment::Index(idx), _) => current.get(*idx),
    })
}

/// Short type name of a value, for error messages
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_dotted_keys() {
        let segments = parse("model.params.alpha").unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Key("model".to_string()),
                Segment::Key("params".to_string()),
                Segment::Key("alpha".to_string()),
            ]
        );
    }

    #[test]
    fn parse_bracket_and_numeric_index() {
        assert_eq!(
            parse("layers[0].units").unwrap(),
            parse("layers.0.units").unwrap()
        );
    }

    #[test]
    fn parse_chained_brackets() {
        let segments = parse("grid[1][2]").unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Key("grid".to_string()),
                Segment::Index(1),
                Segment::Index(2),
            ]
        );
    }

    #[test]
    fn parse_rejects_malformed_paths() {
        assert!(parse("").is_err());
        assert!(parse("a..b").is_err());
        assert!(parse("a[x]").is_err());
        assert!(parse("a[0").is_err());
        assert!(parse("a[0]b").is_err());
    }

    #[test]
    fn apply_nested_value() {
        let value = json!({"model": {"layers": [{"units": 64}, {"units": 32}]}});
        let found = apply(&value, &parse("model.layers[1].units").unwrap());
        assert_eq!(found, Some(&json!(32)));
        assert_eq!(apply(&value, &parse("model.missing").unwrap()), None);
    }

    #[test]
    fn numeric_segment_reads_integer_keyed_mapping() {
        let value = json!({"labels": {"0": "bad", "1": "good"}, "grid": [[1, 2], [3, 4]]});
        assert_eq!(
            apply(&value, &parse("labels.1").unwrap()),
            Some(&json!("good"))
        );
        assert_eq!(apply(&value, &parse("labels[0]").unwrap()), Some(&json!("bad")));
        assert_eq!(apply(&value, &parse("grid.1.0").unwrap()), Some(&json!(3)));
    }

    #[test]
    fn type_names_read_naturally() {
        assert_eq!(type_name(&json!([1])), "an array");
        assert_eq!(type_name(&json!({"a": 1})), "a mapping");
    }
}
