//! Normalization of polymorphic array-valued parameters
//!
//! Clients deliver array parameters in three shapes: a native JSON array,
//! a JSON-encoded string (`'["x","y"]'`), or a delimiter-separated string
//! (`"x, y"`). One normalization function parses all three into a
//! canonical ordered list and validates every element, so no builder
//! re-implements the handling per call site.

use codescout_core::{Error, Result};
use codescout_security::SecurityValidator;
use serde_json::Value;

/// Parse an array-valued parameter into a canonical list of elements.
///
/// Each element is trimmed of surrounding quote characters and must pass
/// the injection checks; elements beginning with `-` are rejected unless
/// listed in `allowed_flags`.
pub fn normalize_string_list(value: &Value, allowed_flags: &[&str]) -> Result<Vec<String>> {
    let raw_items = split_into_items(value)?;

    let mut items = Vec::with_capacity(raw_items.len());
    for raw in raw_items {
        let element = trim_quotes(raw.trim());
        if element.is_empty() {
            continue;
        }

        SecurityValidator::validate_list_element(&element, allowed_flags)?;
        items.push(element);
    }

    Ok(items)
}

/// Like [`normalize_string_list`] but treats a missing parameter as empty
pub fn normalize_optional_list(
    value: Option<&Value>,
    allowed_flags: &[&str],
) -> Result<Vec<String>> {
    match value {
        Some(v) if !v.is_null() => normalize_string_list(v, allowed_flags),
        _ => Ok(Vec::new()),
    }
}

fn split_into_items(value: &Value) -> Result<Vec<String>> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                Value::Number(n) => Ok(n.to_string()),
                Value::Bool(b) => Ok(b.to_string()),
                other => Err(Error::configuration(format!(
                    "array parameter element must be a scalar, got: {other}"
                ))),
            })
            .collect(),
        Value::String(s) => {
            let trimmed = s.trim();

            // JSON-encoded string form; on parse failure fall back to
            // delimiter splitting so a literal "[x]" term still works
            if trimmed.starts_with('[') {
                if let Ok(parsed) = serde_json::from_str::<Vec<String>>(trimmed) {
                    return Ok(parsed);
                }
            }

            Ok(trimmed.split(',').map(ToString::to_string).collect())
        }
        other => Err(Error::configuration(format!(
            "array parameter must be a list or string, got: {other}"
        ))),
    }
}

fn trim_quotes(s: &str) -> String {
    let s = s.strip_prefix('"').and_then(|r| r.strip_suffix('"')).unwrap_or(s);
    let s = s.strip_prefix('\'').and_then(|r| r.strip_suffix('\'')).unwrap_or(s);
    s.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_three_encodings_normalize_identically() {
        let native = json!(["x", "y"]);
        let json_encoded = json!(r#"["x","y"]"#);
        let comma = json!("x, y");

        let expected = vec!["x".to_string(), "y".to_string()];
        assert_eq!(normalize_string_list(&native, &[]).unwrap(), expected);
        assert_eq!(normalize_string_list(&json_encoded, &[]).unwrap(), expected);
        assert_eq!(normalize_string_list(&comma, &[]).unwrap(), expected);
    }

    #[test]
    fn test_comma_without_space_and_single_value() {
        assert_eq!(
            normalize_string_list(&json!("a,b,c"), &[]).unwrap(),
            vec!["a", "b", "c"]
        );
        assert_eq!(
            normalize_string_list(&json!("solo"), &[]).unwrap(),
            vec!["solo"]
        );
    }

    #[test]
    fn test_surrounding_quotes_are_trimmed() {
        assert_eq!(
            normalize_string_list(&json!(r#""quoted", 'single'"#), &[]).unwrap(),
            vec!["quoted", "single"]
        );
    }

    #[test]
    fn test_empty_elements_are_dropped() {
        assert_eq!(
            normalize_string_list(&json!("a, , b,"), &[]).unwrap(),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_injection_elements_are_rejected() {
        for bad in ["a;b", "a|b", "x&y", "`id`", "$HOME", "a<b", "a>b"] {
            let value = json!([bad]);
            assert!(
                normalize_string_list(&value, &[]).is_err(),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_flag_like_elements_require_whitelisting() {
        assert!(normalize_string_list(&json!(["-x"]), &[]).is_err());
        assert_eq!(
            normalize_string_list(&json!(["-x"]), &["-x"]).unwrap(),
            vec!["-x"]
        );
    }

    #[test]
    fn test_numbers_and_bools_are_stringified() {
        assert_eq!(
            normalize_string_list(&json!([1, true, "s"]), &[]).unwrap(),
            vec!["1", "true", "s"]
        );
    }

    #[test]
    fn test_non_list_shapes_are_rejected() {
        assert!(normalize_string_list(&json!({"k": "v"}), &[]).is_err());
        assert!(normalize_string_list(&json!(42), &[]).is_err());
    }

    #[test]
    fn test_optional_list() {
        assert!(normalize_optional_list(None, &[]).unwrap().is_empty());
        assert!(normalize_optional_list(Some(&json!(null)), &[]).unwrap().is_empty());
        assert_eq!(
            normalize_optional_list(Some(&json!("a")), &[]).unwrap(),
            vec!["a"]
        );
    }

    #[test]
    fn test_malformed_json_array_string_falls_back_to_split() {
        // Not valid JSON, still usable as a single bracketed term
        assert_eq!(
            normalize_string_list(&json!("[incomplete"), &[]).unwrap(),
            vec!["[incomplete"]
        );
    }
}
