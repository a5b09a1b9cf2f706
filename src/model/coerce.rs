//! Lenient accessors for untrusted JSON.
//!
//! The API does not always honour its declared shapes: lists arrive as objects,
//! counts arrive as strings, fields go missing. These helpers never fail; they fall
//! back to an empty list, zero, or `None` and log what they replaced.

use serde_json::{Map, Value};
use tracing::warn;

/// Borrow `value` as a list. Missing or `null` gives an empty slice silently; any other
/// non-array gives an empty slice with a warning naming `context`.
pub fn as_list<'a>(value: Option<&'a Value>, context: &str) -> &'a [Value] {
    match value {
        Some(Value::Array(items)) => items.as_slice(),
        None | Some(Value::Null) => &[],
        Some(other) => {
            warn!("Expected a list for {}, got {}", context, kind(other));
            &[]
        }
    }
}

/// Borrow `value` as an object, warning when something else is present.
pub fn as_object<'a>(value: Option<&'a Value>, context: &str) -> Option<&'a Map<String, Value>> {
    match value {
        Some(Value::Object(map)) => Some(map),
        None | Some(Value::Null) => None,
        Some(other) => {
            warn!("Expected an object for {}, got {}", context, kind(other));
            None
        }
    }
}

/// Numeric value of `value`, or `None` when it is absent or not numeric.
///
/// Numeric strings (`"12"`, `" 0.5 "`) are accepted. Non-finite results are rejected.
pub fn as_f64_opt(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// Numeric value of `value` with a zero fallback.
pub fn as_f64(value: Option<&Value>) -> f64 {
    as_f64_opt(value).unwrap_or(0.0)
}

/// Non-negative count with a zero fallback. Fractional counts are rounded.
pub fn as_count(value: Option<&Value>) -> u64 {
    let number = as_f64(value);
    if number <= 0.0 {
        0
    } else {
        number.round() as u64
    }
}

/// Text form of `value`. Numbers are rendered so numeric ids still work.
pub fn as_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Non-empty text form of `value`.
pub fn as_non_empty_string(value: Option<&Value>) -> Option<String> {
    as_string(value).filter(|s| !s.trim().is_empty())
}

/// Truthiness the way the API means it: `true`, `"true"`, `"yes"` or a non-zero number.
pub fn as_bool(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "1"),
        _ => false,
    }
}

/// Strings of a list, skipping entries that are not text.
pub fn as_string_list(value: Option<&Value>, context: &str) -> Vec<String> {
    as_list(value, context)
        .iter()
        .filter_map(|item| as_non_empty_string(Some(item)))
        .collect()
}

/// `{name: count}` object as ordered pairs. Non-objects give an empty list.
pub fn as_count_map(value: Option<&Value>, context: &str) -> Vec<(String, u64)> {
    as_object(value, context)
        .map(|map| {
            map.iter()
                .map(|(name, count)| (name.clone(), as_count(Some(count))))
                .collect()
        })
        .unwrap_or_default()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_mismatch_is_empty() {
        let payload = json!({ "financing": "not-an-array", "workforce": [1, 2] });
        assert!(as_list(payload.get("financing"), "financing").is_empty());
        assert!(as_list(payload.get("missing"), "missing").is_empty());
        assert_eq!(as_list(payload.get("workforce"), "workforce").len(), 2);
    }

    #[test]
    fn test_numbers_that_might_be_strings() {
        assert_eq!(as_f64(Some(&json!("0.25"))), 0.25);
        assert_eq!(as_f64(Some(&json!("n/a"))), 0.0);
        assert_eq!(as_f64(Some(&json!(null))), 0.0);
        assert_eq!(as_f64(None), 0.0);
        assert_eq!(as_f64(Some(&json!([1]))), 0.0);
        assert_eq!(as_count(Some(&json!(-4))), 0);
        assert_eq!(as_count(Some(&json!("12"))), 12);
        assert_eq!(as_count(Some(&json!(2.6))), 3);
    }

    #[test]
    fn test_strings_and_bools() {
        assert_eq!(as_string(Some(&json!(42))), Some("42".to_string()));
        assert_eq!(as_non_empty_string(Some(&json!("  "))), None);
        assert!(as_bool(Some(&json!("true"))));
        assert!(as_bool(Some(&json!(1))));
        assert!(!as_bool(Some(&json!("no"))));
        assert!(!as_bool(None));
    }

    #[test]
    fn test_count_map_keeps_server_order() {
        let payload = json!({ "zeta": 3, "alpha": "5", "mid": null });
        assert_eq!(
            as_count_map(Some(&payload), "counts"),
            vec![
                ("zeta".to_string(), 3),
                ("alpha".to_string(), 5),
                ("mid".to_string(), 0)
            ]
        );
        assert!(as_count_map(Some(&json!([1, 2])), "counts").is_empty());
    }
}
