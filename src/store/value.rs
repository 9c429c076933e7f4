//! Interpretation of raw state values
//!
//! States are loosely typed. These helpers give every caller the same notion
//! of truthiness, numbers and display text.

use serde_json::Value;

/// Truthiness of a raw value: `null`, `false`, `0`, `NaN` and `""` are false
pub fn is_truthy(val: &Value) -> bool {
    match val {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Truthiness of an optional value, absent counts as false
pub fn is_truthy_opt(val: Option<&Value>) -> bool {
    val.is_some_and(is_truthy)
}

/// Strictly numeric value
pub fn as_number(val: &Value) -> Option<f64> {
    match val {
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

/// Number or numeric string
pub fn as_numeric(val: &Value) -> Option<f64> {
    match val {
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        other => as_number(other),
    }
}

/// Display text of a raw value
///
/// Strings are unquoted and whole floats print without a fraction.
pub fn display(val: &Value) -> String {
    match val {
        Value::String(s) => s.clone(),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) => format_number(f),
            _ => n.to_string(),
        },
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Format a float without a trailing `.0` for whole values
pub fn format_number(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        format!("{}", f)
    }
}
