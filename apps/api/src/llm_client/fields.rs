//! Lenient readers for fields of model-generated JSON.
//!
//! Models drift between `85`, `85.0`, `"85"` and `"85%"`, or `true` and `"yes"`.
//! These helpers accept the common shapes and return `None` for anything else,
//! so callers can apply their own defaults.

use serde_json::Value;

/// Non-empty trimmed string. Numbers and booleans are stringified.
pub fn string(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// List of non-empty strings. A bare string becomes a one-element list.
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(|v| string(Some(v))).collect(),
        Some(v @ Value::String(_)) => string(Some(v)).into_iter().collect(),
        _ => Vec::new(),
    }
}

pub fn number(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

/// A 0–100 score, rounded and clamped.
pub fn score(value: Option<&Value>) -> Option<u8> {
    number(value).map(|n| n.round().clamp(0.0, 100.0) as u8)
}

pub fn boolean(value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" => Some(true),
            "false" | "no" | "n" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        _ => None,
    }
}
