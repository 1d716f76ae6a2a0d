//! Tolerant value equality used by categorical, range and time filters.
//!
//! Matching is a fixed three-step cascade:
//! 1. exact equality (`NaN` never matches anything),
//! 2. numeric-coerced equality (`5` matches `"5"`, `true` matches `1`),
//! 3. prefix-stripped equality, where a `word_123` string on either side is compared by its
//!    trailing digits (`"origin_55"` matches `55`).

use linkboard_model::Value;
use regex::Regex;
use std::sync::OnceLock;

fn prefixed_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z]+_(\d+)$").expect("valid regex"))
}

/// The numeric suffix of a `word_123` text value.
fn strip_prefix(value: &Value) -> Option<&str> {
    let text = value.as_str()?;
    let captures = prefixed_id_regex().captures(text)?;
    captures.get(1).map(|m| m.as_str())
}

fn exact_eq(a: &Value, b: &Value) -> bool {
    !a.is_nan() && a == b
}

fn coerced_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Text(x), Value::Text(y)) => x == y,
        _ => match (a.coerce_number(), b.coerce_number()) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        },
    }
}

fn prefix_stripped_eq(a: &Value, b: &Value) -> bool {
    if let Some(digits) = strip_prefix(a) {
        if digits == b.to_string() {
            return true;
        }
    }
    if let Some(digits) = strip_prefix(b) {
        if a.to_string() == digits {
            return true;
        }
    }
    false
}

/// Whether a cell value and a filter value are considered equal.
pub fn values_match(cell: &Value, filter_value: &Value) -> bool {
    exact_eq(cell, filter_value)
        || coerced_eq(cell, filter_value)
        || prefix_stripped_eq(cell, filter_value)
}
