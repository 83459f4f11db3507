//! Get-or-default accessors over `serde_json::Value`.
//!
//! A field that is absent, `null`, or of the wrong JSON type resolves to the
//! caller's default. None of these functions fail.

use serde_json::Value;

/// Walk nested object keys. Returns `None` as soon as a step is missing or
/// the current value is not an object.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |cur, key| cur.as_object()?.get(*key))
}

/// String at `path`, or `default`.
pub fn str_or(value: &Value, path: &[&str], default: &str) -> String {
    lookup(value, path)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

/// Number at `path` (integer or float), or `default`.
pub fn num_or(value: &Value, path: &[&str], default: f64) -> f64 {
    lookup(value, path).and_then(Value::as_f64).unwrap_or(default)
}

/// Array at `path`, or an empty slice.
pub fn array_or_empty<'a>(value: &'a Value, path: &[&str]) -> &'a [Value] {
    lookup(value, path)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
