//! Value formatting for free parameters.
//!
//! Only one format family is recognized: `V.<N>f` renders a numeric value
//! with exactly `<N>` decimal places. Any other spec, and any value that
//! does not parse as a number, passes through unchanged — formatting failure
//! is a named fallback, not an error, so free-text values never fail a
//! command that does not need numeric rendering.

use once_cell::sync::Lazy;
use regex::Regex;

static FORMAT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^V\.(\d+)f$").expect("valid regex"));

/// Apply a `V.<N>f` format spec to a raw value.
pub fn apply_format_spec(value: &str, format_spec: &str) -> String {
    let spec = format_spec.trim();
    if spec.is_empty() {
        return value.to_string();
    }
    let Some(caps) = FORMAT_RE.captures(spec) else {
        return value.to_string();
    };
    let Ok(decimals) = caps[1].parse::<usize>() else {
        return value.to_string();
    };
    match value.trim().parse::<f64>() {
        Ok(number) => format!("{number:.decimals$}"),
        Err(_) => value.to_string(),
    }
}
