//! Command-string template substitution.
//!
//! Turns a descriptor's template plus supplied values into the literal
//! command string sent over the bus. Values travel in an insertion-ordered
//! [`ValueMap`], which makes the leftover-placeholder fallback deterministic:
//! when a template still contains `{...}` tokens after all named
//! substitutions, every remaining token is replaced with the first supplied
//! value. The fallback is best-effort repair for hand-edited tables, not a
//! correctness guarantee.

use crate::catalog::format::apply_format_spec;
use crate::catalog::params::{ParamDef, ParamKind, PLACEHOLDER_RE};
use crate::error::{BenchError, BenchResult};

/// Insertion-ordered `name -> value` map of supplied parameter values.
#[derive(Debug, Clone, Default)]
pub struct ValueMap {
    entries: Vec<(String, String)>,
}

impl ValueMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value. An existing entry with the same name is replaced in
    /// place, keeping its original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    /// Value for an exact parameter name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// First supplied value, if any.
    pub fn first_value(&self) -> Option<&str> {
        self.entries.first().map(|(_, v)| v.as_str())
    }

    /// Whether no values were supplied.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of supplied values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for ValueMap {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut map = ValueMap::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

/// Render a catalog command template with the supplied values.
///
/// Applied identically for GET and SET. With no parameter definitions the
/// trimmed template is returned verbatim; otherwise every definition must
/// have a non-blank value or the render fails with
/// [`BenchError::MissingValue`] before anything reaches the bus. Free values
/// pass through their format spec; each value replaces every literal
/// `{name}` token for its parameter.
pub fn render_command(
    template: &str,
    defs: &[ParamDef],
    values: &ValueMap,
) -> BenchResult<String> {
    let mut cmd = template.trim().to_string();
    if defs.is_empty() {
        return Ok(cmd);
    }

    for def in defs {
        let supplied = values
            .get(&def.name)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| BenchError::MissingValue(def.name.clone()))?;

        let value = match def.kind {
            ParamKind::Free => apply_format_spec(supplied, &def.format_spec),
            ParamKind::Options => supplied.to_string(),
        };
        cmd = cmd.replace(&format!("{{{}}}", def.name), &value);
    }

    // Leftover tokens mean the template and the parameter table disagree;
    // fill them all with the first supplied value.
    if PLACEHOLDER_RE.is_match(&cmd) {
        if let Some(first) = values.first_value() {
            let first = first.trim().to_string();
            cmd = PLACEHOLDER_RE
                .replace_all(&cmd, regex::NoExpand(&first))
                .into_owned();
        }
    }

    Ok(cmd)
}

/// Fill an ad-hoc (non-cataloged) command template with one value.
///
/// `{value}` is substituted literally; a positional `{}` takes the value
/// next; otherwise any `{...}` tokens are all replaced; with no insertion
/// point at all the value is appended after one space.
pub fn fill_single_value(template: &str, value: &str) -> String {
    let template = template.trim();
    let value = value.trim();

    if template.contains("{value}") {
        return template.replace("{value}", value);
    }
    if template.contains("{}") {
        return template.replacen("{}", value, 1).trim().to_string();
    }
    if PLACEHOLDER_RE.is_match(template) {
        return PLACEHOLDER_RE
            .replace_all(template, regex::NoExpand(value))
            .trim()
            .to_string();
    }
    format!("{template} {value}").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::params::parse_param_defs;

    fn values(pairs: &[(&str, &str)]) -> ValueMap {
        pairs.iter().copied().collect()
    }

    #[test]
    fn free_value_substitutes_and_formats() {
        let defs = parse_param_defs("value:V.3f", "VOLT {value}");
        let cmd = render_command("VOLT {value}", &defs, &values(&[("value", "1.5")])).unwrap();
        assert_eq!(cmd, "VOLT 1.500");
        assert!(!PLACEHOLDER_RE.is_match(&cmd));
    }

    #[test]
    fn no_defs_returns_template_verbatim() {
        let cmd = render_command("  *RST  ", &[], &ValueMap::new()).unwrap();
        assert_eq!(cmd, "*RST");
    }

    #[test]
    fn missing_value_fails_before_substitution() {
        let defs = parse_param_defs("freq", "FREQ {freq}");
        let err = render_command("FREQ {freq}", &defs, &ValueMap::new()).unwrap_err();
        assert!(matches!(err, BenchError::MissingValue(name) if name == "freq"));
    }

    #[test]
    fn blank_value_counts_as_missing() {
        let defs = parse_param_defs("freq", "FREQ {freq}");
        let err = render_command("FREQ {freq}", &defs, &values(&[("freq", "   ")])).unwrap_err();
        assert!(matches!(err, BenchError::MissingValue(_)));
    }

    #[test]
    fn options_value_substitutes_without_formatting() {
        let defs = parse_param_defs("state:ON;OFF", "OUTP {state}");
        let cmd = render_command("OUTP {state}", &defs, &values(&[("state", "ON")])).unwrap();
        assert_eq!(cmd, "OUTP ON");
    }

    #[test]
    fn every_occurrence_of_a_named_token_is_replaced() {
        let defs = parse_param_defs("ch", "ROUT {ch}; READ {ch}?");
        let cmd = render_command("ROUT {ch}; READ {ch}?", &defs, &values(&[("ch", "2")])).unwrap();
        assert_eq!(cmd, "ROUT 2; READ 2?");
    }

    #[test]
    fn leftover_placeholders_take_first_supplied_value() {
        // The table names the parameter "level" but the template says "lvl":
        // the named pass misses, the fallback fills with the first value.
        let defs = parse_param_defs("level", "PULS:LEV {lvl}");
        let cmd =
            render_command("PULS:LEV {lvl}", &defs, &values(&[("level", "0.7")])).unwrap();
        assert_eq!(cmd, "PULS:LEV 0.7");
    }

    #[test]
    fn fallback_uses_supplied_order_not_parse_order() {
        let defs = parse_param_defs("a|b", "X {a} {b} {c}");
        let map = values(&[("b", "2"), ("a", "1")]);
        let cmd = render_command("X {a} {b} {c}", &defs, &map).unwrap();
        // {c} has no named match; the first *supplied* value is b's.
        assert_eq!(cmd, "X 1 2 2");
    }

    #[test]
    fn value_map_insert_replaces_in_place() {
        let mut map = values(&[("a", "1"), ("b", "2")]);
        map.insert("a", "9");
        assert_eq!(map.get("a"), Some("9"));
        assert_eq!(map.first_value(), Some("9"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn fill_single_value_prefers_value_token() {
        assert_eq!(fill_single_value("VOLT {value}", "3.3"), "VOLT 3.3");
    }

    #[test]
    fn fill_single_value_takes_positional_brace_pair() {
        assert_eq!(fill_single_value("CURR {}", "0.5"), "CURR 0.5");
    }

    #[test]
    fn fill_single_value_replaces_any_named_token() {
        assert_eq!(fill_single_value("FREQ {f} {f}", "1000"), "FREQ 1000 1000");
    }

    #[test]
    fn fill_single_value_appends_when_no_tokens() {
        assert_eq!(fill_single_value("OUTP", "ON"), "OUTP ON");
        assert_eq!(fill_single_value("  OUTP  ", " ON "), "OUTP ON");
    }
}
