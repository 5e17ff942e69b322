//! Parameter-specification parsing.
//!
//! A descriptor's raw parameter cell is a loosely structured string of
//! `|`-separated parts. Each part is either a bare name (free input),
//! `NAME:fmt` (free input with a format spec) or `NAME:A;B;C` (enumerated
//! options). An empty cell falls back to scanning the command template for
//! `{placeholder}` tokens.
//!
//! Stored names and options keep their original casing; comparisons against
//! them elsewhere are case-insensitive.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Matches one `{placeholder}` token. The body must be non-empty, so a bare
/// `{}` is not a placeholder.
pub(crate) static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^}]+)\}").expect("valid regex"));

/// How a parameter accepts its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    /// Arbitrary text, optionally rendered through a format spec.
    Free,
    /// One of an enumerated, ordered set of values.
    Options,
}

/// A parsed parameter definition.
///
/// Definitions are produced fresh on every lookup and never cached; their
/// order reflects left-to-right parse order and determines fallback
/// substitution order.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDef {
    /// Parameter name, original casing preserved.
    pub name: String,
    /// Free text or enumerated options.
    pub kind: ParamKind,
    /// Allowed values, in spec order (`Options` only).
    pub options: Vec<String>,
    /// Format spec such as `V.3f` (`Free` only; may be empty).
    pub format_spec: String,
}

impl ParamDef {
    fn free(name: impl Into<String>, format_spec: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Free,
            options: Vec::new(),
            format_spec: format_spec.into(),
        }
    }

    fn options(name: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Options,
            options,
            format_spec: String::new(),
        }
    }
}

/// Distinct placeholder names in template order, first occurrence wins.
pub fn placeholder_names(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for cap in PLACEHOLDER_RE.captures_iter(template) {
        let name = cap[1].trim().to_string();
        if !names.iter().any(|n| *n == name) {
            names.push(name);
        }
    }
    names
}

/// Parse a raw parameter cell against its command template.
///
/// An empty cell (or the literal `nan`/`none` a spreadsheet export leaves
/// behind) means the parameters are implied by the template's placeholders;
/// with no placeholders the command takes no parameters at all.
pub fn parse_param_defs(raw_spec: &str, template: &str) -> Vec<ParamDef> {
    let spec = raw_spec.trim();
    if spec.is_empty() || spec.eq_ignore_ascii_case("nan") || spec.eq_ignore_ascii_case("none") {
        return placeholder_names(template)
            .into_iter()
            .map(|name| ParamDef::free(name, ""))
            .collect();
    }

    let mut out = Vec::new();
    for part in spec.split('|') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        match part.split_once(':') {
            None => out.push(ParamDef::free(part, "")),
            Some((left, right)) => {
                let left = left.trim();
                let right = right.trim();
                if right.contains(';') {
                    let opts = right
                        .split(';')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(str::to_string)
                        .collect();
                    out.push(ParamDef::options(left, opts));
                } else {
                    out.push(ParamDef::free(left, right));
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_spec_falls_back_to_template_placeholders() {
        let defs = parse_param_defs("", "SET:FREQ {freq}");
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "freq");
        assert_eq!(defs[0].kind, ParamKind::Free);
        assert!(defs[0].format_spec.is_empty());
    }

    #[test]
    fn nan_and_none_mean_empty() {
        for spec in ["nan", "NaN", "none", "NONE"] {
            let defs = parse_param_defs(spec, "VOLT {value}");
            assert_eq!(defs.len(), 1, "spec {spec:?}");
            assert_eq!(defs[0].name, "value");
        }
    }

    #[test]
    fn no_spec_and_no_placeholders_means_no_parameters() {
        assert!(parse_param_defs("", "*RST").is_empty());
        assert!(parse_param_defs("  ", "SYST:ERR?").is_empty());
    }

    #[test]
    fn repeated_placeholders_yield_one_definition() {
        let defs = parse_param_defs("", "SOUR {ch}; MEAS {ch}?");
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "ch");
    }

    #[test]
    fn options_part_parses_in_order() {
        let defs = parse_param_defs("MODE:AUTO;MANUAL", "MODE {MODE}");
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "MODE");
        assert_eq!(defs[0].kind, ParamKind::Options);
        assert_eq!(defs[0].options, vec!["AUTO", "MANUAL"]);
    }

    #[test]
    fn format_spec_part_parses_as_free() {
        let defs = parse_param_defs("CURRENT:V.3f", "CURR {CURRENT}");
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "CURRENT");
        assert_eq!(defs[0].kind, ParamKind::Free);
        assert_eq!(defs[0].format_spec, "V.3f");
    }

    #[test]
    fn bare_part_is_free_without_format() {
        let defs = parse_param_defs("level", "LEV {level}");
        assert_eq!(defs[0].name, "level");
        assert_eq!(defs[0].kind, ParamKind::Free);
        assert!(defs[0].format_spec.is_empty());
    }

    #[test]
    fn empty_parts_between_pipes_are_dropped() {
        let defs = parse_param_defs("a||b|  |c", "X");
        let names: Vec<_> = defs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn part_order_is_preserved() {
        let defs = parse_param_defs("out:P6V;P25V|volts:V.3f|amps", "APPL {out} {volts} {amps}");
        assert_eq!(defs.len(), 3);
        assert_eq!(defs[0].kind, ParamKind::Options);
        assert_eq!(defs[1].format_spec, "V.3f");
        assert_eq!(defs[2].kind, ParamKind::Free);
    }

    #[test]
    fn empty_format_spec_after_colon_is_valid() {
        let defs = parse_param_defs("value:", "VOLT {value}");
        assert_eq!(defs[0].kind, ParamKind::Free);
        assert!(defs[0].format_spec.is_empty());
    }

    #[test]
    fn only_first_colon_splits_name_from_spec() {
        let defs = parse_param_defs("ratio:V.2f:extra", "R {ratio}");
        assert_eq!(defs[0].name, "ratio");
        assert_eq!(defs[0].format_spec, "V.2f:extra");
    }

    #[test]
    fn option_casing_is_preserved() {
        let defs = parse_param_defs("state:On;Off", "OUTP {state}");
        assert_eq!(defs[0].options, vec!["On", "Off"]);
    }
}
