//! Attribute value types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Typed value of a dynamic listing attribute.
///
/// Serialized untagged so attribute blobs stay plain JSON objects
/// (`{"year": 2019, "damaged": false}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl AttrValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Flat string form used in URLs and form submissions: numbers without
    /// a trailing `.0`, booleans as `true`/`false`.
    pub fn to_param(&self) -> String {
        match self {
            AttrValue::Text(s) => s.clone(),
            AttrValue::Number(n) => format_number(*n),
            AttrValue::Bool(b) => b.to_string(),
        }
    }

    /// Check whether this value equals a facet value given in string form.
    ///
    /// Text compares case-insensitively, numbers numerically and booleans
    /// through the same spellings a checkbox accepts.
    pub fn matches_param(&self, expected: &str) -> bool {
        match self {
            AttrValue::Text(s) => s.to_lowercase() == expected.trim().to_lowercase(),
            AttrValue::Number(n) => parse_number(expected).is_some_and(|e| e == *n),
            AttrValue::Bool(b) => parse_bool(expected) == Some(*b),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_param())
    }
}

/// Render a number the way a form would submit it.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Parse user-entered numbers; a comma is accepted as decimal separator.
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replace(' ', "").replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|n| n.is_finite())
}

pub(super) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "on" | "1" | "yes" | "tak" => Some(true),
        "false" | "off" | "0" | "no" | "nie" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_param_drops_integral_fraction() {
        assert_eq!(AttrValue::Number(2019.0).to_param(), "2019");
        assert_eq!(AttrValue::Number(1.5).to_param(), "1.5");
        assert_eq!(AttrValue::Bool(false).to_param(), "false");
    }

    #[test]
    fn test_parse_number_accepts_comma_and_spaces() {
        assert_eq!(parse_number("12,5"), Some(12.5));
        assert_eq!(parse_number(" 150 000 "), Some(150000.0));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn test_parse_bool_spellings() {
        assert_eq!(parse_bool("on"), Some(true));
        assert_eq!(parse_bool("NIE"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_matches_param_per_variant() {
        assert!(AttrValue::Text("Apple".into()).matches_param("apple"));
        assert!(AttrValue::Number(2019.0).matches_param("2019"));
        assert!(!AttrValue::Number(2019.0).matches_param("2018"));
        assert!(AttrValue::Bool(true).matches_param("true"));
        assert!(!AttrValue::Bool(true).matches_param("false"));
    }

    #[test]
    fn test_untagged_json_shape() {
        let values: Vec<AttrValue> = serde_json::from_str(r#"["Diesel", 180000, true]"#).unwrap();
        assert_eq!(
            values,
            vec![
                AttrValue::Text("Diesel".into()),
                AttrValue::Number(180000.0),
                AttrValue::Bool(true)
            ]
        );
    }
}
