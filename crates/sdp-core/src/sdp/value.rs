//! Field values captured from SDP lines
//!
//! Every field captured by a grammar rule goes through the same coercion: a
//! canonical all-digit token becomes an integer, everything else is kept as
//! text. The coercion is deliberately narrow so that tokens such as `0123`
//! (a valid ICE ufrag) or `29.97` survive a parse/write cycle byte for byte.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single captured field value
///
/// Serialized untagged, so a parsed document renders as plain JSON numbers
/// and strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// An all-digit token
    Int(i64),
    /// Anything else, verbatim
    Text(String),
}

impl Value {
    /// Coerce a raw token into a value.
    ///
    /// # Examples
    ///
    /// ```
    /// use peerwire_sdp_core::sdp::Value;
    ///
    /// assert_eq!(Value::coerce("20"), Value::Int(20));
    /// assert_eq!(Value::coerce("1a"), Value::Text("1a".to_string()));
    /// assert_eq!(Value::coerce("007"), Value::Text("007".to_string()));
    /// ```
    pub fn coerce(raw: &str) -> Self {
        if is_canonical_integer(raw) {
            if let Ok(n) = raw.parse::<i64>() {
                return Value::Int(n);
            }
        }
        Value::Text(raw.to_string())
    }

    /// Returns the integer if this is an `Int`
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    /// Returns the text if this is a `Text`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Int(_) => None,
        }
    }

    /// Returns true for an empty `Text`
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Text(s) if s.is_empty())
    }

    /// Renders the value the way `%d` does.
    ///
    /// Integers and numeric text are emitted verbatim, empty text becomes `0`,
    /// and anything that is not a number becomes `NaN`.
    pub(crate) fn to_number_string(&self) -> String {
        match self {
            Value::Int(n) => n.to_string(),
            Value::Text(s) if s.is_empty() => "0".to_string(),
            Value::Text(s) if is_numeric_literal(s) => s.clone(),
            Value::Text(_) => "NaN".to_string(),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Text(String::new())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        match self {
            Value::Text(s) => s == other,
            Value::Int(n) => n.to_string() == other,
        }
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        matches!(self, Value::Int(n) if n == other)
    }
}

/// `0`, or a run of ASCII digits without a leading zero
fn is_canonical_integer(raw: &str) -> bool {
    match raw.as_bytes() {
        [] => false,
        [b'0'] => true,
        [b'0', ..] => false,
        bytes => bytes.iter().all(u8::is_ascii_digit),
    }
}

/// Optional sign, digits, optional fraction
fn is_numeric_literal(raw: &str) -> bool {
    let unsigned = raw.strip_prefix('-').unwrap_or(raw);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };
    !int_part.is_empty()
        && int_part.bytes().all(|b| b.is_ascii_digit())
        && frac_part.map_or(true, |f| !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_digits() {
        assert_eq!(Value::coerce("0"), Value::Int(0));
        assert_eq!(Value::coerce("20"), Value::Int(20));
        assert_eq!(Value::coerce("4611731400430051336"), Value::Int(4611731400430051336));
    }

    #[test]
    fn test_coerce_keeps_text() {
        assert_eq!(Value::coerce(""), Value::Text(String::new()));
        assert_eq!(Value::coerce("1a"), Value::Text("1a".into()));
        assert_eq!(Value::coerce("0123"), Value::Text("0123".into()));
        assert_eq!(Value::coerce("-5"), Value::Text("-5".into()));
        assert_eq!(Value::coerce("29.97"), Value::Text("29.97".into()));
        // Does not fit in i64
        assert_eq!(
            Value::coerce("99999999999999999999"),
            Value::Text("99999999999999999999".into())
        );
    }

    #[test]
    fn test_number_rendering() {
        assert_eq!(Value::Int(42).to_number_string(), "42");
        assert_eq!(Value::from("29.97").to_number_string(), "29.97");
        assert_eq!(Value::from("").to_number_string(), "0");
        assert_eq!(Value::from("*").to_number_string(), "NaN");
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(Value::from("opus"), "opus");
        assert_eq!(Value::Int(111), 111);
        assert!(Value::Int(111) == "111");
        assert!(Value::from("111") != 111);
    }

    #[test]
    fn test_serde_untagged() {
        let json = serde_json::to_string(&vec![Value::Int(1), Value::from("a")]).unwrap();
        assert_eq!(json, r#"[1,"a"]"#);
        let back: Vec<Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![Value::Int(1), Value::from("a")]);
    }
}
