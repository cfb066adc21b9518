//! Format-parameter strings (`a=fmtp` configs, `a=rid` restrictions, imageattr sets)
//!
//! A parameter string is a `;`-separated list of `key=value` pairs, where a
//! bare `key` without `=` is present with no value:
//!
//! ```text
//! minptime=10; useinbandfec=1;stereo
//! ```
//!
//! Parsed parameters keep their original order so that re-serializing an
//! unmodified string yields the same key order.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use super::value::Value;

/// Ordered `key → value` parameter map. A `None` value is a bare key.
pub type Params = IndexMap<String, Option<Value>>;

static PARAM_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r";\s?").unwrap());

/// Parse a parameter string into an ordered map.
///
/// Pairs are separated by `;` optionally followed by one whitespace
/// character. Values are coerced like any other captured field.
///
/// # Examples
///
/// ```
/// use peerwire_sdp_core::sdp::{parse_params, Value};
///
/// let params = parse_params("minptime=10; useinbandfec=1;stereo");
/// assert_eq!(params["minptime"], Some(Value::Int(10)));
/// assert_eq!(params["useinbandfec"], Some(Value::Int(1)));
/// assert_eq!(params["stereo"], None);
/// ```
pub fn parse_params(text: &str) -> Params {
    let mut params = Params::new();
    for expr in PARAM_SEPARATOR.split(text) {
        insert_param(&mut params, expr);
    }
    params
}

/// Adds one `key=value` (or bare `key`) expression to `params`.
///
/// The split happens on the first `=` that is followed by at least one
/// character; `key=` is therefore a bare key named `key=`.
pub(crate) fn insert_param(params: &mut Params, expr: &str) {
    if expr.is_empty() {
        return;
    }
    match expr.find('=') {
        Some(idx) if idx + 1 < expr.len() => {
            params.insert(expr[..idx].to_string(), Some(Value::coerce(&expr[idx + 1..])));
        }
        _ => {
            params.insert(expr.to_string(), None);
        }
    }
}

/// Serialize a parameter map back into `key=value;key=value` form.
///
/// Bare keys are written without `=`.
///
/// # Examples
///
/// ```
/// use peerwire_sdp_core::sdp::{parse_params, write_config_params};
///
/// let params = parse_params("x-google-min-bitrate=500;stereo");
/// assert_eq!(write_config_params(&params), "x-google-min-bitrate=500;stereo");
/// ```
pub fn write_config_params(params: &Params) -> String {
    params
        .iter()
        .map(|(key, value)| match value {
            Some(value) => format!("{}={}", key, value),
            None => key.clone(),
        })
        .collect::<Vec<_>>()
        .join(";")
}

/// Overlay `overrides` onto `base`.
///
/// Keys already in `base` keep their position and take the override's value;
/// new keys are appended in the order `overrides` lists them.
pub fn merge_params(base: &Params, overrides: &Params) -> Params {
    let mut merged = base.clone();
    for (key, value) in overrides {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// A copy of `params` without the listed keys
pub fn without_params(params: &Params, keys: &[&str]) -> Params {
    params
        .iter()
        .filter(|(key, _)| !keys.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
