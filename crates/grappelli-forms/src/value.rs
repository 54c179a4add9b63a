//! Value coercion used by the rule checks.
//!
//! Form values arrive from input bindings as loosely typed JSON, so the checks
//! coerce them the way a browser form would: numbers are parsed out of
//! strings, patterns run against the textual form, and anything without a
//! length simply has no length constraint to violate.

use serde_json::Value;
use std::borrow::Cow;

/// Missing, `null` or the empty string.
///
/// Non-required rules are skipped for blank values.
pub(crate) fn is_blank(value: Option<&Value>) -> bool {
	match value {
		None | Some(Value::Null) => true,
		Some(Value::String(s)) => s.is_empty(),
		_ => false,
	}
}

/// Blank, or an empty sequence. Used by the `required` check only.
pub(crate) fn is_missing(value: Option<&Value>) -> bool {
	match value {
		Some(Value::Array(items)) => items.is_empty(),
		other => is_blank(other),
	}
}

/// Browser truthiness; falsy values seed new fields with `""`.
pub(crate) fn is_falsy(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::Bool(b) => !b,
		Value::Number(n) => n.as_f64().is_none_or(|f| f == 0.0 || f.is_nan()),
		Value::String(s) => s.is_empty(),
		Value::Array(_) | Value::Object(_) => false,
	}
}

/// Character count for strings, element count for arrays.
pub(crate) fn length_of(value: &Value) -> Option<usize> {
	match value {
		Value::String(s) => Some(s.chars().count()),
		Value::Array(items) => Some(items.len()),
		_ => None,
	}
}

/// Numeric coercion. Unparseable input yields NaN, which fails every
/// comparison and therefore never trips a min/max check.
pub(crate) fn to_number(value: &Value) -> f64 {
	match value {
		Value::Null => 0.0,
		Value::Bool(b) => f64::from(u8::from(*b)),
		Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
		Value::String(s) => parse_number(s),
		Value::Array(items) => match items.as_slice() {
			[] => 0.0,
			[single] => to_number(single),
			_ => f64::NAN,
		},
		Value::Object(_) => f64::NAN,
	}
}

fn parse_number(raw: &str) -> f64 {
	let s = raw.trim();
	if s.is_empty() {
		return 0.0;
	}
	match s {
		"Infinity" | "+Infinity" => return f64::INFINITY,
		"-Infinity" => return f64::NEG_INFINITY,
		_ => {}
	}
	let radix = match s.get(..2) {
		Some("0x") | Some("0X") => Some(16),
		Some("0o") | Some("0O") => Some(8),
		Some("0b") | Some("0B") => Some(2),
		_ => None,
	};
	if let Some(radix) = radix {
		return u64::from_str_radix(&s[2..], radix)
			.map(|n| n as f64)
			.unwrap_or(f64::NAN);
	}
	// `f64::from_str` accepts "inf" and "nan", which a form input must not.
	if !s
		.chars()
		.all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
	{
		return f64::NAN;
	}
	s.parse::<f64>().unwrap_or(f64::NAN)
}

/// Textual form of a value, as a pattern test would see it.
pub(crate) fn to_text(value: &Value) -> Cow<'_, str> {
	match value {
		Value::String(s) => Cow::Borrowed(s.as_str()),
		Value::Null => Cow::Borrowed("null"),
		Value::Bool(true) => Cow::Borrowed("true"),
		Value::Bool(false) => Cow::Borrowed("false"),
		Value::Number(n) => match (n.as_i64(), n.as_u64()) {
			(Some(i), _) => Cow::Owned(i.to_string()),
			(None, Some(u)) => Cow::Owned(u.to_string()),
			_ => Cow::Owned(format_number(n.as_f64().unwrap_or(f64::NAN))),
		},
		Value::Array(items) => Cow::Owned(
			items
				.iter()
				.map(|item| match item {
					Value::Null => Cow::Borrowed(""),
					other => to_text(other),
				})
				.collect::<Vec<_>>()
				.join(","),
		),
		Value::Object(_) => Cow::Borrowed("[object Object]"),
	}
}

/// Formats a number the way a browser stringifies it: `5`, not `5.0`, and
/// exponent notation (`1e+21`, `1e-7`) outside `1e-6 <= |n| < 1e21`.
pub(crate) fn format_number(n: f64) -> String {
	if n.is_nan() {
		"NaN".to_string()
	} else if n.is_infinite() {
		let sign = if n > 0.0 { "" } else { "-" };
		format!("{}Infinity", sign)
	} else if n == 0.0 {
		"0".to_string()
	} else if n.abs() >= 1e21 || n.abs() < 1e-6 {
		let formatted = format!("{:e}", n);
		match formatted.split_once('e') {
			Some((mantissa, exponent)) if !exponent.starts_with('-') => {
				format!("{}e+{}", mantissa, exponent)
			}
			_ => formatted,
		}
	} else if n.fract() == 0.0 {
		format!("{:.0}", n)
	} else {
		n.to_string()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(None, true)]
	#[case(Some(json!(null)), true)]
	#[case(Some(json!("")), true)]
	#[case(Some(json!([])), false)]
	#[case(Some(json!(0)), false)]
	#[case(Some(json!(" ")), false)]
	fn test_is_blank(#[case] value: Option<Value>, #[case] expected: bool) {
		assert_eq!(is_blank(value.as_ref()), expected);
	}

	#[rstest]
	fn test_is_missing_treats_empty_array_as_missing() {
		assert!(is_missing(Some(&json!([]))));
		assert!(!is_missing(Some(&json!(["a"]))));
		assert!(is_missing(None));
	}

	#[rstest]
	#[case(json!(0), true)]
	#[case(json!(false), true)]
	#[case(json!(""), true)]
	#[case(json!(null), true)]
	#[case(json!("0"), false)]
	#[case(json!([]), false)]
	#[case(json!(1.5), false)]
	fn test_is_falsy(#[case] value: Value, #[case] expected: bool) {
		assert_eq!(is_falsy(&value), expected);
	}

	#[rstest]
	fn test_length_counts_chars_not_bytes() {
		assert_eq!(length_of(&json!("héllo")), Some(5));
		assert_eq!(length_of(&json!([1, 2])), Some(2));
		assert_eq!(length_of(&json!(12345)), None);
	}

	#[rstest]
	#[case(json!("42"), 42.0)]
	#[case(json!(" 7 "), 7.0)]
	#[case(json!(""), 0.0)]
	#[case(json!(null), 0.0)]
	#[case(json!(true), 1.0)]
	#[case(json!("0x10"), 16.0)]
	#[case(json!("1e3"), 1000.0)]
	#[case(json!(["3"]), 3.0)]
	fn test_to_number(#[case] value: Value, #[case] expected: f64) {
		assert_eq!(to_number(&value), expected);
	}

	#[rstest]
	#[case(json!("abc"))]
	#[case(json!("inf"))]
	#[case(json!("nan"))]
	#[case(json!({"a": 1}))]
	#[case(json!([1, 2]))]
	fn test_to_number_nan(#[case] value: Value) {
		assert!(to_number(&value).is_nan());
	}

	#[rstest]
	fn test_to_text() {
		assert_eq!(to_text(&json!("x")), "x");
		assert_eq!(to_text(&json!(12)), "12");
		assert_eq!(to_text(&json!(1.5)), "1.5");
		assert_eq!(to_text(&json!(1e21)), "1e+21");
		assert_eq!(to_text(&json!(1e-7)), "1e-7");
		assert_eq!(to_text(&json!(["a", null, 2])), "a,,2");
		assert_eq!(to_text(&json!({})), "[object Object]");
	}

	#[rstest]
	#[case(5.0, "5")]
	#[case(-0.0, "0")]
	#[case(2.5, "2.5")]
	#[case(1e6, "1000000")]
	#[case(f64::INFINITY, "Infinity")]
	#[case(1e20, "100000000000000000000")]
	#[case(1e21, "1e+21")]
	#[case(-2.5e22, "-2.5e+22")]
	#[case(0.000001, "0.000001")]
	#[case(1e-7, "1e-7")]
	#[case(1.5e-7, "1.5e-7")]
	fn test_format_number(#[case] n: f64, #[case] expected: &str) {
		assert_eq!(format_number(n), expected);
	}
}
