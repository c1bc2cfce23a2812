//! Canonical JSON encoding
//!
//! The encoding the manifest hash is computed over. Object keys are sorted by
//! code point, separators are `", "` and `": "`, and every character outside
//! printable ASCII is written as a `\uXXXX` escape. Floats use the shortest
//! round-trip digits with the exponent rules of the host scripting runtime, so
//! a hash written by either side is accepted by the other.

use serde_json::{Number, Value};
use std::fmt::Write;

/// Encode a value canonically
#[must_use]
pub fn to_string(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(n) => write_number(out, n),
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => {
            // Map iteration order depends on serde_json features; sort explicitly.
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_string(out, key);
                out.push_str(": ");
                write_value(out, item);
            }
            out.push('}');
        }
    }
}

/// Integers are written from their source digits at any magnitude, with `-0`
/// read as `0`. Anything with a fraction or exponent is a float.
fn write_number(out: &mut String, n: &Number) {
    let text = n.to_string();
    let digits = text.strip_prefix('-').unwrap_or(&text);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        if digits.bytes().all(|b| b == b'0') {
            out.push('0');
        } else {
            out.push_str(&text);
        }
    } else if let Some(f) = n.as_f64() {
        out.push_str(&float_repr(f));
    }
}

/// Shortest round-trip float text: fixed notation for decimal exponents in
/// `-4..16`, otherwise `d.ddde±XX`.
fn float_repr(f: f64) -> String {
    let sci = format!("{f:e}");
    let (sign, sci) = match sci.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", sci.as_str()),
    };
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return format!("{sign}{sci}");
    };
    let exp: i32 = exp.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();

    let body = if (-4..16).contains(&exp) {
        if exp < 0 {
            let zeros = "0".repeat(usize::try_from(-exp - 1).unwrap_or(0));
            format!("0.{zeros}{digits}")
        } else {
            let point = usize::try_from(exp + 1).unwrap_or(1);
            if digits.len() > point {
                format!("{}.{}", &digits[..point], &digits[point..])
            } else {
                format!("{digits}{}.0", "0".repeat(point - digits.len()))
            }
        }
    } else {
        let (head, tail) = digits.split_at(1);
        let frac = if tail.is_empty() {
            String::new()
        } else {
            format!(".{tail}")
        };
        let exp_sign = if exp < 0 { '-' } else { '+' };
        format!("{head}{frac}e{exp_sign}{:02}", exp.abs())
    };
    format!("{sign}{body}")
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            ' '..='~' => out.push(c),
            _ => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    let _ = write!(out, "\\u{unit:04x}");
                }
            }
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn objects_sorted_with_spaced_separators() {
        let value = json!({"type": "3d", "id": "abc", "path": ["3d", "rock"]});
        assert_eq!(
            to_string(&value),
            r#"{"id": "abc", "path": ["3d", "rock"], "type": "3d"}"#
        );
    }

    #[test]
    fn empty_containers() {
        assert_eq!(to_string(&json!({})), "{}");
        assert_eq!(to_string(&json!([])), "[]");
        assert_eq!(to_string(&json!({"a": [], "b": {}})), r#"{"a": [], "b": {}}"#);
    }

    #[test]
    fn non_ascii_is_escaped() {
        assert_eq!(to_string(&json!("Café")), r#""Caf\u00e9""#);
        assert_eq!(to_string(&json!("🌲")), r#""\ud83c\udf32""#);
        assert_eq!(to_string(&json!("\u{7f}")), r#""\u007f""#);
    }

    #[test]
    fn control_characters() {
        assert_eq!(to_string(&json!("a\nb\t\"c\"\\")), r#""a\nb\t\"c\"\\""#);
        assert_eq!(to_string(&json!("\u{1}")), r#""\u0001""#);
        assert_eq!(to_string(&json!("a/b")), r#""a/b""#);
    }

    #[test]
    fn integers_verbatim() {
        assert_eq!(
            to_string(&json!([0, -3, 18_446_744_073_709_551_615u64])),
            "[0, -3, 18446744073709551615]"
        );
    }

    #[test]
    fn integers_beyond_u64_keep_their_digits() {
        let value: Value =
            serde_json::from_str("[18446744073709551616, -123456789012345678901234567890]").unwrap();
        assert_eq!(
            to_string(&value),
            "[18446744073709551616, -123456789012345678901234567890]"
        );
    }

    #[test]
    fn negative_zero_integer_versus_float() {
        let value: Value = serde_json::from_str("[-0, -0.0, 0.0, 1e2, 1e-5]").unwrap();
        assert_eq!(to_string(&value), "[0, -0.0, 0.0, 100.0, 1e-05]");
    }

    #[test]
    fn floats_from_source_text() {
        let value: Value = serde_json::from_str("[0.1, 1e16, 123456789.125, -2.50]").unwrap();
        assert_eq!(to_string(&value), "[0.1, 1e+16, 123456789.125, -2.5]");
    }

    #[test]
    fn float_text() {
        assert_eq!(float_repr(1.0), "1.0");
        assert_eq!(float_repr(0.0), "0.0");
        assert_eq!(float_repr(-0.0), "-0.0");
        assert_eq!(float_repr(0.1), "0.1");
        assert_eq!(float_repr(100.0), "100.0");
        assert_eq!(float_repr(123.456), "123.456");
        assert_eq!(float_repr(0.001), "0.001");
        assert_eq!(float_repr(0.0001), "0.0001");
        assert_eq!(float_repr(0.000_01), "1e-05");
        assert_eq!(float_repr(1.5e-7), "1.5e-07");
        assert_eq!(float_repr(1e16), "1e+16");
        assert_eq!(float_repr(-2.5e300), "-2.5e+300");
    }
}
