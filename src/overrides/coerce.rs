//! Numeric coercion of raw override values

use serde_yaml::Value;

/// Interpret `raw` as the most specific number it spells, else keep it as text.
///
/// Integers are tried before floats so `"3"` stays an integer while `"3.0"`
/// becomes a float. Integer text outside the 64-bit range is kept verbatim
/// rather than rounded through a float.
pub fn coerce(raw: &str) -> Value {
    let trimmed = raw.trim();

    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::Number(int.into());
    }
    if let Ok(int) = trimmed.parse::<u64>() {
        return Value::Number(int.into());
    }
    if is_integer_literal(trimmed) {
        return Value::String(raw.to_string());
    }
    if let Ok(float) = trimmed.parse::<f64>() {
        return Value::Number(float.into());
    }

    Value::String(raw.to_string())
}

fn is_integer_literal(text: &str) -> bool {
    let digits = text.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
