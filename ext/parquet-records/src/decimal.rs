//! Fixed-point decimal rendering
//!
//! A decimal becomes a [`NormalizedValue::Number`] only when the f64 it parses
//! to prints back as the same digits. Everything else keeps its full digit
//! string.

use crate::value::{NormalizedValue, MAX_SAFE_INTEGER};
use num::{BigInt, ToPrimitive};

/// Render an unscaled integer and a scale as a plain decimal string
///
/// `format_decimal("-5", 2)` is `"-0.05"`, `format_decimal("12", -3)` is
/// `"12000"`.
pub fn format_decimal(unscaled: &str, scale: i8) -> String {
    let (sign, digits) = match unscaled.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", unscaled),
    };

    if scale <= 0 {
        if digits == "0" {
            return "0".to_string();
        }
        let zeros = "0".repeat(scale.unsigned_abs() as usize);
        return format!("{}{}{}", sign, digits, zeros);
    }

    let scale = scale as usize;
    let padded = if digits.len() <= scale {
        format!("{}{}", "0".repeat(scale + 1 - digits.len()), digits)
    } else {
        digits.to_string()
    };
    let (int_part, frac_part) = padded.split_at(padded.len() - scale);
    format!("{}{}.{}", sign, int_part, frac_part)
}

pub fn normalize_decimal128(unscaled: i128, scale: i8) -> NormalizedValue {
    normalize_digits(Some(unscaled), &unscaled.to_string(), scale)
}

pub fn normalize_decimal256(unscaled: &BigInt, scale: i8) -> NormalizedValue {
    normalize_digits(unscaled.to_i128(), &unscaled.to_string(), scale)
}

fn normalize_digits(small: Option<i128>, raw: &str, scale: i8) -> NormalizedValue {
    let text = format_decimal(raw, scale);
    let Some(unscaled) = small else {
        return NormalizedValue::IntegerString(text);
    };

    if scale <= 0 {
        let value = 10i128
            .checked_pow(u32::from(scale.unsigned_abs()))
            .and_then(|factor| unscaled.checked_mul(factor));
        return match value {
            Some(v) if v.unsigned_abs() <= MAX_SAFE_INTEGER as u128 => {
                NormalizedValue::Number(v as f64)
            }
            _ => NormalizedValue::IntegerString(text),
        };
    }

    if unscaled.unsigned_abs() > MAX_SAFE_INTEGER as u128 {
        return NormalizedValue::IntegerString(text);
    }

    match text.parse::<f64>() {
        Ok(n) if trim_fraction(&text) == trim_fraction(&n.to_string()) => {
            NormalizedValue::Number(n)
        }
        _ => NormalizedValue::IntegerString(text),
    }
}

/// Drop trailing fractional zeros so `1.10` and `1.1` compare equal
fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
