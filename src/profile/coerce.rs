//! Lenient amount parsing
//!
//! Salary slips and AI replies write amounts in many shapes ("₹ 1,20,000",
//! "Rs. 2400", "1.5e5", 40000.0). Everything here returns `None` instead of an
//! error so callers can substitute a default.

use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use tracing::debug;

/// Largest amount accepted (10^15). Anything above is treated as unreadable,
/// which keeps annualizing and summing deductions far from `Decimal::MAX`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Currency markers stripped from the front of an amount. "Rs." precedes "Rs".
const CURRENCY_MARKERS: [&str; 4] = ["INR", "Rs.", "Rs", "₹"];

/// Parse a non-negative amount from free text.
///
/// Thousands separators (`,`, `_`, spaces) and a leading currency marker are
/// ignored. Empty, non-numeric, negative and out-of-range inputs yield `None`.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let mut text = raw.trim();
    for marker in CURRENCY_MARKERS {
        if let Some(rest) = strip_prefix_ignore_case(text, marker) {
            text = rest.trim_start();
            break;
        }
    }

    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let parsed = if cleaned.contains(['e', 'E']) {
        Decimal::from_scientific(&cleaned)
    } else {
        Decimal::from_str(&cleaned)
    };

    match parsed {
        Ok(value) => accept(value).or_else(|| {
            debug!("Ignoring out-of-range amount {:?}", raw);
            None
        }),
        Err(_) => {
            debug!("Ignoring unreadable amount {:?}", raw);
            None
        }
    }
}

/// Keep values in `0..=MAX_AMOUNT`; `-0` reads as zero
fn accept(value: Decimal) -> Option<Decimal> {
    if value.is_zero() {
        return Some(Decimal::ZERO);
    }
    if value.is_sign_negative() || value > MAX_AMOUNT {
        return None;
    }
    Some(value.normalize())
}

/// Read an amount from a JSON value (string, number or null)
pub fn amount_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => parse_amount(s),
        Value::Number(n) => {
            let amount = if let Some(i) = n.as_u64() {
                Some(Decimal::from(i))
            } else if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else {
                n.as_f64().and_then(|f| Decimal::try_from(f).ok())
            };
            amount.and_then(accept)
        }
        _ => None,
    }
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        text.get(prefix.len()..)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_plain_and_decimal_amounts() {
        assert_eq!(parse_amount("800000"), Some(dec!(800000)));
        assert_eq!(parse_amount("  2400.50 "), Some(dec!(2400.50)));
        assert_eq!(parse_amount("0"), Some(Decimal::ZERO));
    }

    #[test]
    fn test_indian_grouping_and_currency_markers() {
        assert_eq!(parse_amount("1,20,000"), Some(dec!(120000)));
        assert_eq!(parse_amount("₹ 45,000"), Some(dec!(45000)));
        assert_eq!(parse_amount("Rs. 2,400"), Some(dec!(2400)));
        assert_eq!(parse_amount("rs 15000"), Some(dec!(15000)));
        assert_eq!(parse_amount("INR 1 000"), Some(dec!(1000)));
    }

    #[test]
    fn test_scientific_notation() {
        assert_eq!(parse_amount("1.5e5"), Some(dec!(150000)));
    }

    #[test]
    fn test_unreadable_amounts_are_none() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("   "), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("12abc"), None);
        assert_eq!(parse_amount("₹"), None);
        assert_eq!(parse_amount("NaN"), None);
    }

    #[test]
    fn test_negative_amounts_are_rejected() {
        assert_eq!(parse_amount("-500"), None);
        assert_eq!(parse_amount("-0"), Some(Decimal::ZERO));
    }

    #[test]
    fn test_amounts_above_ceiling_are_rejected() {
        assert_eq!(MAX_AMOUNT, dec!(1000000000000000));
        assert_eq!(parse_amount("1e15"), Some(MAX_AMOUNT));
        assert_eq!(parse_amount("1e28"), None);
        assert_eq!(parse_amount("1,000,000,000,000,001"), None);
        assert_eq!(parse_amount("79228162514264337593543950335"), None);
        assert_eq!(amount_from_value(&json!(1e20)), None);
        assert_eq!(amount_from_value(&json!(u64::MAX)), None);
    }

    #[test]
    fn test_amount_from_json_values() {
        assert_eq!(amount_from_value(&json!(50000)), Some(dec!(50000)));
        assert_eq!(amount_from_value(&json!(0.1)), Some(dec!(0.1)));
        assert_eq!(amount_from_value(&json!("1,000")), Some(dec!(1000)));
        assert_eq!(amount_from_value(&json!(-3)), None);
        assert_eq!(amount_from_value(&json!(null)), None);
        assert_eq!(amount_from_value(&json!(true)), None);
        assert_eq!(amount_from_value(&json!([1, 2])), None);
    }
}
