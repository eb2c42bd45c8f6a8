//! Utility functions for formatting and common operations
//!
//! This module provides centralized formatting utilities for consistent
//! display of currency values throughout the application.

use rust_decimal::Decimal;

/// Currency symbol options for formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencySymbol {
    /// Include "₹ " prefix (Indian Rupee)
    Inr,
    /// No currency symbol (for table cells, calculations display)
    None,
}

/// Core formatting function with full control over output.
///
/// Formats a Decimal value using Indian digit grouping: the last three
/// integer digits form one group and every group before them has two digits
/// (12,34,567.89). The value is rounded to 2 decimal places.
///
/// # Arguments
/// * `value` - The decimal value to format
/// * `width` - Minimum width in characters (0 for no padding, right-aligned)
/// * `symbol` - Whether to include currency symbol
///
/// # Examples
/// ```
/// use salary_tax::utils::{format_currency_with_width, CurrencySymbol};
/// use rust_decimal_macros::dec;
///
/// assert_eq!(
///     format_currency_with_width(dec!(1234567.891), 0, CurrencySymbol::Inr),
///     "₹ 12,34,567.89"
/// );
///
/// assert_eq!(
///     format_currency_with_width(dec!(1234), 12, CurrencySymbol::None),
///     "    1,234.00"
/// );
/// ```
pub fn format_currency_with_width(value: Decimal, width: usize, symbol: CurrencySymbol) -> String {
    let is_negative = value < Decimal::ZERO;
    let abs_value = value.abs().round_dp(2);

    let formatted = format!("{:.2}", abs_value);
    let (integer_part, decimal_part) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));

    let grouped = group_indian(integer_part);

    let sign = if is_negative && !abs_value.is_zero() { "-" } else { "" };
    let prefix = match symbol {
        CurrencySymbol::Inr => "₹ ",
        CurrencySymbol::None => "",
    };

    let result = format!("{}{}{}.{}", prefix, sign, grouped, decimal_part);

    // Pad by characters, "₹" is multi-byte
    let chars = result.chars().count();
    if width > chars {
        format!("{}{}", " ".repeat(width - chars), result)
    } else {
        result
    }
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

// ============ Convenience functions ============

/// Format as Indian Rupees with symbol: "₹ 1,23,456.70"
///
/// # Examples
/// ```
/// use salary_tax::utils::format_currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_currency(dec!(9495.2)), "₹ 9,495.20");
/// assert_eq!(format_currency(dec!(-500)), "₹ -500.00");
/// ```
pub fn format_currency(value: Decimal) -> String {
    format_currency_with_width(value, 0, CurrencySymbol::Inr)
}

/// Format number only (no symbol): "1,23,456.70"
pub fn format_amount(value: Decimal) -> String {
    format_currency_with_width(value, 0, CurrencySymbol::None)
}

/// Format a rate as a percentage: 0.05 -> "5%"
pub fn format_rate(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}
