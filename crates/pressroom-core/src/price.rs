//! Price formatting for minor currency units.

use serde_json::Value;

use crate::error::CoreError;

pub const CURRENCY_SYMBOL: &str = "€";

/// Format an amount in minor units (cents) as a major-unit display string.
///
/// The amount is divided by 100 and printed with at least one and at most
/// two fractional digits: `1050` gives `10.5€`, `100` gives `1.0€`,
/// `5` gives `0.05€`.
pub fn format_price(minor_units: i64) -> String {
    let sign = if minor_units < 0 { "-" } else { "" };
    let magnitude = minor_units.unsigned_abs();
    let whole = magnitude / 100;
    let cents = magnitude % 100;

    let fraction = if cents % 10 == 0 {
        format!("{}", cents / 10)
    } else {
        format!("{cents:02}")
    };

    format!("{sign}{whole}.{fraction}{CURRENCY_SYMBOL}")
}

/// Float variant: divide by 100 and round to two decimals.
pub fn format_price_f64(minor_units: f64) -> String {
    let major = ((minor_units / 100.0) * 100.0).round() / 100.0;
    let mut text = major.to_string();
    if major.is_finite() && !text.contains('.') {
        text.push_str(".0");
    }
    format!("{text}{CURRENCY_SYMBOL}")
}

/// Format a JSON value as a price. Integers take the exact path; any other
/// number is treated as a float. Non-numeric values are rejected.
pub fn format_price_value(value: &Value) -> Result<String, CoreError> {
    if let Some(n) = value.as_i64() {
        return Ok(format_price(n));
    }
    if let Some(n) = value.as_f64() {
        return Ok(format_price_f64(n));
    }
    Err(CoreError::NotANumber(value.to_string()))
}
