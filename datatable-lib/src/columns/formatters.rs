//! Built-in cell formatters

use std::sync::Arc;

use super::Formatter;
use crate::model::Item;
use crate::model::Value;

/// Formats numbers with comma-separated thousands and a fixed number of
/// decimals, e.g. `1234567.891` with 2 decimals as `1,234,567.89`.
///
/// Numeric strings are parsed; anything else renders as an empty cell.
pub fn thousands(decimals: usize) -> Formatter {
    Arc::new(move |_: &Item, value: &Value, _: usize| match as_number(value) {
        Some(n) => format_thousands(n, decimals),
        None => String::new(),
    })
}

/// Like [`thousands`], with a currency symbol in front.
pub fn price(currency: impl Into<String>, decimals: usize) -> Formatter {
    let currency = currency.into();
    Arc::new(move |_: &Item, value: &Value, _: usize| match as_number(value) {
        Some(n) => format!("{}{}", currency, format_thousands(n, decimals)),
        None => String::new(),
    })
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        other => other.as_f64(),
    }
    .filter(|n| n.is_finite())
}

/// Comma-grouped rendering of `n` rounded to `decimals` places.
pub fn format_thousands(n: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, n.abs());
    let (whole, fraction) = match fixed.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + whole.len() / 3 + 1);
    let negative = n < 0.0 && fixed.chars().any(|c| matches!(c, '1'..='9'));
    if negative {
        out.push('-');
    }

    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }

    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}
