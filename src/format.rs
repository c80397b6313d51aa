//! Display formatting
//!
//! Brazilian-locale rendering for money and dates. Currency output honors
//! privacy mode by masking the amount while keeping the symbol, so layouts
//! stay stable when values are hidden.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

const PRIVACY_MASK: &str = "R$ ••••";

/// Render a monetary value as Brazilian Reais, e.g. `R$ 1.234,56`.
///
/// With `privacy` set the value is replaced by a fixed-width mask.
pub fn format_currency(value: Decimal, privacy: bool) -> String {
    if privacy {
        return PRIVACY_MASK.to_string();
    }

    // Half-up, the convention for displayed currency
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative();
    let text = rounded.abs().to_string();
    let (whole, frac) = match text.split_once('.') {
        Some((w, f)) => (w.to_string(), format!("{f:0<2}")),
        None => (text, "00".to_string()),
    };

    // Group the integer part with dots, thousands style
    let digits: Vec<char> = whole.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}R$ {grouped},{frac}")
}

/// Render a timestamp as a `dd/mm/yyyy` date.
pub fn format_date(date: DateTime<Utc>) -> String {
    date.format("%d/%m/%Y").to_string()
}
