//! Prices

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A display-formatted currency string, e.g. `"₹2,499"`.
///
/// The formatting belongs to whoever produced the string. The only thing read
/// out of it is the numeric magnitude, and that happens at aggregation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayPrice(String);

impl DisplayPrice {
    /// Wraps a display string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the string as it was supplied.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the numeric magnitude, or zero when there is none.
    pub fn amount(&self) -> Decimal {
        parse_price(&self.0).unwrap_or_else(|| {
            warn!(price = %self.0, "price has no numeric content; counting it as zero");

            Decimal::ZERO
        })
    }

    /// Returns the leading token that [`parse_price`] discards, verbatim.
    ///
    /// Some producers hand over mis-encoded glyphs (`"â‚¹"` instead of `"₹"`).
    /// Those are surfaced here untouched.
    pub fn currency_token(&self) -> &str {
        let (prefix, _) = split_prefix(&self.0);

        prefix.trim()
    }
}

impl fmt::Display for DisplayPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for DisplayPrice {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DisplayPrice {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Extracts the numeric magnitude from a display-formatted currency string.
///
/// Everything before the first digit is treated as a single currency token and
/// dropped, whatever its encoding. Grouping separators (`,`, `_`, `'`) are
/// removed, and the number ends at the first character that is not a digit, a
/// separator or `.`. Whitespace ends the number, so `"₹250 300"` reads as 250.
///
/// Returns `None` when no numeric content remains.
pub fn parse_price(s: &str) -> Option<Decimal> {
    let (_, body) = split_prefix(s);

    let mut digits = String::with_capacity(body.len());

    for c in body.chars() {
        match c {
            '0'..='9' | '.' => digits.push(c),
            c if is_group_separator(c) => {}
            _ => break,
        }
    }

    if !digits.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    digits.parse::<Decimal>().ok()
}

/// Splits `s` at the start of its numeric content.
fn split_prefix(s: &str) -> (&str, &str) {
    let mut chars = s.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        let starts_number = c.is_ascii_digit()
            || (c == '.' && chars.peek().is_some_and(|(_, next)| next.is_ascii_digit()));

        if starts_number {
            return s.split_at(idx);
        }
    }

    (s, "")
}

fn is_group_separator(c: char) -> bool {
    matches!(c, ',' | '_' | '\'')
}
