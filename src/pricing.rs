//! Pricing

use rust_decimal::Decimal;

use crate::items::CartLine;

/// Calculates the price of a single line: unit price times quantity.
///
/// An unparseable price counts as zero.
pub fn line_total(line: &CartLine) -> Decimal {
    line.price
        .amount()
        .saturating_mul(Decimal::from(line.quantity))
}

/// Calculates the total price of a list of lines.
///
/// Always resolves to a number. Lines whose price cannot be parsed contribute
/// zero and the sum saturates rather than overflowing.
pub fn total_price(lines: &[CartLine]) -> Decimal {
    lines
        .iter()
        .map(line_total)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Sums the quantities of a list of lines.
pub fn total_items(lines: &[CartLine]) -> u64 {
    lines.iter().map(|line| u64::from(line.quantity)).sum()
}
