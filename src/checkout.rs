//! Checkout
//!
//! The grand total recorded on an order is worked out here, outside the
//! store: subtotal from the cart, a flat shipping fee and tax rounded to whole
//! rupees. The store takes whatever total it is handed.

use std::io;

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    config::StoreConfig,
    items::CartLine,
    orders::{NewOrder, Order},
    pricing::{line_total, total_price},
};

/// Errors that can occur while rendering checkout output.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// IO error
    #[error("IO error")]
    IO,
}

/// Amounts shown at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutSummary {
    /// Sum of line totals
    pub subtotal: Decimal,

    /// Shipping fee; zero for an empty cart
    pub shipping: Decimal,

    /// Tax on the subtotal, rounded to a whole unit
    pub tax: Decimal,

    /// Subtotal plus shipping plus tax
    pub total: Decimal,
}

impl CheckoutSummary {
    /// Works out the checkout amounts for `lines`.
    pub fn compute(lines: &[CartLine], config: &StoreConfig) -> Self {
        let subtotal = total_price(lines);

        let shipping = if lines.is_empty() {
            Decimal::ZERO
        } else {
            config.shipping_fee
        };

        let rate = config.tax_rate * Decimal::ONE;
        let tax = subtotal
            .saturating_mul(rate)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

        let total = subtotal.saturating_add(shipping).saturating_add(tax);

        Self {
            subtotal,
            shipping,
            tax,
            total,
        }
    }

    /// Builds the order details to hand to
    /// [`CartStore::complete_order`](crate::store::CartStore::complete_order).
    pub fn to_new_order(
        &self,
        items: Vec<CartLine>,
        date: impl Into<String>,
        status: impl Into<String>,
    ) -> NewOrder {
        NewOrder {
            items,
            total: self.total,
            date: date.into(),
            status: status.into(),
        }
    }
}

/// Renders an amount in rupees.
pub fn money(amount: Decimal) -> Money<'static, Currency> {
    Money::from_decimal(amount, iso::INR)
}

/// Writes the cart lines as a table.
///
/// # Errors
///
/// Returns [`CheckoutError::IO`] if writing to `out` fails.
pub fn write_cart_table(out: &mut impl io::Write, lines: &[CartLine]) -> Result<(), CheckoutError> {
    let mut builder = Builder::default();

    builder.push_record(["", "Item", "Category", "Price", "Qty", "Line Total"]);

    for line in lines {
        builder.push_record([
            line.image.clone(),
            line.name.clone(),
            line.category.clone(),
            line.price.to_string(),
            line.quantity.to_string(),
            money(line_total(line)).to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Alignment::center());
    table.modify(Columns::new(3..6), Alignment::right());

    writeln!(out, "{table}").map_err(|_err| CheckoutError::IO)
}

/// Writes the subtotal, shipping, tax and total lines.
///
/// # Errors
///
/// Returns [`CheckoutError::IO`] if writing to `out` fails.
pub fn write_summary(
    out: &mut impl io::Write,
    summary: &CheckoutSummary,
) -> Result<(), CheckoutError> {
    let rows = [
        ("Subtotal", summary.subtotal),
        ("Shipping", summary.shipping),
        ("Tax", summary.tax),
        ("Total", summary.total),
    ];

    for (label, amount) in rows {
        let amount = money(amount).to_string();

        writeln!(out, " {label:<10}{amount:>14}").map_err(|_err| CheckoutError::IO)?;
    }

    Ok(())
}

/// Writes the order history as a table, newest first.
///
/// # Errors
///
/// Returns [`CheckoutError::IO`] if writing to `out` fails.
pub fn write_order_table(out: &mut impl io::Write, orders: &[Order]) -> Result<(), CheckoutError> {
    let mut builder = Builder::default();

    builder.push_record(["Order", "Date", "Items", "Status", "Total"]);

    for order in orders {
        builder.push_record([
            order.id().to_string(),
            order.date().to_string(),
            order.item_count().to_string(),
            order.status().to_string(),
            money(order.total()).to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(2..3), Alignment::right());
    table.modify(Columns::new(4..5), Alignment::right());

    writeln!(out, "{table}").map_err(|_err| CheckoutError::IO)
}
