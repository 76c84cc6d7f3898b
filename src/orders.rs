//! Orders
//!
//! Completed carts are frozen into [`Order`]s and kept newest-first in an
//! [`OrderHistory`]. Order ids are a short prefix followed by the low-order
//! digits of the completion time in milliseconds. They are easy to read out
//! loud, and two completions in the same millisecond get the same id; nothing
//! here tries to detect that.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{clock::Clock, items::CartLine, pricing::total_items};

/// Identifier of a completed order, e.g. `WM12345678`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Wraps an existing id.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The id as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Most decimal digits an `i64` millisecond reading can supply.
pub const MAX_ORDER_ID_DIGITS: u32 = 18;

/// Generates [`OrderId`]s from a clock.
#[derive(Debug, Clone)]
pub struct OrderIdGenerator<C> {
    prefix: String,
    digits: u32,
    clock: C,
}

impl<C: Clock> OrderIdGenerator<C> {
    /// Create a generator using `digits` low-order digits of the clock's reading.
    ///
    /// `digits` is clamped to `1..=`[`MAX_ORDER_ID_DIGITS`].
    pub fn new(prefix: impl Into<String>, digits: u32, clock: C) -> Self {
        Self {
            prefix: prefix.into(),
            digits: digits.clamp(1, MAX_ORDER_ID_DIGITS),
            clock,
        }
    }

    /// Reads the clock and builds the next id.
    pub fn next_id(&self) -> OrderId {
        let modulus = 10_i64.pow(self.digits);
        let low = self.clock.now_millis().rem_euclid(modulus);
        let width = usize::try_from(self.digits).unwrap_or_default();

        OrderId(format!("{}{low:0width$}", self.prefix))
    }
}

/// The details of a completed cart, as agreed at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    /// Lines captured at checkout
    pub items: Vec<CartLine>,

    /// Grand total, possibly including shipping and tax
    pub total: Decimal,

    /// Display date
    pub date: String,

    /// Display status, e.g. `"Confirmed"`
    pub status: String,
}

/// An immutable record of a completed cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    items: Vec<CartLine>,
    total: Decimal,
    date: String,
    status: String,
}

impl Order {
    /// Builds an order from checkout details and a generated id.
    pub fn new(id: OrderId, details: NewOrder) -> Self {
        let NewOrder {
            items,
            total,
            date,
            status,
        } = details;

        Self {
            id,
            items,
            total,
            date,
            status,
        }
    }

    /// Order id
    pub fn id(&self) -> &OrderId {
        &self.id
    }

    /// Lines as they were at checkout
    pub fn items(&self) -> &[CartLine] {
        &self.items
    }

    /// Grand total agreed at checkout
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Display date
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Display status
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Sum of line quantities
    pub fn item_count(&self) -> u64 {
        total_items(&self.items)
    }
}

/// Completed orders, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderHistory {
    orders: Vec<Order>,
}

impl OrderHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an order ahead of every earlier one.
    pub fn push(&mut self, order: Order) {
        self.orders.insert(0, order);
    }

    /// Finds an order by id.
    pub fn find(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| order.id() == id)
    }

    /// The most recently completed order.
    pub fn latest(&self) -> Option<&Order> {
        self.orders.first()
    }

    /// Orders, newest first.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Iterate over orders, newest first.
    pub fn iter(&self) -> std::slice::Iter<'_, Order> {
        self.orders.iter()
    }

    /// Number of orders.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Whether no order has been completed.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

impl<'a> IntoIterator for &'a OrderHistory {
    type Item = &'a Order;
    type IntoIter = std::slice::Iter<'a, Order>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
