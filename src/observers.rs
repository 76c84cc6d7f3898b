//! Store observers
//!
//! Views register a [`StoreObserver`] on the store and re-render from the
//! [`StoreSnapshot`] handed to them after every mutation. Observers only ever
//! see the state; they cannot mutate it.

use rust_decimal::Decimal;
use slotmap::new_key_type;

use crate::{
    items::{CartLine, ProductId},
    orders::{Order, OrderId},
    pricing::{total_items, total_price},
};

new_key_type! {
    /// Handle returned by [`CartStore::subscribe`](crate::store::CartStore::subscribe).
    pub struct ObserverKey;
}

/// The mutation that produced a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// A product was added; `quantity` is the line's new quantity.
    ItemAdded {
        /// Product identifier
        id: ProductId,
        /// Quantity after the add
        quantity: u32,
    },

    /// A removal was requested; `removed` is false when the id was absent.
    ItemRemoved {
        /// Product identifier
        id: ProductId,
        /// Whether a line was actually removed
        removed: bool,
    },

    /// A positive quantity was requested; absent ids leave the cart unchanged.
    QuantityUpdated {
        /// Product identifier
        id: ProductId,
        /// Requested quantity
        quantity: u32,
    },

    /// The active cart was emptied.
    CartCleared,

    /// An order was recorded and the cart emptied.
    OrderCompleted(OrderId),
}

/// Read-only view of the store's two collections.
#[derive(Debug, Clone, Copy)]
pub struct StoreSnapshot<'a> {
    items: &'a [CartLine],
    orders: &'a [Order],
}

impl<'a> StoreSnapshot<'a> {
    /// Create a snapshot over the given collections.
    pub fn new(items: &'a [CartLine], orders: &'a [Order]) -> Self {
        Self { items, orders }
    }

    /// Active cart lines, in insertion order
    pub fn items(&self) -> &'a [CartLine] {
        self.items
    }

    /// Completed orders, newest first
    pub fn orders(&self) -> &'a [Order] {
        self.orders
    }

    /// Sum of cart quantities
    pub fn total_items(&self) -> u64 {
        total_items(self.items)
    }

    /// Cart subtotal
    pub fn total_price(&self) -> Decimal {
        total_price(self.items)
    }
}

/// Receives a notification after every store mutation.
pub trait StoreObserver {
    /// Called once the mutation described by `event` has been applied.
    fn on_change(&mut self, event: &StoreEvent, snapshot: StoreSnapshot<'_>);
}

impl<F> StoreObserver for F
where
    F: FnMut(&StoreEvent, StoreSnapshot<'_>),
{
    fn on_change(&mut self, event: &StoreEvent, snapshot: StoreSnapshot<'_>) {
        self(event, snapshot);
    }
}
