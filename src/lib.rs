//! Storefront
//!
//! Shopping cart and order history state for a storefront session: the active
//! cart, totals derived from display-formatted prices, and the newest-first
//! history of completed orders.

pub mod basket;
pub mod catalog;
pub mod checkout;
pub mod clock;
pub mod config;
pub mod items;
pub mod observers;
pub mod orders;
pub mod prelude;
pub mod prices;
pub mod pricing;
pub mod store;
