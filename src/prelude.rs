//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    basket::{AddOutcome, Cart},
    catalog::{Catalog, CatalogError},
    checkout::{CheckoutError, CheckoutSummary, money},
    clock::{Clock, FixedClock, SystemClock},
    config::{ConfigError, StoreConfig},
    items::{CartLine, NewCartLine, ProductId},
    observers::{ObserverKey, StoreEvent, StoreObserver, StoreSnapshot},
    orders::{NewOrder, Order, OrderHistory, OrderId, OrderIdGenerator},
    prices::{DisplayPrice, parse_price},
    pricing::{line_total, total_items, total_price},
    store::CartStore,
};
