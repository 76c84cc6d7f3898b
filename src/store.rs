//! Cart store
//!
//! [`CartStore`] owns the active cart and the order history for a session.
//! It is constructed explicitly and handed to whatever needs it; dropping it
//! discards the session. Every method runs to completion synchronously and
//! `&mut self` keeps mutations in call order.

use std::fmt;

use rust_decimal::Decimal;
use slotmap::SlotMap;
use tracing::{debug, info};

use crate::{
    basket::{AddOutcome, Cart},
    checkout::CheckoutSummary,
    clock::{Clock, SystemClock},
    config::StoreConfig,
    items::{CartLine, NewCartLine, ProductId},
    observers::{ObserverKey, StoreEvent, StoreObserver, StoreSnapshot},
    orders::{NewOrder, Order, OrderHistory, OrderId, OrderIdGenerator},
};

/// Shopping cart and order history state for one session.
pub struct CartStore<C = SystemClock> {
    config: StoreConfig,
    cart: Cart,
    history: OrderHistory,
    order_ids: OrderIdGenerator<C>,
    observers: SlotMap<ObserverKey, Box<dyn StoreObserver>>,
}

impl CartStore<SystemClock> {
    /// Create an empty store that stamps order ids from the wall clock.
    pub fn new(config: StoreConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for CartStore<SystemClock> {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl<C: Clock> CartStore<C> {
    /// Create an empty store that stamps order ids from `clock`.
    pub fn with_clock(config: StoreConfig, clock: C) -> Self {
        let order_ids = OrderIdGenerator::new(
            config.order_id_prefix.clone(),
            config.order_id_digits,
            clock,
        );

        Self {
            config,
            cart: Cart::new(),
            history: OrderHistory::new(),
            order_ids,
            observers: SlotMap::with_key(),
        }
    }

    /// Adds a product to the cart, or bumps its quantity if already present.
    pub fn add_item(&mut self, candidate: NewCartLine) {
        let id = candidate.id;

        let quantity = match self.cart.add_item(candidate) {
            AddOutcome::Appended => 1,
            AddOutcome::Incremented(quantity) => quantity,
        };

        debug!(product_id = id, quantity, "item added");

        self.publish(&StoreEvent::ItemAdded { id, quantity });
    }

    /// Removes a product's line. Absent ids are ignored.
    pub fn remove_item(&mut self, id: ProductId) {
        let removed = self.cart.remove_item(id);

        debug!(product_id = id, removed, "item removed");

        self.publish(&StoreEvent::ItemRemoved { id, removed });
    }

    /// Sets a line's quantity; zero or below removes the line.
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(id);
            return;
        }

        self.cart.update_quantity(id, quantity);

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        debug!(product_id = id, quantity, "quantity updated");

        self.publish(&StoreEvent::QuantityUpdated { id, quantity });
    }

    /// Empties the cart. The order history is untouched.
    pub fn clear_cart(&mut self) {
        self.cart.clear();

        debug!("cart cleared");

        self.publish(&StoreEvent::CartCleared);
    }

    /// Records a completed order ahead of earlier ones and empties the cart.
    ///
    /// The total is taken as given; it is not checked against the items.
    pub fn complete_order(&mut self, details: NewOrder) -> OrderId {
        let id = self.order_ids.next_id();
        let order = Order::new(id.clone(), details);

        info!(
            order_id = %id,
            total = %order.total(),
            lines = order.items().len(),
            status = order.status(),
            "order completed"
        );

        self.history.push(order);
        self.cart.clear();

        self.publish(&StoreEvent::OrderCompleted(id.clone()));

        id
    }

    /// Completes an order for the current cart using the configured shipping,
    /// tax and status. Returns `None` without recording anything when the cart
    /// is empty.
    pub fn checkout(&mut self, date: impl Into<String>) -> Option<OrderId> {
        if self.cart.is_empty() {
            debug!("checkout requested for an empty cart");
            return None;
        }

        let summary = self.checkout_summary();
        let details = summary.to_new_order(
            self.cart.to_vec(),
            date,
            self.config.confirmed_status.clone(),
        );

        Some(self.complete_order(details))
    }

    /// Sum of the quantities in the cart.
    pub fn total_items(&self) -> u64 {
        self.cart.total_items()
    }

    /// Cart subtotal. Lines with unparseable prices count as zero.
    pub fn total_price(&self) -> Decimal {
        self.cart.total_price()
    }

    /// Subtotal, shipping, tax and grand total for the current cart.
    pub fn checkout_summary(&self) -> CheckoutSummary {
        CheckoutSummary::compute(self.cart.lines(), &self.config)
    }

    /// Cart lines, in insertion order.
    pub fn items(&self) -> &[CartLine] {
        self.cart.lines()
    }

    /// The line for a product, if it is in the cart.
    pub fn line(&self, id: ProductId) -> Option<&CartLine> {
        self.cart.line(id)
    }

    /// Completed orders, newest first.
    pub fn order_history(&self) -> &[Order] {
        self.history.orders()
    }

    /// Looks up a completed order.
    pub fn find_order(&self, id: &OrderId) -> Option<&Order> {
        self.history.find(id)
    }

    /// Read-only view of the cart and the order history.
    pub fn snapshot(&self) -> StoreSnapshot<'_> {
        StoreSnapshot::new(self.cart.lines(), self.history.orders())
    }

    /// The store's configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Registers an observer to be told about every subsequent mutation.
    pub fn subscribe(&mut self, observer: impl StoreObserver + 'static) -> ObserverKey {
        self.observers.insert(Box::new(observer))
    }

    /// Registers a closure as an observer.
    pub fn subscribe_fn<F>(&mut self, observer: F) -> ObserverKey
    where
        F: FnMut(&StoreEvent, StoreSnapshot<'_>) + 'static,
    {
        self.subscribe(observer)
    }

    /// Removes an observer. Returns whether it was registered.
    pub fn unsubscribe(&mut self, key: ObserverKey) -> bool {
        self.observers.remove(key).is_some()
    }

    fn publish(&mut self, event: &StoreEvent) {
        let snapshot = StoreSnapshot::new(self.cart.lines(), self.history.orders());

        for observer in self.observers.values_mut() {
            observer.on_change(event, snapshot);
        }
    }
}

impl<C: fmt::Debug> fmt::Debug for CartStore<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("config", &self.config)
            .field("cart", &self.cart)
            .field("history", &self.history)
            .field("order_ids", &self.order_ids)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use testresult::TestResult;

    use crate::clock::FixedClock;

    use super::*;

    fn store() -> CartStore<FixedClock> {
        CartStore::with_clock(
            StoreConfig::default(),
            FixedClock::stepping(1_760_000_012_345_678, 1),
        )
    }

    fn candidate(id: ProductId, price: &str) -> NewCartLine {
        NewCartLine::new(id, format!("Product {id}"), price)
    }

    fn order_for(store: &CartStore<FixedClock>, total: i64) -> NewOrder {
        NewOrder {
            items: store.items().to_vec(),
            total: Decimal::from(total),
            date: "2024-01-01".to_string(),
            status: "Confirmed".to_string(),
        }
    }

    fn recorder<C: Clock>(store: &mut CartStore<C>) -> Rc<RefCell<Vec<StoreEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);

        store.subscribe_fn(move |event, _| sink.borrow_mut().push(event.clone()));

        events
    }

    #[test]
    fn new_store_is_empty() {
        let store = CartStore::default();

        assert!(store.items().is_empty());
        assert!(store.order_history().is_empty());
        assert_eq!(store.total_items(), 0);
        assert_eq!(store.total_price(), Decimal::ZERO);
    }

    #[test]
    fn adding_same_id_twice_gives_one_line_of_two() {
        let mut store = store();

        store.add_item(candidate(1, "₹699"));
        store.add_item(candidate(1, "₹699"));

        assert_eq!(store.items().len(), 1);
        assert_eq!(store.line(1).map(|line| line.quantity), Some(2));
        assert_eq!(store.total_price(), Decimal::from(1398));
    }

    #[test]
    fn update_quantity_to_zero_or_negative_removes() {
        let mut store = store();

        store.add_item(candidate(1, "₹10"));
        store.add_item(candidate(2, "₹10"));

        store.update_quantity(1, 0);
        store.update_quantity(2, -5);

        assert!(store.items().is_empty());
    }

    #[test]
    fn update_quantity_sets_positive_value() {
        let mut store = store();

        store.add_item(candidate(1, "₹10"));
        store.update_quantity(1, 4);

        assert_eq!(store.total_items(), 4);
        assert_eq!(store.total_price(), Decimal::from(40));
    }

    #[test]
    fn removing_absent_id_twice_is_noop() {
        let mut store = store();
        store.add_item(candidate(1, "₹10"));

        store.remove_item(9);
        store.remove_item(9);

        assert_eq!(store.items().len(), 1);
    }

    #[test]
    fn clear_cart_keeps_history() {
        let mut store = store();

        store.add_item(candidate(1, "₹10"));
        let details = order_for(&store, 10);
        store.complete_order(details);

        store.add_item(candidate(2, "₹20"));
        store.clear_cart();

        assert!(store.items().is_empty());
        assert_eq!(store.order_history().len(), 1);
    }

    #[test]
    fn complete_order_snapshots_items_and_clears_cart() {
        let mut store = store();

        store.add_item(candidate(1, "₹199"));
        store.add_item(candidate(1, "₹199"));
        store.add_item(candidate(2, "₹1,499"));

        let snapshot = store.items().to_vec();
        let details = order_for(&store, 1897);
        let id = store.complete_order(details);

        assert!(store.items().is_empty());

        store.add_item(candidate(1, "₹199"));
        store.update_quantity(1, 7);
        store.clear_cart();

        let order = store.order_history().first();

        assert_eq!(order.map(Order::id), Some(&id));
        assert_eq!(order.map(Order::items), Some(snapshot.as_slice()));
        assert_eq!(order.map(Order::total), Some(Decimal::from(1897)));
        assert_eq!(order.map(Order::date), Some("2024-01-01"));
        assert_eq!(order.map(Order::status), Some("Confirmed"));
    }

    #[test]
    fn complete_order_trusts_given_total() {
        let mut store = store();

        store.add_item(candidate(1, "₹100"));
        let details = order_for(&store, 5);
        let id = store.complete_order(details);

        assert_eq!(
            store.find_order(&id).map(Order::total),
            Some(Decimal::from(5))
        );
    }

    #[test]
    fn newest_order_comes_first() {
        let mut store = store();

        store.add_item(candidate(1, "₹100"));
        let details = order_for(&store, 100);
        let first = store.complete_order(details);

        store.add_item(candidate(2, "₹200"));
        let details = order_for(&store, 200);
        let second = store.complete_order(details);

        let ids: Vec<_> = store.order_history().iter().map(Order::id).collect();

        assert_eq!(ids, [&second, &first]);
    }

    #[test]
    fn order_ids_use_prefix_and_clock_digits() {
        let mut store = store();

        let first = store.complete_order(order_for(&store, 0));
        let second = store.complete_order(order_for(&store, 0));

        assert_eq!(first.as_str(), "WM12345678");
        assert_eq!(second.as_str(), "WM12345679");
    }

    #[test]
    fn checkout_applies_shipping_and_tax() {
        let mut store = store();

        store.add_item(candidate(1, "₹699"));
        store.add_item(candidate(1, "₹699"));

        let id = store.checkout("18/10/2026");

        let order = id.as_ref().and_then(|id| store.find_order(id));

        // 1398 + 99 shipping + 252 tax (251.64 rounded)
        assert_eq!(order.map(Order::total), Some(Decimal::from(1749)));
        assert_eq!(order.map(Order::status), Some("Confirmed"));
        assert_eq!(order.map(Order::item_count), Some(2));
        assert!(store.items().is_empty());
    }

    #[test]
    fn huge_tax_rate_saturates_at_checkout() -> TestResult {
        let config = StoreConfig::from_yaml_str("tax_rate: \"200%\"\n")?;
        let mut store = CartStore::with_clock(config, FixedClock::new(1_760_000_000_000));

        store.add_item(candidate(1, "₹79228162514264337593543950335"));

        assert_eq!(store.checkout_summary().total, Decimal::MAX);

        let id = store.checkout("18/10/2026");
        let order = id.as_ref().and_then(|id| store.find_order(id));

        assert_eq!(order.map(Order::total), Some(Decimal::MAX));

        Ok(())
    }

    #[test]
    fn snapshot_reflects_cart_and_history() {
        let mut store = store();

        store.add_item(candidate(1, "₹899"));
        store.checkout("18/10/2026");
        store.add_item(candidate(2, "₹199"));
        store.add_item(candidate(2, "₹199"));

        let snapshot = store.snapshot();

        assert_eq!(snapshot.items(), store.items());
        assert_eq!(snapshot.orders().len(), 1);
        assert_eq!(snapshot.total_items(), 2);
        assert_eq!(snapshot.total_price(), Decimal::from(398));
        assert_eq!(store.config().order_id_prefix, "WM");
    }

    #[test]
    fn checkout_of_empty_cart_records_nothing() {
        let mut store = store();

        assert!(store.checkout("18/10/2026").is_none());
        assert!(store.order_history().is_empty());
    }

    #[test]
    fn observers_see_every_mutation() {
        let mut store = store();
        let events = recorder(&mut store);

        store.add_item(candidate(1, "₹10"));
        store.add_item(candidate(1, "₹10"));
        store.update_quantity(1, 5);
        store.update_quantity(1, 0);
        store.remove_item(1);
        store.clear_cart();

        assert_eq!(
            *events.borrow(),
            [
                StoreEvent::ItemAdded { id: 1, quantity: 1 },
                StoreEvent::ItemAdded { id: 1, quantity: 2 },
                StoreEvent::QuantityUpdated { id: 1, quantity: 5 },
                StoreEvent::ItemRemoved {
                    id: 1,
                    removed: true
                },
                StoreEvent::ItemRemoved {
                    id: 1,
                    removed: false
                },
                StoreEvent::CartCleared,
            ]
        );
    }

    #[test]
    fn observers_receive_post_mutation_snapshot() {
        let mut store = store();
        let totals = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&totals);

        store.subscribe_fn(move |_, snapshot| {
            sink.borrow_mut()
                .push((snapshot.total_items(), snapshot.orders().len()));
        });

        store.add_item(candidate(1, "₹10"));
        store.add_item(candidate(2, "₹10"));
        let details = order_for(&store, 20);
        store.complete_order(details);

        assert_eq!(*totals.borrow(), [(1, 0), (2, 0), (0, 1)]);
    }

    #[test]
    fn unsubscribed_observers_are_not_called() {
        let mut store = store();
        let calls = Rc::new(RefCell::new(0_u32));
        let sink = Rc::clone(&calls);

        let key = store.subscribe_fn(move |_, _| *sink.borrow_mut() += 1);

        store.add_item(candidate(1, "₹10"));

        assert!(store.unsubscribe(key));
        assert!(!store.unsubscribe(key));

        store.add_item(candidate(2, "₹10"));

        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn order_completed_event_carries_id() {
        let mut store = store();
        let events = recorder(&mut store);

        store.add_item(candidate(1, "₹10"));
        let details = order_for(&store, 10);
        let id = store.complete_order(details);

        assert_eq!(
            events.borrow().last(),
            Some(&StoreEvent::OrderCompleted(id))
        );
    }

    #[test]
    fn debug_reports_observer_count() {
        let mut store = store();
        store.subscribe_fn(|_, _| {});

        let rendered = format!("{store:?}");

        assert!(rendered.contains("CartStore"));
        assert!(rendered.contains("observers: 1"));
    }
}
