//! Basket

use rust_decimal::Decimal;

use crate::{
    items::{CartLine, NewCartLine, ProductId},
    pricing::{total_items, total_price},
};

/// What a call to [`Cart::add_item`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was appended with a quantity of one.
    Appended,

    /// An existing line's quantity was incremented to the contained value.
    Incremented(u32),
}

/// The active cart: lines in insertion order, at most one per product id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create a new empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a candidate to the cart.
    ///
    /// If a line with the same id exists its quantity goes up by one and the
    /// candidate's other fields are discarded. Otherwise the candidate is
    /// appended with a quantity of one.
    pub fn add_item(&mut self, candidate: NewCartLine) -> AddOutcome {
        if let Some(line) = self.line_mut(candidate.id) {
            line.quantity = line.quantity.saturating_add(1);

            return AddOutcome::Incremented(line.quantity);
        }

        self.lines.push(CartLine::from(candidate));

        AddOutcome::Appended
    }

    /// Removes the line with the given id. Returns whether a line was removed.
    pub fn remove_item(&mut self, id: ProductId) -> bool {
        let before = self.lines.len();

        self.lines.retain(|line| line.id != id);

        self.lines.len() != before
    }

    /// Sets the quantity of a line, removing it when `quantity <= 0`.
    ///
    /// Quantities beyond `u32::MAX` saturate. Unknown ids are ignored.
    /// Returns whether the cart changed.
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_item(id);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        match self.line_mut(id) {
            Some(line) if line.quantity != quantity => {
                line.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    /// Removes every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of the quantities of every line.
    pub fn total_items(&self) -> u64 {
        total_items(&self.lines)
    }

    /// Sum of unit price times quantity over every line.
    pub fn total_price(&self) -> Decimal {
        total_price(&self.lines)
    }

    /// Get the line for a product id.
    pub fn line(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    /// The lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Copies the lines out.
    pub fn to_vec(&self) -> Vec<CartLine> {
        self.lines.clone()
    }

    /// Iterate over the lines.
    pub fn iter(&self) -> std::slice::Iter<'_, CartLine> {
        self.lines.iter()
    }

    /// Get the number of distinct lines in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn line_mut(&mut self, id: ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.id == id)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartLine;
    type IntoIter = std::slice::Iter<'a, CartLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
