//! Items

use serde::{Deserialize, Serialize};

use crate::prices::DisplayPrice;

/// Identifier of a product or offer. Unique within the active cart.
pub type ProductId = i64;

/// A product offered to the cart, before it has a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCartLine {
    /// Product identifier
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Display price, e.g. `"₹2,499"`
    pub price: DisplayPrice,

    /// Display token such as an icon reference
    pub image: String,

    /// Display description
    pub description: String,

    /// Display category
    pub category: String,
}

impl NewCartLine {
    /// Creates a candidate with the given id, name and price and empty display fields.
    pub fn new(id: ProductId, name: impl Into<String>, price: impl Into<DisplayPrice>) -> Self {
        Self {
            id,
            name: name.into(),
            price: price.into(),
            image: String::new(),
            description: String::new(),
            category: String::new(),
        }
    }
}

/// A line in the active cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product identifier
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Display price, e.g. `"₹2,499"`
    pub price: DisplayPrice,

    /// Display token such as an icon reference
    pub image: String,

    /// Display description
    pub description: String,

    /// Display category
    pub category: String,

    /// Always at least one while the line is in a cart
    pub quantity: u32,
}

impl CartLine {
    /// Creates a line from a candidate with a quantity of one.
    pub fn from_candidate(candidate: NewCartLine) -> Self {
        let NewCartLine {
            id,
            name,
            price,
            image,
            description,
            category,
        } = candidate;

        Self {
            id,
            name,
            price,
            image,
            description,
            category,
            quantity: 1,
        }
    }
}

impl From<NewCartLine> for CartLine {
    fn from(candidate: NewCartLine) -> Self {
        Self::from_candidate(candidate)
    }
}
