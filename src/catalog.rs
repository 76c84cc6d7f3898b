//! Catalog
//!
//! A static product list loaded from a YAML fixture, e.g.
//!
//! ```yaml
//! products:
//!   - id: 101
//!     name: Flash Sale - 50% Off Electronics
//!     price: "₹9,999"
//!     image: "📱"
//!     description: Limited time offer on smartphones
//!     category: Electronics
//! ```

use std::{fs, path::Path};

use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

use crate::items::{NewCartLine, ProductId};

/// Catalog Errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading the fixture file
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Two products share an id
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(ProductId),
}

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
struct CatalogFixture {
    products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
struct ProductFixture {
    id: ProductId,
    name: String,
    price: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: String,
}

impl From<ProductFixture> for NewCartLine {
    fn from(fixture: ProductFixture) -> Self {
        Self {
            id: fixture.id,
            name: fixture.name,
            price: fixture.price.into(),
            image: fixture.image,
            description: fixture.description,
            category: fixture.category,
        }
    }
}

/// Products available to add to the cart.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<NewCartLine>,
    index: FxHashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog from products.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateProduct`] if two products share an id.
    pub fn with_products(
        products: impl IntoIterator<Item = NewCartLine>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();

        for product in products {
            if catalog.index.contains_key(&product.id) {
                return Err(CatalogError::DuplicateProduct(product.id));
            }

            catalog.index.insert(product.id, catalog.products.len());
            catalog.products.push(product);
        }

        Ok(catalog)
    }

    /// Parse a catalog from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or two products share an id.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let fixture: CatalogFixture = serde_norway::from_str(yaml)?;

        Self::with_products(fixture.products.into_iter().map(NewCartLine::from))
    }

    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails [`Catalog::from_yaml_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// Get a product by id.
    pub fn get(&self, id: ProductId) -> Option<&NewCartLine> {
        let &idx = self.index.get(&id)?;

        self.products.get(idx)
    }

    /// Products whose name, description or category contains `query`,
    /// ignoring case. An empty query matches everything.
    pub fn search<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a NewCartLine> + use<'a> {
        let query = query.trim().to_lowercase();

        self.products.iter().filter(move |product| {
            query.is_empty()
                || [&product.name, &product.description, &product.category]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&query))
        })
    }

    /// Iterate over products in fixture order.
    pub fn iter(&self) -> std::slice::Iter<'_, NewCartLine> {
        self.products.iter()
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a NewCartLine;
    type IntoIter = std::slice::Iter<'a, NewCartLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
