//! Catalog
//!
//! Immutable product reference data, kept in the order it was loaded.

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use slotmap::SlotMap;
use thiserror::Error;

use crate::products::{Category, Product, ProductKey};

pub mod filter;

use filter::{FilterCriteria, Selection, available_brands, filter_products};

/// Errors raised while building a catalog.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// A product with this id is already in the catalog.
    #[error("duplicate product id: {0}")]
    DuplicateProduct(String),

    /// A product is priced in a different currency to the catalog (product id, product
    /// currency, catalog currency).
    #[error("product {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(String, &'static str, &'static str),
}

/// Catalog
#[derive(Debug)]
pub struct Catalog<'a> {
    products: SlotMap<ProductKey, Product<'a>>,
    ids: FxHashMap<String, ProductKey>,
    order: Vec<ProductKey>,
    currency: &'static Currency,
}

impl<'a> Catalog<'a> {
    /// Create an empty catalog priced in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            products: SlotMap::with_key(),
            ids: FxHashMap::default(),
            order: Vec::new(),
            currency,
        }
    }

    /// Add a product to the end of the catalog.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::DuplicateProduct`]: the id is already taken.
    /// - [`CatalogError::CurrencyMismatch`]: the product is not priced in the catalog currency.
    pub fn insert(&mut self, product: Product<'a>) -> Result<ProductKey, CatalogError> {
        if self.ids.contains_key(&product.id) {
            return Err(CatalogError::DuplicateProduct(product.id));
        }

        let prices = std::iter::once(product.price).chain(product.original_price);

        for price in prices {
            if price.currency() != self.currency {
                return Err(CatalogError::CurrencyMismatch(
                    product.id,
                    price.currency().iso_alpha_code,
                    self.currency.iso_alpha_code,
                ));
            }
        }

        let id = product.id.clone();
        let key = self.products.insert(product);

        self.ids.insert(id, key);
        self.order.push(key);

        Ok(key)
    }

    /// Look up a product by id.
    pub fn get(&self, id: &str) -> Option<&Product<'a>> {
        let key = self.ids.get(id)?;

        self.products.get(*key)
    }

    /// Look up a product by key.
    pub fn get_by_key(&self, key: ProductKey) -> Option<&Product<'a>> {
        self.products.get(key)
    }

    /// Iterate the products in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Product<'a>> {
        self.order.iter().filter_map(|key| self.products.get(*key))
    }

    /// Products matching the criteria, in catalog order.
    pub fn search(&self, criteria: &FilterCriteria) -> Vec<&Product<'a>> {
        filter_products(self.iter(), criteria)
    }

    /// Brands available under a category selection, led by [`Selection::All`].
    pub fn brands(&self, category: Selection<Category>) -> Vec<Selection<&str>> {
        available_brands(self.iter(), category)
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Currency every product is priced in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
