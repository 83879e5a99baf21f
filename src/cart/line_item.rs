//! Line Items

use std::num::NonZeroU32;

use crate::products::Product;

/// One product in a cart and how many of it.
#[derive(Debug, Clone, Copy)]
pub struct LineItem<'a> {
    product: &'a Product<'a>,
    quantity: NonZeroU32,
}

impl<'a> LineItem<'a> {
    /// Create a line item holding a single unit of `product`.
    pub fn new(product: &'a Product<'a>) -> Self {
        Self {
            product,
            quantity: NonZeroU32::MIN,
        }
    }

    /// Create a line item with the given quantity.
    pub fn with_quantity(product: &'a Product<'a>, quantity: NonZeroU32) -> Self {
        Self { product, quantity }
    }

    /// The product
    pub fn product(&self) -> &'a Product<'a> {
        self.product
    }

    /// Id of the product
    pub fn product_id(&self) -> &'a str {
        &self.product.id
    }

    /// Number of units, always at least 1.
    pub fn quantity(&self) -> u32 {
        self.quantity.get()
    }

    pub(crate) fn set_quantity(&mut self, quantity: NonZeroU32) {
        self.quantity = quantity;
    }

    pub(crate) fn increment(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }
}
