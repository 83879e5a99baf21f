//! Cart
//!
//! The shopper's cart: an ordered list of line items, at most one per product. Totals are
//! never stored here; see [`crate::pricing`].

use std::num::NonZeroU32;

use rusty_money::iso::Currency;
use tracing::debug;

use crate::products::Product;

mod line_item;

pub use line_item::LineItem;

/// Cart
#[derive(Debug, Clone)]
pub struct Cart<'a> {
    items: Vec<LineItem<'a>>,
    currency: &'static Currency,
}

impl<'a> Cart<'a> {
    /// Create an empty cart. The currency is used to price an empty cart.
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            items: Vec::new(),
            currency,
        }
    }

    /// Add one unit of `product`, creating its line item on first add.
    pub fn add(&mut self, product: &'a Product<'a>) {
        if let Some(item) = self.find_mut(&product.id) {
            item.increment();

            debug!(
                product_id = %product.id,
                quantity = item.quantity(),
                "incremented cart line item"
            );

            return;
        }

        self.items.push(LineItem::new(product));

        debug!(product_id = %product.id, "added product to cart");
    }

    /// Remove the line item for `product_id`. Unknown ids are ignored.
    pub fn remove(&mut self, product_id: &str) {
        let before = self.items.len();

        self.items.retain(|item| item.product_id() != product_id);

        if self.items.len() != before {
            debug!(product_id, "removed product from cart");
        }
    }

    /// Set the quantity for `product_id`.
    ///
    /// A quantity of zero removes the line item. Unknown ids are ignored.
    pub fn update_quantity(&mut self, product_id: &str, quantity: u32) {
        let Some(quantity) = NonZeroU32::new(quantity) else {
            self.remove(product_id);
            return;
        };

        if let Some(item) = self.find_mut(product_id) {
            item.set_quantity(quantity);

            debug!(product_id, quantity = quantity.get(), "updated cart quantity");
        }
    }

    /// Remove every line item.
    pub fn clear(&mut self) {
        self.items.clear();

        debug!("cleared cart");
    }

    /// Total number of units across all line items.
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity()))
            .sum()
    }

    /// Line items in the order they were first added.
    pub fn items(&self) -> &[LineItem<'a>] {
        &self.items
    }

    /// Line item for `product_id`, if the product is in the cart.
    pub fn get(&self, product_id: &str) -> Option<&LineItem<'a>> {
        self.items
            .iter()
            .find(|item| item.product_id() == product_id)
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no line items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn find_mut(&mut self, product_id: &str) -> Option<&mut LineItem<'a>> {
        self.items
            .iter_mut()
            .find(|item| item.product_id() == product_id)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};

    use crate::products::Category;

    use super::*;

    fn phone() -> Product<'static> {
        Product::new("1", "Phone", Category::Electronics, Money::from_minor(10_000, USD))
    }

    fn lamp() -> Product<'static> {
        Product::new("2", "Lamp", Category::HomeAndKitchen, Money::from_minor(2_500, USD))
    }

    fn quantities<'p>(cart: &Cart<'p>) -> Vec<(&'p str, u32)> {
        cart.items()
            .iter()
            .map(|item| (item.product_id(), item.quantity()))
            .collect()
    }

    #[test]
    fn new_cart_is_empty() {
        let cart = Cart::new(USD);

        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.currency(), USD);
    }

    #[test]
    fn adding_twice_increments_a_single_line_item() {
        let phone = phone();
        let mut cart = Cart::new(USD);

        cart.add(&phone);
        cart.add(&phone);

        assert_eq!(cart.len(), 1);
        assert_eq!(quantities(&cart), [("1", 2)]);
    }

    #[test]
    fn add_keeps_first_added_order() {
        let (phone, lamp) = (phone(), lamp());
        let mut cart = Cart::new(USD);

        cart.add(&lamp);
        cart.add(&phone);
        cart.add(&lamp);

        assert_eq!(quantities(&cart), [("2", 2), ("1", 1)]);
    }

    #[test]
    fn remove_is_idempotent() {
        let (phone, lamp) = (phone(), lamp());
        let mut cart = Cart::new(USD);

        cart.add(&phone);
        cart.add(&lamp);

        cart.remove("1");
        let once = quantities(&cart);

        cart.remove("1");

        assert_eq!(quantities(&cart), once);
        assert_eq!(once, [("2", 1)]);
    }

    #[test]
    fn remove_unknown_id_is_a_no_op() {
        let phone = phone();
        let mut cart = Cart::new(USD);

        cart.add(&phone);
        cart.remove("missing");

        assert_eq!(quantities(&cart), [("1", 1)]);
    }

    #[test]
    fn update_quantity_sets_quantity() {
        let phone = phone();
        let mut cart = Cart::new(USD);

        cart.add(&phone);
        cart.update_quantity("1", 5);

        assert_eq!(cart.get("1").map(LineItem::quantity), Some(5));
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn update_quantity_to_zero_removes_line_item() {
        let (phone, lamp) = (phone(), lamp());
        let mut cart = Cart::new(USD);

        cart.add(&phone);
        cart.add(&lamp);
        cart.update_quantity("1", 0);

        assert!(cart.get("1").is_none());
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn update_quantity_for_unknown_id_is_a_no_op() {
        let phone = phone();
        let mut cart = Cart::new(USD);

        cart.add(&phone);
        cart.update_quantity("missing", 3);

        assert_eq!(quantities(&cart), [("1", 1)]);
    }

    #[test]
    fn item_count_sums_quantities() {
        let (phone, lamp) = (phone(), lamp());
        let mut cart = Cart::new(USD);

        cart.add(&phone);
        cart.add(&lamp);
        cart.update_quantity("2", 4);

        let sum: u64 = cart.items().iter().map(|i| u64::from(i.quantity())).sum();

        assert_eq!(cart.item_count(), 5);
        assert_eq!(cart.item_count(), sum);
    }

    #[test]
    fn clear_empties_the_cart() {
        let (phone, lamp) = (phone(), lamp());
        let mut cart = Cart::new(USD);

        cart.add(&phone);
        cart.add(&lamp);
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
    }
}
