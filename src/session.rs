//! Shopping Session
//!
//! Ties a cart, a pricing calculator, the signed-in user and the device's recently viewed
//! products together for one shopper.

use rusty_money::iso::Currency;
use tracing::info;

use crate::{
    cart::Cart,
    checkout::{CheckoutError, Identity, Order, ShippingDetails, checkout},
    pricing::{PricingCalculator, PricingError, Totals},
    products::Product,
    recent::{RecentProducts, RecentProductsStore},
};

/// A signed-in user, as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Provider user id
    pub id: String,
    /// Email address
    pub email: String,
}

/// One shopper's session state.
#[derive(Debug)]
pub struct Session<'a, S> {
    cart: Cart<'a>,
    calculator: PricingCalculator,
    user: Option<User>,
    recent: RecentProducts<S>,
}

impl<'a, S: RecentProductsStore> Session<'a, S> {
    /// Start a signed-out session with an empty cart.
    pub fn new(
        currency: &'static Currency,
        calculator: PricingCalculator,
        recent: RecentProducts<S>,
    ) -> Self {
        Self {
            cart: Cart::new(currency),
            calculator,
            user: None,
            recent,
        }
    }

    /// The cart.
    pub fn cart(&self) -> &Cart<'a> {
        &self.cart
    }

    /// The cart, for adding and removing items.
    pub fn cart_mut(&mut self) -> &mut Cart<'a> {
        &mut self.cart
    }

    /// The calculator pricing this session.
    pub fn calculator(&self) -> &PricingCalculator {
        &self.calculator
    }

    /// Current totals for the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the cart cannot be priced.
    pub fn totals(&self) -> Result<Totals, PricingError> {
        self.calculator.totals(&self.cart)
    }

    /// The signed-in user, if any.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Record a successful sign-in.
    pub fn sign_in(&mut self, user: User) {
        info!(user_id = %user.id, "signed in");

        self.user = Some(user);
    }

    /// Sign out. The cart is kept.
    pub fn sign_out(&mut self) {
        if let Some(user) = self.user.take() {
            info!(user_id = %user.id, "signed out");
        }
    }

    /// Record that the shopper opened a product page.
    pub fn view_product(&mut self, product: &Product<'_>) {
        self.recent.add(product);
    }

    /// Recently viewed products for this device.
    pub fn recent(&self) -> &RecentProducts<S> {
        &self.recent
    }

    /// Recently viewed products, for clearing.
    pub fn recent_mut(&mut self) -> &mut RecentProducts<S> {
        &mut self.recent
    }

    /// Place an order for the cart's contents.
    ///
    /// # Errors
    ///
    /// See [`checkout`].
    pub fn checkout(&mut self, shipping: ShippingDetails) -> Result<Order, CheckoutError> {
        checkout(&mut self.cart, &self.calculator, &self.user, shipping)
    }
}

impl<S> Identity for Session<'_, S> {
    fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use crate::{
        pricing::PricingPolicy,
        products::Category,
        recent::MemoryRecentProductsStore,
    };

    use super::*;

    fn session<'a>() -> Session<'a, MemoryRecentProductsStore> {
        Session::new(
            USD,
            PricingCalculator::default(),
            RecentProducts::load("phone", MemoryRecentProductsStore::new()),
        )
    }

    fn user() -> User {
        User {
            id: "u-1".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    fn details() -> ShippingDetails {
        ShippingDetails {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            address: "12 Analytical Row".to_string(),
            city: "London".to_string(),
            phone: "555 0100".to_string(),
        }
    }

    #[test]
    fn new_session_is_signed_out_with_empty_cart() {
        let session = session();

        assert!(!session.is_signed_in());
        assert!(session.cart().is_empty());
        assert!(session.recent().ids().is_empty());
    }

    #[test]
    fn checkout_needs_sign_in_and_keeps_cart_on_failure() {
        let lamp = Product::new("1", "Lamp", Category::HomeAndKitchen, Money::from_minor(2_500, USD));
        let mut session = session();
        session.cart_mut().add(&lamp);

        assert_eq!(session.checkout(details()), Err(CheckoutError::NotSignedIn));
        assert_eq!(session.cart().item_count(), 1);
    }

    #[test]
    fn signed_in_checkout_clears_cart() -> TestResult {
        let lamp = Product::new("1", "Lamp", Category::HomeAndKitchen, Money::from_minor(2_500, USD));
        let mut session = session();
        session.sign_in(user());
        session.cart_mut().add(&lamp);

        let expected = session.totals()?;
        let order = session.checkout(details())?;

        assert_eq!(order.totals, expected);
        assert!(session.cart().is_empty());

        Ok(())
    }

    #[test]
    fn sign_out_keeps_cart() {
        let lamp = Product::new("1", "Lamp", Category::HomeAndKitchen, Money::from_minor(2_500, USD));
        let mut session = session();
        session.sign_in(user());
        session.cart_mut().add(&lamp);

        session.sign_out();

        assert!(!session.is_signed_in());
        assert_eq!(session.user(), None);
        assert_eq!(session.cart().len(), 1);
    }

    #[test]
    fn viewing_products_records_recent() {
        let lamp = Product::new("1", "Lamp", Category::HomeAndKitchen, Money::from_minor(2_500, USD));
        let kettle = Product::new("2", "Kettle", Category::HomeAndKitchen, Money::from_minor(3_000, USD));
        let mut session = session();

        session.view_product(&lamp);
        session.view_product(&kettle);

        assert_eq!(session.recent().ids(), ["2", "1"]);

        session.recent_mut().clear();

        assert!(session.recent().ids().is_empty());
    }

    #[test]
    fn totals_follow_session_policy() -> TestResult {
        let lamp = Product::new("1", "Lamp", Category::HomeAndKitchen, Money::from_minor(2_500, USD));
        let policy = PricingPolicy::default().with_shipping_fee(0);
        let mut session = Session::new(
            USD,
            PricingCalculator::new(policy),
            RecentProducts::load("phone", MemoryRecentProductsStore::new()),
        );
        session.cart_mut().add(&lamp);

        let totals = session.totals()?;

        assert_eq!(totals.shipping.to_minor_units(), 0);
        assert_eq!(totals.grand_total, Money::from_minor(2_750, USD));

        Ok(())
    }
}
