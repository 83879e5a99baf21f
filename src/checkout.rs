//! Checkout
//!
//! Turns a cart into an [`Order`] once the shopper is signed in and has given complete
//! shipping details. A successful checkout empties the cart.

use std::fmt;

use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::info;

use crate::{
    cart::{Cart, LineItem},
    pricing::{PricingCalculator, PricingError, Totals},
};

/// Anything that can tell whether a shopper is signed in.
pub trait Identity {
    /// Whether a user is currently signed in.
    fn is_signed_in(&self) -> bool;
}

impl Identity for bool {
    fn is_signed_in(&self) -> bool {
        *self
    }
}

impl<T> Identity for Option<T> {
    fn is_signed_in(&self) -> bool {
        self.is_some()
    }
}

/// Shipping details fields, named in validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShippingField {
    /// Recipient name
    Name,
    /// Contact email
    Email,
    /// Street address
    Address,
    /// City
    City,
    /// Contact phone number
    Phone,
}

impl fmt::Display for ShippingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShippingField::Name => "name",
            ShippingField::Email => "email",
            ShippingField::Address => "address",
            ShippingField::City => "city",
            ShippingField::Phone => "phone",
        })
    }
}

/// Errors that stop a checkout. The cart is left untouched when one is returned.
#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    /// Nobody is signed in.
    #[error("sign in to check out")]
    NotSignedIn,

    /// The cart has no line items.
    #[error("cart is empty")]
    EmptyCart,

    /// A shipping details field is blank.
    #[error("shipping {0} is required")]
    MissingField(ShippingField),

    /// The cart could not be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Where to ship an order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingDetails {
    /// Recipient name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Street address
    pub address: String,
    /// City
    pub city: String,
    /// Contact phone number
    pub phone: String,
}

impl ShippingDetails {
    /// Check that every field has non-whitespace content.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::MissingField`] naming the first blank field.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let fields = [
            (ShippingField::Name, &self.name),
            (ShippingField::Email, &self.email),
            (ShippingField::Address, &self.address),
            (ShippingField::City, &self.city),
            (ShippingField::Phone, &self.phone),
        ];

        match fields.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(CheckoutError::MissingField(*field)),
            None => Ok(()),
        }
    }
}

/// One line of a placed order, copied out of the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    /// Product id
    pub product_id: String,
    /// Product name at time of purchase
    pub name: String,
    /// Brand at time of purchase
    pub brand: Option<String>,
    /// Unit price paid
    pub unit_price: Money<'static, Currency>,
    /// Unit price before markdown, if the product was discounted
    pub original_unit_price: Option<Money<'static, Currency>>,
    /// Units bought
    pub quantity: u32,
}

impl OrderLine {
    pub(crate) fn from_line_item(item: &LineItem<'_>, currency: &'static Currency) -> Self {
        let product = item.product();

        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            unit_price: Money::from_minor(product.price.to_minor_units(), currency),
            original_unit_price: product
                .original_price
                .map(|price| Money::from_minor(price.to_minor_units(), currency)),
            quantity: item.quantity(),
        }
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    /// Lines in cart order
    pub lines: Vec<OrderLine>,
    /// Totals charged
    pub totals: Totals,
    /// Shipping destination
    pub shipping: ShippingDetails,
}

impl Order {
    /// Total units across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }
}

/// Place an order for everything in `cart`, then clear it.
///
/// # Errors
///
/// - [`CheckoutError::NotSignedIn`]: `identity` has no signed-in user.
/// - [`CheckoutError::EmptyCart`]: there is nothing to buy.
/// - [`CheckoutError::MissingField`]: a shipping field is blank.
/// - [`CheckoutError::Pricing`]: the cart could not be priced.
pub fn checkout<I>(
    cart: &mut Cart<'_>,
    calculator: &PricingCalculator,
    identity: &I,
    shipping: ShippingDetails,
) -> Result<Order, CheckoutError>
where
    I: Identity + ?Sized,
{
    if !identity.is_signed_in() {
        return Err(CheckoutError::NotSignedIn);
    }

    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    shipping.validate()?;

    let totals = calculator.totals(cart)?;
    let currency = cart.currency();

    let lines = cart
        .items()
        .iter()
        .map(|item| OrderLine::from_line_item(item, currency))
        .collect();

    let order = Order {
        lines,
        totals,
        shipping,
    };

    cart.clear();

    info!(
        items = order.item_count(),
        grand_total = %order.totals.grand_total,
        "order placed"
    );

    Ok(order)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::products::{Category, Product};

    use super::*;

    fn details() -> ShippingDetails {
        ShippingDetails {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            address: "12 Analytical Row".to_string(),
            city: "London".to_string(),
            phone: "+44 20 7946 0000".to_string(),
        }
    }

    fn headphones() -> Product<'static> {
        Product::new(
            "1",
            "Headphones",
            Category::Electronics,
            Money::from_minor(15_000, USD),
        )
        .with_brand("Sony")
        .with_original_price(Money::from_minor(20_000, USD))
    }

    #[test]
    fn checkout_returns_order_and_clears_cart() -> TestResult {
        let product = headphones();
        let mut cart = Cart::new(USD);
        cart.add(&product);
        cart.add(&product);

        let calculator = PricingCalculator::default();
        let expected = calculator.totals(&cart)?;

        let order = checkout(&mut cart, &calculator, &true, details())?;

        assert!(cart.is_empty());
        assert_eq!(order.totals, expected);
        assert_eq!(order.item_count(), 2);
        assert_eq!(
            order.lines.first().map(|line| (line.product_id.as_str(), line.quantity)),
            Some(("1", 2))
        );
        assert_eq!(
            order.lines.first().and_then(|line| line.original_unit_price),
            Some(Money::from_minor(20_000, USD))
        );

        Ok(())
    }

    #[test]
    fn checkout_requires_sign_in() {
        let product = headphones();
        let mut cart = Cart::new(USD);
        cart.add(&product);

        let signed_out: Option<String> = None;
        let result = checkout(&mut cart, &PricingCalculator::default(), &signed_out, details());

        assert_eq!(result, Err(CheckoutError::NotSignedIn));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn checkout_rejects_empty_cart() {
        let mut cart = Cart::new(USD);

        let result = checkout(&mut cart, &PricingCalculator::default(), &true, details());

        assert_eq!(result, Err(CheckoutError::EmptyCart));
    }

    #[test]
    fn checkout_rejects_blank_shipping_fields() {
        let product = headphones();
        let mut cart = Cart::new(USD);
        cart.add(&product);

        let mut incomplete = details();
        incomplete.city = "   ".to_string();

        let result = checkout(&mut cart, &PricingCalculator::default(), &true, incomplete);

        assert_eq!(result, Err(CheckoutError::MissingField(ShippingField::City)));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn validate_reports_first_blank_field() {
        assert_eq!(
            ShippingDetails::default().validate(),
            Err(CheckoutError::MissingField(ShippingField::Name))
        );
        assert_eq!(details().validate(), Ok(()));
    }
}
