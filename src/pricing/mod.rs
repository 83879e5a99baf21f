//! Pricing
//!
//! Monetary totals derived from a cart. Nothing is cached: every call walks the current
//! line items, so totals can never go stale after a cart mutation.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::cart::{Cart, LineItem};

mod policy;

pub use policy::PricingPolicy;

/// Errors that can occur while pricing a cart.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// A product is priced in a different currency to the cart (product id, product
    /// currency, cart currency).
    #[error("product {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(String, &'static str, &'static str),

    /// An amount no longer fits in minor units.
    #[error("amount overflowed while pricing cart")]
    Overflow,

    /// A percentage could not be applied to an amount.
    #[error("percentage conversion overflowed")]
    PercentConversion,
}

/// Every derived total for a cart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    /// Sum of list prices (original price where present) times quantity.
    pub before_discount: Money<'static, Currency>,

    /// Sum of markdowns times quantity.
    pub discount: Money<'static, Currency>,

    /// `before_discount - discount`
    pub subtotal: Money<'static, Currency>,

    /// Shipping owed under the policy.
    pub shipping: Money<'static, Currency>,

    /// Tax owed on the subtotal.
    pub tax: Money<'static, Currency>,

    /// `subtotal + shipping + tax`
    pub grand_total: Money<'static, Currency>,
}

/// Prices carts under a [`PricingPolicy`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PricingCalculator {
    policy: PricingPolicy,
}

impl PricingCalculator {
    /// Create a calculator for the given policy.
    pub fn new(policy: PricingPolicy) -> Self {
        Self { policy }
    }

    /// The policy in use.
    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// Sum over line items of list price times quantity.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] on currency mismatch or overflow.
    pub fn total_before_discount(
        &self,
        cart: &Cart<'_>,
    ) -> Result<Money<'static, Currency>, PricingError> {
        let minor = before_discount_minor(cart)?;

        Ok(Money::from_minor(minor, cart.currency()))
    }

    /// Sum over line items of markdown times quantity. Items without an original price
    /// contribute nothing.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] on currency mismatch or overflow.
    pub fn total_discount(&self, cart: &Cart<'_>) -> Result<Money<'static, Currency>, PricingError> {
        let minor = discount_minor(cart)?;

        Ok(Money::from_minor(minor, cart.currency()))
    }

    /// Shipping owed: the flat fee, or zero when the discounted subtotal exceeds the
    /// free-shipping threshold.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] on currency mismatch or overflow.
    pub fn shipping_cost(&self, cart: &Cart<'_>) -> Result<Money<'static, Currency>, PricingError> {
        let subtotal = subtotal_minor(cart)?;

        Ok(Money::from_minor(
            self.policy.shipping_for(subtotal),
            cart.currency(),
        ))
    }

    /// Tax on the discounted subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] on currency mismatch, overflow, or if the tax rate cannot
    /// be applied.
    pub fn tax(&self, cart: &Cart<'_>) -> Result<Money<'static, Currency>, PricingError> {
        let subtotal = subtotal_minor(cart)?;
        let tax = percent_of_minor(&self.policy.tax_rate, subtotal)?;

        Ok(Money::from_minor(tax, cart.currency()))
    }

    /// `total_before_discount - total_discount + shipping_cost + tax`
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] on currency mismatch, overflow, or if the tax rate cannot
    /// be applied.
    pub fn grand_total(&self, cart: &Cart<'_>) -> Result<Money<'static, Currency>, PricingError> {
        Ok(self.totals(cart)?.grand_total)
    }

    /// Compute every total in one pass.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] on currency mismatch, overflow, or if the tax rate cannot
    /// be applied.
    pub fn totals(&self, cart: &Cart<'_>) -> Result<Totals, PricingError> {
        let currency = cart.currency();

        let before_discount = before_discount_minor(cart)?;
        let discount = discount_minor(cart)?;
        let subtotal = before_discount
            .checked_sub(discount)
            .ok_or(PricingError::Overflow)?;

        let shipping = self.policy.shipping_for(subtotal);
        let tax = percent_of_minor(&self.policy.tax_rate, subtotal)?;

        let grand_total = subtotal
            .checked_add(shipping)
            .and_then(|total| total.checked_add(tax))
            .ok_or(PricingError::Overflow)?;

        Ok(Totals {
            before_discount: Money::from_minor(before_discount, currency),
            discount: Money::from_minor(discount, currency),
            subtotal: Money::from_minor(subtotal, currency),
            shipping: Money::from_minor(shipping, currency),
            tax: Money::from_minor(tax, currency),
            grand_total: Money::from_minor(grand_total, currency),
        })
    }
}

fn before_discount_minor(cart: &Cart<'_>) -> Result<i64, PricingError> {
    sum_lines(cart, |item| item.product().list_price().to_minor_units())
}

fn discount_minor(cart: &Cart<'_>) -> Result<i64, PricingError> {
    sum_lines(cart, |item| item.product().unit_discount_minor())
}

fn subtotal_minor(cart: &Cart<'_>) -> Result<i64, PricingError> {
    before_discount_minor(cart)?
        .checked_sub(discount_minor(cart)?)
        .ok_or(PricingError::Overflow)
}

/// Sum `unit(item) * quantity` over the cart, checking currencies as we go.
fn sum_lines(cart: &Cart<'_>, unit: impl Fn(&LineItem<'_>) -> i64) -> Result<i64, PricingError> {
    cart.items().iter().try_fold(0_i64, |total, item| {
        ensure_currency(cart, item)?;

        unit(item)
            .checked_mul(i64::from(item.quantity()))
            .and_then(|line| total.checked_add(line))
            .ok_or(PricingError::Overflow)
    })
}

fn ensure_currency(cart: &Cart<'_>, item: &LineItem<'_>) -> Result<(), PricingError> {
    let product = item.product();
    let prices = std::iter::once(product.price).chain(product.original_price);

    for price in prices {
        if price.currency() != cart.currency() {
            return Err(PricingError::CurrencyMismatch(
                product.id.clone(),
                price.currency().iso_alpha_code,
                cart.currency().iso_alpha_code,
            ));
        }
    }

    Ok(())
}

/// Apply a percentage to a minor unit amount, rounding half away from zero.
///
/// # Errors
///
/// Returns [`PricingError::PercentConversion`] if the result does not fit in minor units.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, PricingError> {
    let minor = Decimal::from_i64(minor).ok_or(PricingError::PercentConversion)?;

    ((*percent) * Decimal::ONE)
        .checked_mul(minor)
        .ok_or(PricingError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::PercentConversion)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use crate::products::{Category, Product};

    use super::*;

    fn usd(minor: i64) -> Money<'static, Currency> {
        Money::from_minor(minor, USD)
    }

    #[test]
    fn full_price_item_below_threshold() -> TestResult {
        let product = Product::new("1", "Speaker", Category::Electronics, usd(10_000));
        let mut cart = Cart::new(USD);
        cart.add(&product);

        let calculator = PricingCalculator::default();
        let totals = calculator.totals(&cart)?;

        assert_eq!(totals.before_discount, usd(10_000));
        assert_eq!(totals.discount, usd(0));
        assert_eq!(totals.shipping, usd(1_000));
        assert_eq!(totals.tax, usd(1_000));
        assert_eq!(totals.grand_total, usd(12_000));

        Ok(())
    }

    #[test]
    fn discounted_item_above_threshold_ships_free() -> TestResult {
        let product = Product::new("1", "Headphones", Category::Electronics, usd(15_000))
            .with_original_price(usd(20_000));
        let mut cart = Cart::new(USD);
        cart.add(&product);

        let calculator = PricingCalculator::default();

        assert_eq!(calculator.total_before_discount(&cart)?, usd(20_000));
        assert_eq!(calculator.total_discount(&cart)?, usd(5_000));
        assert_eq!(calculator.shipping_cost(&cart)?, usd(0));
        assert_eq!(calculator.tax(&cart)?, usd(1_500));
        assert_eq!(calculator.grand_total(&cart)?, usd(16_500));

        Ok(())
    }

    #[test]
    fn quantities_multiply_line_amounts() -> TestResult {
        let product = Product::new("1", "Mug", Category::HomeAndKitchen, usd(1_200))
            .with_original_price(usd(1_500));
        let mut cart = Cart::new(USD);
        cart.add(&product);
        cart.update_quantity("1", 3);

        let totals = PricingCalculator::default().totals(&cart)?;

        assert_eq!(totals.before_discount, usd(4_500));
        assert_eq!(totals.discount, usd(900));
        assert_eq!(totals.subtotal, usd(3_600));

        Ok(())
    }

    #[test]
    fn empty_cart_prices_to_zero_items() -> TestResult {
        let cart = Cart::new(USD);

        let totals = PricingCalculator::default().totals(&cart)?;

        assert_eq!(totals.before_discount, usd(0));
        assert_eq!(totals.discount, usd(0));
        assert_eq!(totals.tax, usd(0));

        Ok(())
    }

    #[test]
    fn threshold_is_part_of_the_policy() -> TestResult {
        let product = Product::new("1", "Speaker", Category::Electronics, usd(6_000));
        let mut cart = Cart::new(USD);
        cart.add(&product);

        let default = PricingCalculator::default();
        let generous =
            PricingCalculator::new(PricingPolicy::default().with_free_shipping_threshold(5_000));

        assert_eq!(default.shipping_cost(&cart)?, usd(1_000));
        assert_eq!(generous.shipping_cost(&cart)?, usd(0));

        Ok(())
    }

    #[test]
    fn tax_rounds_half_away_from_zero() -> TestResult {
        let product = Product::new("1", "Pen", Category::Books, usd(105));
        let mut cart = Cart::new(USD);
        cart.add(&product);

        // 10% of 1.05 is 0.105
        assert_eq!(PricingCalculator::default().tax(&cart)?, usd(11));

        Ok(())
    }

    #[test]
    fn original_price_below_price_is_not_a_negative_discount() -> TestResult {
        let product = Product::new("1", "Lamp", Category::HomeAndKitchen, usd(5_000))
            .with_original_price(usd(4_000));
        let mut cart = Cart::new(USD);
        cart.add(&product);

        let totals = PricingCalculator::default().totals(&cart)?;

        assert_eq!(totals.discount, usd(0));

        Ok(())
    }

    #[test]
    fn currency_mismatch_is_reported() {
        let product = Product::new("1", "Tea", Category::HomeAndKitchen, Money::from_minor(300, GBP));
        let mut cart = Cart::new(USD);
        cart.add(&product);

        assert_eq!(
            PricingCalculator::default().totals(&cart),
            Err(PricingError::CurrencyMismatch("1".to_string(), "GBP", "USD"))
        );
    }

    #[test]
    fn overflow_is_reported() {
        let product = Product::new("1", "Yacht", Category::Sports, usd(i64::MAX));
        let mut cart = Cart::new(USD);
        cart.add(&product);
        cart.update_quantity("1", 2);

        assert_eq!(
            PricingCalculator::default().total_before_discount(&cart),
            Err(PricingError::Overflow)
        );
    }

    #[test]
    fn percent_of_minor_calculates_correctly() -> TestResult {
        assert_eq!(percent_of_minor(&Percentage::from(0.25), 200)?, 50);

        Ok(())
    }

    #[test]
    fn percent_of_minor_overflow_returns_error() {
        let result = percent_of_minor(&Percentage::from(2.0), i64::MAX);

        assert_eq!(result, Err(PricingError::PercentConversion));
    }
}
