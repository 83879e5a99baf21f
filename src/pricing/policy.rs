//! Pricing Policy

use decimal_percentage::Percentage;
use rust_decimal::Decimal;

/// Shipping and tax rules applied on top of the cart's item prices.
///
/// All amounts are in minor units of the cart currency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingPolicy {
    /// Flat shipping fee charged when the discounted subtotal does not exceed the threshold.
    pub shipping_fee: i64,

    /// Shipping is free once the discounted subtotal is strictly greater than this.
    pub free_shipping_threshold: i64,

    /// Tax charged on the discounted subtotal.
    pub tax_rate: Percentage,
}

impl PricingPolicy {
    /// Default flat shipping fee in minor units.
    pub const DEFAULT_SHIPPING_FEE: i64 = 1_000;

    /// Default free-shipping threshold in minor units.
    pub const DEFAULT_FREE_SHIPPING_THRESHOLD: i64 = 10_000;

    /// Create a policy.
    pub fn new(shipping_fee: i64, free_shipping_threshold: i64, tax_rate: Percentage) -> Self {
        Self {
            shipping_fee,
            free_shipping_threshold,
            tax_rate,
        }
    }

    /// Replace the shipping fee.
    #[must_use]
    pub fn with_shipping_fee(mut self, shipping_fee: i64) -> Self {
        self.shipping_fee = shipping_fee;
        self
    }

    /// Replace the free-shipping threshold.
    #[must_use]
    pub fn with_free_shipping_threshold(mut self, threshold: i64) -> Self {
        self.free_shipping_threshold = threshold;
        self
    }

    /// Replace the tax rate.
    #[must_use]
    pub fn with_tax_rate(mut self, tax_rate: Percentage) -> Self {
        self.tax_rate = tax_rate;
        self
    }

    /// Shipping owed on a discounted subtotal.
    pub fn shipping_for(&self, subtotal: i64) -> i64 {
        if subtotal > self.free_shipping_threshold {
            0
        } else {
            self.shipping_fee
        }
    }
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_SHIPPING_FEE,
            Self::DEFAULT_FREE_SHIPPING_THRESHOLD,
            Percentage::from(Decimal::new(1, 1)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipping_is_charged_up_to_and_including_the_threshold() {
        let policy = PricingPolicy::default();

        assert_eq!(policy.shipping_for(9_999), 1_000);
        assert_eq!(policy.shipping_for(10_000), 1_000);
        assert_eq!(policy.shipping_for(10_001), 0);
    }

    #[test]
    fn threshold_can_be_overridden() {
        let policy = PricingPolicy::default()
            .with_free_shipping_threshold(5_000)
            .with_shipping_fee(499);

        assert_eq!(policy.shipping_for(5_000), 499);
        assert_eq!(policy.shipping_for(5_001), 0);
    }
}
