//! Pricing Policy Fixtures

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    fixtures::{FixtureError, products::parse_amount},
    pricing::PricingPolicy,
};

/// Pricing policy file contents. Omitted fields keep the default policy's value.
#[derive(Debug, Default, Deserialize)]
pub struct PolicyFixture {
    /// Flat shipping fee (e.g., "10.00")
    #[serde(default)]
    pub shipping_fee: Option<String>,

    /// Free-shipping threshold (e.g., "100.00")
    #[serde(default)]
    pub free_shipping_threshold: Option<String>,

    /// Tax rate (e.g., "10%" or "0.1")
    #[serde(default)]
    pub tax_rate: Option<String>,
}

impl TryFrom<PolicyFixture> for PricingPolicy {
    type Error = FixtureError;

    fn try_from(fixture: PolicyFixture) -> Result<Self, Self::Error> {
        let mut policy = PricingPolicy::default();

        if let Some(fee) = fixture.shipping_fee.as_deref() {
            policy = policy.with_shipping_fee(parse_amount(fee)?);
        }

        if let Some(threshold) = fixture.free_shipping_threshold.as_deref() {
            policy = policy.with_free_shipping_threshold(parse_amount(threshold)?);
        }

        if let Some(rate) = fixture.tax_rate.as_deref() {
            policy = policy.with_tax_rate(parse_percentage(rate)?);
        }

        Ok(policy)
    }
}

/// Parse percentage string (e.g., "15%" or "0.15") into a `Percentage`
///
/// Accepts two formats:
/// - Percentage format: "15%" for 15%
/// - Decimal format: "0.15" for 15%
///
/// # Errors
///
/// Returns an error if the string cannot be parsed or the value is negative.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    let value = if let Some(percent_str) = trimmed.strip_suffix('%') {
        percent_str
            .trim()
            .parse::<Decimal>()
            .map(|value| value / Decimal::ONE_HUNDRED)
    } else {
        trimmed.parse::<Decimal>()
    }
    .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

    if value.is_sign_negative() {
        return Err(FixtureError::InvalidPercentage(s.to_string()));
    }

    Ok(Percentage::from(value))
}
