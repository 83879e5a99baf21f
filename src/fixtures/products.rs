//! Product Fixtures

use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;
use smallvec::SmallVec;

use crate::{fixtures::FixtureError, products::Product};

/// Catalog file contents
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Catalog currency code. Inferred from the first product when omitted.
    #[serde(default)]
    pub currency: Option<String>,

    /// Products, in catalog order
    #[serde(default)]
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product id
    pub id: String,

    /// Product name
    pub name: String,

    /// Brand
    #[serde(default)]
    pub brand: Option<String>,

    /// Category display name (e.g. "Home & Kitchen")
    pub category: String,

    /// Price (e.g., "1299.00 USD")
    pub price: String,

    /// Pre-markdown price (e.g., "1399.00 USD")
    #[serde(default)]
    pub original_price: Option<String>,

    /// Rating between 0 and 5
    #[serde(default)]
    pub rating: Option<f64>,

    /// Review count
    #[serde(default)]
    pub reviews: Option<u32>,

    /// Stock flag
    #[serde(default = "in_stock_default")]
    pub in_stock: bool,

    /// Description
    #[serde(default)]
    pub description: String,

    /// Specification attributes
    #[serde(default)]
    pub specifications: FxHashMap<String, String>,

    /// Colour variants
    #[serde(default)]
    pub colors: Vec<String>,

    /// Size variants
    #[serde(default)]
    pub sizes: Vec<String>,
}

fn in_stock_default() -> bool {
    true
}

impl TryFrom<ProductFixture> for Product<'static> {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.price)?;
        let price = Money::from_minor(minor_units, currency);

        let original_price = fixture
            .original_price
            .as_deref()
            .map(parse_price)
            .transpose()?
            .map(|(minor, currency)| Money::from_minor(minor, currency));

        if let Some(original) = original_price {
            if original.currency() != currency {
                return Err(FixtureError::CurrencyMismatch(
                    currency.iso_alpha_code.to_string(),
                    original.currency().iso_alpha_code.to_string(),
                ));
            }

            if original.to_minor_units() <= minor_units {
                return Err(FixtureError::InvalidOriginalPrice(fixture.id));
            }
        }

        let rating = fixture
            .rating
            .map(|rating| parse_rating(&fixture.id, rating))
            .transpose()?;

        let mut product = Product::new(fixture.id, fixture.name, fixture.category.parse()?, price);

        product.brand = fixture.brand;
        product.original_price = original_price;
        product.rating = rating;
        product.review_count = fixture.reviews;
        product.in_stock = fixture.in_stock;
        product.description = fixture.description;
        product.specifications = fixture.specifications;
        product.colors = SmallVec::from_vec(fixture.colors);
        product.sizes = SmallVec::from_vec(fixture.sizes);

        Ok(product)
    }
}

fn parse_rating(id: &str, rating: f64) -> Result<Decimal, FixtureError> {
    Decimal::from_f64(rating)
        .map(|rating| rating.round_dp(1))
        .filter(|rating| (Decimal::ZERO..=Decimal::from(5)).contains(rating))
        .ok_or_else(|| FixtureError::InvalidRating(id.to_string()))
}

/// Parse price string (e.g., "2.99 USD") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed, is negative, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let minor_units = parse_amount(amount)?;
    let currency = parse_currency(currency_code)?;

    Ok((minor_units, currency))
}

/// Parse a bare amount (e.g., "10.00") into minor units.
///
/// # Errors
///
/// Returns [`FixtureError::InvalidPrice`] if the amount is not a non-negative decimal with at
/// most two decimal places that fits in minor units.
pub fn parse_amount(s: &str) -> Result<i64, FixtureError> {
    let amount = s
        .trim()
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() || amount.normalize().scale() > 2 {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    }

    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| value.to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))
}

/// Resolve an ISO currency code.
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] for codes other than GBP, USD and EUR.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code.trim() {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}
