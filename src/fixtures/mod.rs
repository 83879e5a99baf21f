//! Fixtures
//!
//! YAML catalogs and pricing policies, laid out as `<base>/catalog/<name>.yml` and
//! `<base>/policy/<name>.yml`.

use std::{fs, path::PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::{
    catalog::{Catalog, CatalogError},
    fixtures::{policy::PolicyFixture, products::CatalogFixture},
    pricing::PricingPolicy,
    products::{Product, UnknownCategory},
};

pub mod policy;
pub mod products;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Unknown category name
    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategory),

    /// Original price is not above the selling price
    #[error("Original price must be greater than price for product {0}")]
    InvalidOriginalPrice(String),

    /// Rating outside 0 to 5
    #[error("Rating must be between 0 and 5 for product {0}")]
    InvalidRating(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Catalog declares no currency and has no products to infer one from
    #[error("Catalog has no products and no currency; currency unknown")]
    NoCurrency,

    /// Catalog construction error
    #[error("Failed to build catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Fixture
#[derive(Debug, Clone)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,
}

impl Fixture {
    /// Create a fixture loader rooted at `./fixtures`
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a fixture loader with a custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Load a catalog from `catalog/<name>.yml`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if any product is invalid.
    pub fn load_catalog(&self, name: &str) -> Result<Catalog<'static>, FixtureError> {
        let file_path = self.base_path.join("catalog").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        debug!(path = %file_path.display(), "loading catalog fixture");

        catalog_from_str(&contents)
    }

    /// Load a pricing policy from `policy/<name>.yml`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if an amount is invalid.
    pub fn load_policy(&self, name: &str) -> Result<PricingPolicy, FixtureError> {
        let file_path = self.base_path.join("policy").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        debug!(path = %file_path.display(), "loading pricing policy fixture");

        policy_from_str(&contents)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a catalog from YAML text.
///
/// # Errors
///
/// Returns an error if the YAML cannot be parsed, a product is invalid, or products are
/// priced in different currencies.
pub fn catalog_from_str(yaml: &str) -> Result<Catalog<'static>, FixtureError> {
    let fixture: CatalogFixture = serde_norway::from_str(yaml)?;

    let declared = fixture
        .currency
        .as_deref()
        .map(products::parse_currency)
        .transpose()?;

    let products = fixture
        .products
        .into_iter()
        .map(Product::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let currency = match (declared, products.first()) {
        (Some(currency), _) => currency,
        (None, Some(first)) => first.price.currency(),
        (None, None) => return Err(FixtureError::NoCurrency),
    };

    let mut catalog = Catalog::new(currency);

    for product in products {
        let product_currency = product.price.currency();

        if product_currency != currency {
            return Err(FixtureError::CurrencyMismatch(
                currency.iso_alpha_code.to_string(),
                product_currency.iso_alpha_code.to_string(),
            ));
        }

        catalog.insert(product)?;
    }

    Ok(catalog)
}

/// Build a pricing policy from YAML text.
///
/// # Errors
///
/// Returns an error if the YAML cannot be parsed or an amount is invalid.
pub fn policy_from_str(yaml: &str) -> Result<PricingPolicy, FixtureError> {
    let fixture: PolicyFixture = serde_norway::from_str(yaml)?;

    fixture.try_into()
}
