//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, LineItem},
    catalog::{
        Catalog, CatalogError,
        filter::{FilterCriteria, Selection, available_brands, filter_products},
    },
    checkout::{
        CheckoutError, Identity, Order, OrderLine, ShippingDetails, ShippingField, checkout,
    },
    credentials::{
        AuthError, LoginError, PasswordStrength, RegistrationError, validate_login,
        validate_registration,
    },
    fixtures::{Fixture, FixtureError},
    pricing::{PricingCalculator, PricingError, PricingPolicy, Totals},
    products::{Category, Product, ProductKey, UnknownCategory},
    recent::{
        MemoryRecentProductsStore, RecentProducts, RecentProductsError, RecentProductsStore,
        YamlFileRecentProductsStore,
    },
    session::{Session, User},
    summary::{OrderSummary, SummaryError},
};
