//! Storefront
//!
//! Storefront is the client-side core of an online shop: a catalog with search and
//! category/brand filtering, a shopping cart, and cart pricing with shipping and tax.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod credentials;
pub mod fixtures;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod recent;
pub mod session;
pub mod summary;
