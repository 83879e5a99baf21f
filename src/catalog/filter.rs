//! Catalog Filter
//!
//! Stateless narrowing of a product list by free-text query, category and brand. Results
//! always keep the order of the input products.

use std::fmt;

use rustc_hash::FxHashSet;

use crate::products::{Category, Product};

/// A filter control's value: either no constraint, or one specific value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Selection<T> {
    /// No constraint; everything passes.
    #[default]
    All,

    /// Only this value passes.
    Only(T),
}

impl<T> Selection<T> {
    /// Whether the selection admits `value`.
    pub fn admits<U>(&self, value: &U) -> bool
    where
        T: PartialEq<U>,
        U: ?Sized,
    {
        match self {
            Selection::All => true,
            Selection::Only(selected) => selected == value,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str("All"),
            Selection::Only(value) => value.fmt(f),
        }
    }
}

/// Filter criteria: free-text query, category and brand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    query: String,
    category: Selection<Category>,
    brand: Selection<String>,
}

impl FilterCriteria {
    /// Criteria with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the free-text query.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Select a category. The brand selection is reset, since the available brands depend on
    /// the category.
    #[must_use]
    pub fn with_category(mut self, category: Selection<Category>) -> Self {
        self.category = category;
        self.brand = Selection::All;
        self
    }

    /// Select a brand.
    #[must_use]
    pub fn with_brand(mut self, brand: Selection<String>) -> Self {
        self.brand = brand;
        self
    }

    /// Free-text query as entered.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Category selection.
    pub fn category(&self) -> Selection<Category> {
        self.category
    }

    /// Brand selection.
    pub fn brand(&self) -> Selection<&str> {
        match &self.brand {
            Selection::All => Selection::All,
            Selection::Only(brand) => Selection::Only(brand.as_str()),
        }
    }

    /// Whether a single product satisfies all three constraints.
    pub fn matches(&self, product: &Product<'_>) -> bool {
        query_matches(&self.query.to_lowercase(), product)
            && self.category.admits(&product.category)
            && self.matches_brand(product)
    }

    fn matches_brand(&self, product: &Product<'_>) -> bool {
        match &self.brand {
            Selection::All => true,
            Selection::Only(brand) => product.brand.as_deref() == Some(brand.as_str()),
        }
    }
}

/// `needle` must already be lowercased. Only the empty string matches everything.
fn query_matches(needle: &str, product: &Product<'_>) -> bool {
    if needle.is_empty() {
        return true;
    }

    product.name.to_lowercase().contains(needle)
        || product.category.name().to_lowercase().contains(needle)
        || product
            .brand
            .as_deref()
            .is_some_and(|brand| brand.to_lowercase().contains(needle))
}

/// Products satisfying `criteria`, in input order.
pub fn filter_products<'p, 'a: 'p, I>(
    products: I,
    criteria: &FilterCriteria,
) -> Vec<&'p Product<'a>>
where
    I: IntoIterator<Item = &'p Product<'a>>,
{
    let needle = criteria.query.to_lowercase();

    products
        .into_iter()
        .filter(|product| {
            query_matches(&needle, product)
                && criteria.category.admits(&product.category)
                && criteria.matches_brand(product)
        })
        .collect()
}

/// Brands of products passing the category constraint, for populating a brand filter.
///
/// The first entry is always [`Selection::All`]; brands follow deduplicated, in order of
/// first appearance.
pub fn available_brands<'p, 'a: 'p, I>(
    products: I,
    category: Selection<Category>,
) -> Vec<Selection<&'p str>>
where
    I: IntoIterator<Item = &'p Product<'a>>,
{
    let mut seen = FxHashSet::default();
    let mut brands = vec![Selection::All];

    for product in products {
        if !category.admits(&product.category) {
            continue;
        }

        if let Some(brand) = product.brand.as_deref()
            && seen.insert(brand)
        {
            brands.push(Selection::Only(brand));
        }
    }

    brands
}
