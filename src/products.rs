//! Products

use std::{fmt, str::FromStr};

use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use slotmap::new_key_type;
use smallvec::SmallVec;
use thiserror::Error;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Unknown category name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

/// Fixed set of catalog categories.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    /// Electronics
    Electronics,
    /// Clothing
    Clothing,
    /// Beauty
    Beauty,
    /// Home & Kitchen
    HomeAndKitchen,
    /// Sports
    Sports,
    /// Books
    Books,
    /// Toys
    Toys,
    /// Jewelry
    Jewelry,
    /// Automotive
    Automotive,
    /// Garden & Outdoor
    GardenAndOutdoor,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 10] = [
        Category::Electronics,
        Category::Clothing,
        Category::Beauty,
        Category::HomeAndKitchen,
        Category::Sports,
        Category::Books,
        Category::Toys,
        Category::Jewelry,
        Category::Automotive,
        Category::GardenAndOutdoor,
    ];

    /// Display name, as shown to shoppers and matched by free-text search.
    pub fn name(self) -> &'static str {
        match self {
            Category::Electronics => "Electronics",
            Category::Clothing => "Clothing",
            Category::Beauty => "Beauty",
            Category::HomeAndKitchen => "Home & Kitchen",
            Category::Sports => "Sports",
            Category::Books => "Books",
            Category::Toys => "Toys",
            Category::Jewelry => "Jewelry",
            Category::Automotive => "Automotive",
            Category::GardenAndOutdoor => "Garden & Outdoor",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        Category::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Product
#[derive(Debug, Clone)]
pub struct Product<'a> {
    /// Unique product identifier
    pub id: String,

    /// Product name
    pub name: String,

    /// Brand, when the product has one
    pub brand: Option<String>,

    /// Category
    pub category: Category,

    /// Current selling price
    pub price: Money<'a, Currency>,

    /// Price before markdown, present only when the product is discounted
    pub original_price: Option<Money<'a, Currency>>,

    /// Average rating between 0 and 5
    pub rating: Option<Decimal>,

    /// Number of reviews behind the rating
    pub review_count: Option<u32>,

    /// Whether the product can currently be bought
    pub in_stock: bool,

    /// Long description
    pub description: String,

    /// Specification attributes (e.g. "screen" => "6.7-inch")
    pub specifications: FxHashMap<String, String>,

    /// Colour variants
    pub colors: SmallVec<[String; 4]>,

    /// Size variants
    pub sizes: SmallVec<[String; 4]>,
}

impl<'a> Product<'a> {
    /// Create a product with the required fields; everything optional starts empty.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: Category,
        price: Money<'a, Currency>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            brand: None,
            category,
            price,
            original_price: None,
            rating: None,
            review_count: None,
            in_stock: true,
            description: String::new(),
            specifications: FxHashMap::default(),
            colors: SmallVec::new(),
            sizes: SmallVec::new(),
        }
    }

    /// Set the brand.
    #[must_use]
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Set the pre-markdown price.
    #[must_use]
    pub fn with_original_price(mut self, original_price: Money<'a, Currency>) -> Self {
        self.original_price = Some(original_price);
        self
    }

    /// The price the product was listed at before any markdown.
    pub fn list_price(&self) -> Money<'a, Currency> {
        self.original_price.unwrap_or(self.price)
    }

    /// Markdown per unit in minor units, clamped at zero.
    pub fn unit_discount_minor(&self) -> i64 {
        self.original_price.map_or(0, |original| {
            original
                .to_minor_units()
                .saturating_sub(self.price.to_minor_units())
                .max(0)
        })
    }

    /// Whole-percent markdown shown on the product badge, e.g. `Some(7)` for "-7%".
    ///
    /// Returns `None` when there is no original price or it is zero.
    pub fn discount_percent(&self) -> Option<u32> {
        let original = self.original_price?.to_minor_units();

        if original <= 0 {
            return None;
        }

        let discount = Decimal::from_i64(self.unit_discount_minor())?;
        let original = Decimal::from_i64(original)?;

        (discount / original * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
    }
}
