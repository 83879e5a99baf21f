//! Storefront CLI
//!
//! Browse a fixture catalog and price a cart from the command line.
//!
//! Use `--query`, `--category` and `--brand` to filter the product list, and `--add` (repeatable)
//! to put products in the cart by id.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use storefront::{
    cart::Cart,
    catalog::filter::{FilterCriteria, Selection},
    fixtures::Fixture,
    pricing::PricingCalculator,
    products::{Category, Product},
    summary::OrderSummary,
};

/// Storefront CLI arguments
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Directory holding the `catalog/` and `policy/` fixture files
    #[arg(long, default_value = "./fixtures")]
    fixtures: String,

    /// Catalog fixture name
    #[arg(short, long, default_value = "storefront")]
    catalog: String,

    /// Pricing policy fixture name; the built-in policy is used when omitted
    #[arg(short, long)]
    policy: Option<String>,

    /// Free-text search over name, category and brand
    #[arg(short, long)]
    query: Option<String>,

    /// Only list products in this category
    #[arg(long)]
    category: Option<Category>,

    /// Only list products of this brand
    #[arg(short, long)]
    brand: Option<String>,

    /// Add a product to the cart by id (repeat to add more)
    #[arg(short, long)]
    add: Vec<String>,

    /// Log level used when `RUST_LOG` is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_logging(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_target(true)
                .with_writer(io::stderr),
        )
        .with(filter)
        .try_init()?;

    Ok(())
}

fn criteria(args: &Args) -> FilterCriteria {
    let mut criteria = FilterCriteria::new();

    if let Some(query) = &args.query {
        criteria = criteria.with_query(query.clone());
    }

    if let Some(category) = args.category {
        criteria = criteria.with_category(Selection::Only(category));
    }

    if let Some(brand) = &args.brand {
        criteria = criteria.with_brand(Selection::Only(brand.clone()));
    }

    criteria
}

fn write_products(out: &mut impl Write, products: &[&Product<'_>]) -> io::Result<()> {
    let mut builder = Builder::default();

    builder.push_record(["Id", "Name", "Brand", "Category", "Price", "Was", "Off"]);

    for product in products {
        builder.push_record([
            product.id.clone(),
            product.name.clone(),
            product.brand.clone().unwrap_or_default(),
            product.category.to_string(),
            product.price.to_string(),
            product
                .original_price
                .map(|price| price.to_string())
                .unwrap_or_default(),
            product
                .discount_percent()
                .map(|percent| format!("-{percent}%"))
                .unwrap_or_default(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(4..7), Alignment::right());

    writeln!(out, "{table}")
}

/// Storefront CLI entry point
fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level)?;

    let fixture = Fixture::with_base_path(&args.fixtures);

    let catalog = fixture
        .load_catalog(&args.catalog)
        .with_context(|| format!("loading catalog {:?}", args.catalog))?;

    let calculator = match &args.policy {
        Some(name) => PricingCalculator::new(
            fixture
                .load_policy(name)
                .with_context(|| format!("loading pricing policy {name:?}"))?,
        ),
        None => PricingCalculator::default(),
    };

    info!(products = catalog.len(), "catalog loaded");

    let criteria = criteria(&args);
    let listed = catalog.search(&criteria);

    debug!(listed = listed.len(), "catalog filtered");

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    write_products(&mut handle, &listed)?;

    let brands = catalog
        .brands(criteria.category())
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    writeln!(handle, "Brands: {brands}")?;

    if args.add.is_empty() {
        return Ok(());
    }

    let mut cart = Cart::new(catalog.currency());

    for id in &args.add {
        let product = catalog
            .get(id)
            .with_context(|| format!("unknown product id {id:?}"))?;

        cart.add(product);
    }

    writeln!(handle)?;

    OrderSummary::from_cart(&cart, &calculator)?.write_to(&mut handle)?;

    Ok(())
}
