//! Order Summary
//!
//! Tabular rendering of a cart or a placed order, with the totals block underneath.

use std::io;

use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::Cart,
    checkout::{Order, OrderLine},
    pricing::{PricingCalculator, PricingError, Totals},
};

/// Errors that can occur while building or writing a summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// The cart could not be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Lines and totals ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    lines: Vec<OrderLine>,
    totals: Totals,
}

impl OrderSummary {
    /// Summarise the current contents of a cart.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the cart cannot be priced.
    pub fn from_cart(cart: &Cart<'_>, calculator: &PricingCalculator) -> Result<Self, PricingError> {
        let totals = calculator.totals(cart)?;

        let lines = cart
            .items()
            .iter()
            .map(|item| OrderLine::from_line_item(item, cart.currency()))
            .collect();

        Ok(Self { lines, totals })
    }

    /// Summarise a placed order.
    pub fn from_order(order: &Order) -> Self {
        Self {
            lines: order.lines.clone(),
            totals: order.totals,
        }
    }

    /// Summarised lines.
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Summarised totals.
    pub fn totals(&self) -> &Totals {
        &self.totals
    }

    /// Write the line table and totals block.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails, or [`SummaryError::Pricing`] if a line
    /// total overflows.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), SummaryError> {
        let mut builder = Builder::default();

        builder.push_record(["Item", "Qty", "Price", "Was", "Total"]);

        for line in &self.lines {
            builder.push_record([
                item_label(line),
                line.quantity.to_string(),
                line.unit_price.to_string(),
                line.original_unit_price
                    .map(|price| price.to_string())
                    .unwrap_or_default(),
                line_total(line)?.to_string(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(1..5), Alignment::right());

        writeln!(out, "{table}")?;

        self.write_totals(&mut out)?;

        Ok(())
    }

    fn write_totals(&self, out: &mut impl io::Write) -> Result<(), SummaryError> {
        let totals = &self.totals;

        let shipping = if totals.shipping.to_minor_units() == 0 {
            "Free".to_string()
        } else {
            totals.shipping.to_string()
        };

        let rows = [
            ("Subtotal:", totals.before_discount.to_string()),
            ("Discount:", format!("-{}", totals.discount)),
            ("Shipping:", shipping),
            ("Tax:", totals.tax.to_string()),
            ("Total:", totals.grand_total.to_string()),
        ];

        let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        let value_width = rows.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

        for (label, value) in rows {
            writeln!(out, " {label:>label_width$}  {value:>value_width$}")?;
        }

        Ok(())
    }
}

fn item_label(line: &OrderLine) -> String {
    match &line.brand {
        Some(brand) => format!("{}\n{brand}", line.name),
        None => line.name.clone(),
    }
}

fn line_total(line: &OrderLine) -> Result<Money<'static, Currency>, PricingError> {
    let minor = line
        .unit_price
        .to_minor_units()
        .checked_mul(i64::from(line.quantity))
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(minor, line.unit_price.currency()))
}
