use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cpq::catalog::Catalog;
use crate::cpq::pricing::{PricingEngine, PricingResult};
use crate::cpq::summary::{pricing_summary, MethodQuote};
use crate::cpq::validation::validate_product_cost_spec;
use crate::domain::{product::ProductId, proposal::ProposalLine, shipping::ShippingMethod};
use crate::errors::PricingError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemRequest {
    pub product_id: ProductId,
    pub quantity: u32,
    pub shipping_method: ShippingMethod,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotedLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub shipping_method: ShippingMethod,
    pub quote: MethodQuote,
    pub details: PricingResult,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quotation {
    pub currency: String,
    pub lines: Vec<QuotedLine>,
    pub grand_total: Decimal,
    pub grand_total_profit: Decimal,
    pub item_count: usize,
}

impl Quotation {
    pub fn proposal_lines(&self) -> Vec<ProposalLine> {
        self.lines
            .iter()
            .map(|line| ProposalLine {
                product_id: line.product_id.clone(),
                quantity: line.quantity,
                shipping_method: line.shipping_method,
                unit_price: line.details.unit_price_settlement,
                total_price: line.details.total_price_settlement,
                gross_profit: line.details.total_gross_profit_settlement,
            })
            .collect()
    }
}

/// Prices each requested line with its own shipping method. Grand totals sum
/// the already-rounded line amounts. The first unknown product or invalid
/// cost sheet aborts the whole quotation.
pub fn quote_line_items<E>(
    engine: &E,
    catalog: &Catalog,
    items: &[LineItemRequest],
) -> Result<Quotation, PricingError>
where
    E: PricingEngine + ?Sized,
{
    if items.is_empty() {
        return Err(PricingError::NoLineItems);
    }

    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let product = catalog
            .find(&item.product_id)
            .ok_or_else(|| PricingError::ProductNotFound(item.product_id.to_string()))?;
        validate_product_cost_spec(&product.cost).into_result()?;

        let details = engine.landed_cost(&product.cost, item.quantity, item.shipping_method)?;
        if details.settlement_currency != engine.settlement_currency() {
            return Err(PricingError::CurrencyMismatch {
                expected: engine.settlement_currency().to_string(),
                found: details.settlement_currency,
            });
        }
        lines.push(QuotedLine {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            quantity: item.quantity,
            shipping_method: item.shipping_method,
            quote: MethodQuote::from_result(&details, product.lead_time_days),
            details,
        });
    }

    let grand_total =
        checked_total(lines.iter().map(|line| line.details.total_price_settlement), "grand total")?;
    let grand_total_profit = checked_total(
        lines.iter().map(|line| line.details.total_gross_profit_settlement),
        "grand total profit",
    )?;

    debug!(
        event_name = "pricing.quotation.totalled",
        item_count = lines.len(),
        grand_total = %grand_total,
        "line item quotation priced"
    );

    Ok(Quotation {
        currency: engine.settlement_currency().to_string(),
        item_count: lines.len(),
        lines,
        grand_total,
        grand_total_profit,
    })
}

fn checked_total(
    mut amounts: impl Iterator<Item = Decimal>,
    label: &str,
) -> Result<Decimal, PricingError> {
    amounts
        .try_fold(Decimal::ZERO, |total, amount| total.checked_add(amount))
        .ok_or_else(|| PricingError::ArithmeticDegenerate(format!("{label} overflowed")))
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BulkEntry {
    Priced {
        product_id: ProductId,
        product_name: String,
        quantity: u32,
        pricing: BTreeMap<ShippingMethod, MethodQuote>,
    },
    Failed {
        product_id: ProductId,
        error: String,
    },
}

/// Compares every shipping method for each request. Failures are reported per
/// entry and never abort the batch.
pub fn bulk_compare<E>(engine: &E, catalog: &Catalog, requests: &[BulkRequest]) -> Vec<BulkEntry>
where
    E: PricingEngine + ?Sized,
{
    requests
        .iter()
        .map(|request| {
            let summary = catalog
                .find(&request.product_id)
                .ok_or_else(|| PricingError::ProductNotFound(request.product_id.to_string()))
                .and_then(|product| pricing_summary(engine, product, request.quantity));

            match summary {
                Ok(summary) => BulkEntry::Priced {
                    product_id: summary.product_id,
                    product_name: summary.product_name,
                    quantity: summary.quantity,
                    pricing: summary.pricing,
                },
                Err(error) => BulkEntry::Failed {
                    product_id: request.product_id.clone(),
                    error: error.to_string(),
                },
            }
        })
        .collect()
}
