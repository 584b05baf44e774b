use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cpq::pricing::{round_settlement, AllMethodsPricing, PricingEngine, PricingResult};
use crate::cpq::validation::validate_product_cost_spec;
use crate::domain::{
    product::{Product, ProductId},
    shipping::ShippingMethod,
};
use crate::errors::PricingError;

/// Display strings for one shipping method, as quoted to a client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodQuote {
    pub unit_price: String,
    pub total_price: String,
    pub gross_profit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_time: Option<String>,
}

impl MethodQuote {
    pub fn from_result(result: &PricingResult, lead_time_days: Option<u32>) -> Self {
        let currency = result.settlement_currency.as_str();
        Self {
            unit_price: format_amount(currency, result.unit_price_settlement),
            total_price: format_amount(currency, result.total_price_settlement),
            gross_profit: format_amount(currency, result.total_gross_profit_settlement),
            lead_time: lead_time_days.map(|days| format!("{days} days")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingSummary {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub pricing: BTreeMap<ShippingMethod, MethodQuote>,
    pub details: AllMethodsPricing,
}

/// `BBD$1105.55` style rendering, always two decimals.
pub fn format_amount(currency: &str, amount: Decimal) -> String {
    format!("{currency}${:.2}", round_settlement(amount))
}

/// Validates the product, then prices it by every configured method.
pub fn pricing_summary<E>(
    engine: &E,
    product: &Product,
    quantity: u32,
) -> Result<PricingSummary, PricingError>
where
    E: PricingEngine + ?Sized,
{
    validate_product_cost_spec(&product.cost).into_result()?;

    let details = engine.all_pricing(&product.cost, quantity)?;
    let pricing = details
        .by_method
        .iter()
        .map(|(method, result)| (*method, MethodQuote::from_result(result, product.lead_time_days)))
        .collect();

    Ok(PricingSummary {
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        quantity,
        pricing,
        details,
    })
}
