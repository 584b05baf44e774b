use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cpq::rates::ShippingRateTable;
use crate::domain::{product::ProductCostSpec, shipping::ShippingMethod};
use crate::errors::PricingError;

pub const DEFAULT_EXCHANGE_RATE: Decimal = Decimal::from_parts(202, 0, 0, false, 2);
pub const DEFAULT_SETTLEMENT_CURRENCY: &str = "BBD";

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Full cost breakdown for one product, quantity and shipping method.
///
/// `*_usd` fields are unrounded. `*_settlement` fields are rounded to cents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingResult {
    pub shipping_method: ShippingMethod,
    pub quantity: u32,
    pub cartons: u32,
    pub total_weight_kg: Decimal,
    pub shipping_cost_usd: Decimal,
    pub duties_amount_usd: Decimal,
    pub setup_cost_usd: Decimal,
    pub landed_cost_per_unit_usd: Decimal,
    pub unit_price_usd: Decimal,
    pub unit_price_settlement: Decimal,
    pub total_price_settlement: Decimal,
    pub total_gross_profit_settlement: Decimal,
    pub exchange_rate_used: Decimal,
    pub effective_profit_margin_percent: Decimal,
    pub profit_override_percent: Decimal,
    pub settlement_currency: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllMethodsPricing {
    pub quantity: u32,
    pub by_method: BTreeMap<ShippingMethod, PricingResult>,
}

pub trait PricingEngine: Send + Sync {
    fn landed_cost(
        &self,
        cost: &ProductCostSpec,
        quantity: u32,
        shipping_method: ShippingMethod,
    ) -> Result<PricingResult, PricingError>;

    fn all_pricing(
        &self,
        cost: &ProductCostSpec,
        quantity: u32,
    ) -> Result<AllMethodsPricing, PricingError>;

    fn settlement_currency(&self) -> &str;
}

/// Landed-cost calculator over a fixed rate table and exchange rate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandedCostEngine {
    rates: ShippingRateTable,
    exchange_rate: Decimal,
    settlement_currency: String,
}

impl Default for LandedCostEngine {
    fn default() -> Self {
        Self::new(ShippingRateTable::standard(), DEFAULT_EXCHANGE_RATE, DEFAULT_SETTLEMENT_CURRENCY)
    }
}

impl LandedCostEngine {
    pub fn new(
        rates: ShippingRateTable,
        exchange_rate: Decimal,
        settlement_currency: impl Into<String>,
    ) -> Self {
        Self { rates, exchange_rate, settlement_currency: settlement_currency.into() }
    }

    pub fn with_exchange_rate(mut self, exchange_rate: Decimal) -> Self {
        self.exchange_rate = exchange_rate;
        self
    }

    pub fn with_rates(mut self, rates: ShippingRateTable) -> Self {
        self.rates = rates;
        self
    }

    pub fn rates(&self) -> &ShippingRateTable {
        &self.rates
    }

    pub fn exchange_rate(&self) -> Decimal {
        self.exchange_rate
    }

    pub fn compute_shipping_cost(
        &self,
        total_weight_kg: Decimal,
        shipping_method: ShippingMethod,
    ) -> Result<Decimal, PricingError> {
        self.rates
            .rate(shipping_method)?
            .charge_for(total_weight_kg)
            .ok_or_else(|| overflowed("shipping cost"))
    }

    pub fn compute_landed_cost(
        &self,
        cost: &ProductCostSpec,
        quantity: u32,
        shipping_method: ShippingMethod,
    ) -> Result<PricingResult, PricingError> {
        if quantity == 0 {
            return Err(PricingError::ArithmeticDegenerate(
                "quantity must be greater than zero".to_string(),
            ));
        }
        if cost.case_pack_size == 0 {
            return Err(PricingError::ArithmeticDegenerate(
                "case pack size must be greater than zero".to_string(),
            ));
        }

        // A partial carton still ships as a full one.
        let cartons = quantity.div_ceil(cost.case_pack_size);
        let total_weight_kg = Decimal::from(cartons)
            .checked_mul(cost.carton_weight_kg)
            .ok_or_else(|| overflowed("total weight"))?;
        let shipping_cost_usd = self.compute_shipping_cost(total_weight_kg, shipping_method)?;

        let duties_amount_usd = cost
            .duties_percent
            .checked_div(ONE_HUNDRED)
            .and_then(|rate| cost.unit_cost_usd.checked_mul(rate))
            .ok_or_else(|| overflowed("duties amount"))?;
        let setup_cost_usd = cost.setup_cost();
        let units = Decimal::from(quantity);
        let base_cost_usd = cost
            .unit_cost_usd
            .checked_add(duties_amount_usd)
            .ok_or_else(|| overflowed("unit cost plus duties"))?;
        let landed_cost_per_unit_usd = shipping_cost_usd
            .checked_div(units)
            .zip(setup_cost_usd.checked_div(units))
            .and_then(|(shipping, setup)| base_cost_usd.checked_add(shipping)?.checked_add(setup))
            .ok_or_else(|| overflowed("landed cost per unit"))?;

        let effective_profit_margin_percent = cost.effective_margin_percent();
        let unit_price_usd = effective_profit_margin_percent
            .checked_div(ONE_HUNDRED)
            .and_then(|margin| Decimal::ONE.checked_add(margin))
            .and_then(|markup| landed_cost_per_unit_usd.checked_mul(markup))
            .ok_or_else(|| overflowed("unit price"))?;

        let unit_price_settlement = unit_price_usd
            .checked_mul(self.exchange_rate)
            .ok_or_else(|| overflowed("settlement unit price"))?;
        let total_price_settlement = unit_price_settlement
            .checked_mul(units)
            .ok_or_else(|| overflowed("settlement total price"))?;
        // Shipping and setup are pass-through: they are excluded from cost of goods.
        let total_gross_profit_settlement = base_cost_usd
            .checked_mul(self.exchange_rate)
            .and_then(|unit_cost| unit_cost.checked_mul(units))
            .and_then(|total_cost| total_price_settlement.checked_sub(total_cost))
            .ok_or_else(|| overflowed("settlement gross profit"))?;

        let result = PricingResult {
            shipping_method,
            quantity,
            cartons,
            total_weight_kg,
            shipping_cost_usd,
            duties_amount_usd,
            setup_cost_usd,
            landed_cost_per_unit_usd,
            unit_price_usd,
            unit_price_settlement: round_settlement(unit_price_settlement),
            total_price_settlement: round_settlement(total_price_settlement),
            total_gross_profit_settlement: round_settlement(total_gross_profit_settlement),
            exchange_rate_used: self.exchange_rate,
            effective_profit_margin_percent,
            profit_override_percent: cost.profit_override(),
            settlement_currency: self.settlement_currency.clone(),
        };

        debug!(
            event_name = "pricing.landed_cost.computed",
            shipping_method = %shipping_method,
            quantity,
            cartons,
            unit_price_settlement = %result.unit_price_settlement,
            total_price_settlement = %result.total_price_settlement,
            "landed cost computed"
        );

        Ok(result)
    }

    /// Prices every configured shipping method independently.
    pub fn compute_all_pricing(
        &self,
        cost: &ProductCostSpec,
        quantity: u32,
    ) -> Result<AllMethodsPricing, PricingError> {
        let by_method = self
            .rates
            .methods()
            .map(|method| Ok((method, self.compute_landed_cost(cost, quantity, method)?)))
            .collect::<Result<BTreeMap<_, _>, PricingError>>()?;

        Ok(AllMethodsPricing { quantity, by_method })
    }
}

impl PricingEngine for LandedCostEngine {
    fn landed_cost(
        &self,
        cost: &ProductCostSpec,
        quantity: u32,
        shipping_method: ShippingMethod,
    ) -> Result<PricingResult, PricingError> {
        self.compute_landed_cost(cost, quantity, shipping_method)
    }

    fn all_pricing(
        &self,
        cost: &ProductCostSpec,
        quantity: u32,
    ) -> Result<AllMethodsPricing, PricingError> {
        self.compute_all_pricing(cost, quantity)
    }

    fn settlement_currency(&self) -> &str {
        &self.settlement_currency
    }
}

fn overflowed(step: &str) -> PricingError {
    PricingError::ArithmeticDegenerate(format!("{step} overflowed"))
}

/// Rounds a settlement amount to cents, half away from zero.
pub fn round_settlement(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
