use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shipping::ShippingMethod;
use crate::errors::PricingError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingRate {
    pub rate_per_kg_usd: Decimal,
    pub minimum_charge_usd: Decimal,
}

impl ShippingRate {
    pub const AIR_EXPRESS: ShippingRate = ShippingRate {
        rate_per_kg_usd: Decimal::from_parts(15, 0, 0, false, 2),
        minimum_charge_usd: Decimal::from_parts(2500, 0, 0, false, 2),
    };
    pub const SEA_FREIGHT: ShippingRate = ShippingRate {
        rate_per_kg_usd: Decimal::from_parts(8, 0, 0, false, 2),
        minimum_charge_usd: Decimal::from_parts(1500, 0, 0, false, 2),
    };

    pub fn new(rate_per_kg_usd: Decimal, minimum_charge_usd: Decimal) -> Self {
        Self { rate_per_kg_usd, minimum_charge_usd }
    }

    /// Weight-based freight, never billed below the minimum charge. `None` on overflow.
    pub fn charge_for(&self, total_weight_kg: Decimal) -> Option<Decimal> {
        total_weight_kg
            .checked_mul(self.rate_per_kg_usd)
            .map(|charge| charge.max(self.minimum_charge_usd))
    }
}

/// Freight rates per shipping method. Immutable once handed to an engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingRateTable {
    rates: BTreeMap<ShippingMethod, ShippingRate>,
}

impl Default for ShippingRateTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl ShippingRateTable {
    pub fn new(rates: impl IntoIterator<Item = (ShippingMethod, ShippingRate)>) -> Self {
        Self { rates: rates.into_iter().collect() }
    }

    pub fn standard() -> Self {
        Self::new([
            (ShippingMethod::AirExpress, ShippingRate::AIR_EXPRESS),
            (ShippingMethod::SeaFreight, ShippingRate::SEA_FREIGHT),
        ])
    }

    pub fn with_rate(mut self, method: ShippingMethod, rate: ShippingRate) -> Self {
        self.rates.insert(method, rate);
        self
    }

    pub fn rate(&self, method: ShippingMethod) -> Result<&ShippingRate, PricingError> {
        self.rates
            .get(&method)
            .ok_or_else(|| PricingError::InvalidShippingMethod(method.to_string()))
    }

    pub fn methods(&self) -> impl Iterator<Item = ShippingMethod> + '_ {
        self.rates.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShippingMethod, &ShippingRate)> + '_ {
        self.rates.iter().map(|(method, rate)| (*method, rate))
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
