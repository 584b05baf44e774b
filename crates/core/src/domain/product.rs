use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Supplier costing data for one product. All money is USD, all rates are
/// percentages (20 means 20%).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCostSpec {
    pub unit_cost_usd: Decimal,
    pub case_pack_size: u32,
    pub carton_weight_kg: Decimal,
    pub duties_percent: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup_cost_usd: Option<Decimal>,
    pub profit_margin_percent: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_override_percent: Option<Decimal>,
}

impl ProductCostSpec {
    pub fn setup_cost(&self) -> Decimal {
        self.setup_cost_usd.unwrap_or(Decimal::ZERO)
    }

    pub fn profit_override(&self) -> Decimal {
        self.profit_override_percent.unwrap_or(Decimal::ZERO)
    }

    /// The override replaces the default margin only when strictly positive.
    pub fn effective_margin_percent(&self) -> Decimal {
        let profit_override = self.profit_override();
        if profit_override > Decimal::ZERO {
            profit_override
        } else {
            self.profit_margin_percent
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_time_days: Option<u32>,
    pub cost: ProductCostSpec,
}
