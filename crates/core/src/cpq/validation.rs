use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::product::ProductCostSpec;
use crate::errors::PricingError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self { valid: true, errors: Vec::new() }
    }
}

impl ValidationResult {
    pub fn into_result(self) -> Result<(), PricingError> {
        if self.valid {
            Ok(())
        } else {
            Err(PricingError::InvalidProductSpec { errors: self.errors })
        }
    }
}

/// Checks every cost field and reports all violations in field order.
pub fn validate_product_cost_spec(cost: &ProductCostSpec) -> ValidationResult {
    let mut result = ValidationResult::default();

    if cost.case_pack_size == 0 {
        result.errors.push("case pack size must be greater than 0".to_string());
    }
    if cost.carton_weight_kg <= Decimal::ZERO {
        result.errors.push("carton weight must be greater than 0".to_string());
    }
    if cost.unit_cost_usd <= Decimal::ZERO {
        result.errors.push("unit cost must be greater than 0".to_string());
    }
    if cost.duties_percent < Decimal::ZERO {
        result.errors.push("duties percent must be 0 or greater".to_string());
    }
    if cost.profit_margin_percent < Decimal::ZERO {
        result.errors.push("profit margin percent must be 0 or greater".to_string());
    }
    if cost.setup_cost_usd.is_some_and(|setup| setup < Decimal::ZERO) {
        result.errors.push("setup cost must be 0 or greater".to_string());
    }
    if cost.profit_override_percent.is_some_and(|value| value < Decimal::ZERO) {
        result.errors.push("profit override percent must be 0 or greater".to_string());
    }

    if !result.errors.is_empty() {
        result.valid = false;
        warn!(
            event_name = "pricing.validation.failed",
            violation_count = result.errors.len(),
            "product cost data failed validation"
        );
    }

    result
}
