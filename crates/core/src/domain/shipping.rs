use serde::{Deserialize, Serialize};

use crate::errors::PricingError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShippingMethod {
    AirExpress,
    SeaFreight,
}

impl ShippingMethod {
    pub const ALL: [ShippingMethod; 2] = [ShippingMethod::AirExpress, ShippingMethod::SeaFreight];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AirExpress => "AIR_EXPRESS",
            Self::SeaFreight => "SEA_FREIGHT",
        }
    }
}

impl std::fmt::Display for ShippingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ShippingMethod {
    type Err = PricingError;

    // DHL and SEA are the carrier labels used on older supplier sheets.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "AIR_EXPRESS" | "DHL" => Ok(Self::AirExpress),
            "SEA_FREIGHT" | "SEA" => Ok(Self::SeaFreight),
            _ => Err(PricingError::InvalidShippingMethod(value.trim().to_string())),
        }
    }
}
