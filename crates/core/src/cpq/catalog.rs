use rust_decimal::Decimal;

use crate::domain::product::{Product, ProductCostSpec, ProductId};

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Parses a JSON array of products.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(raw)?))
    }

    pub fn find(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == product_id)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Promotional-goods sample range used for demos and smoke checks.
    pub fn demo() -> Self {
        Self::new(vec![
            demo_product("calendar", "Calendar", "Promotional Items", 15, (110, 100, 15, 30)),
            demo_product(
                "custom-viewfinder",
                "Custom Viewfinder",
                "Promotional Items",
                25,
                (90, 100, 15, 25),
            ),
            demo_product(
                "tote-bag-1",
                "Tote Bag Option 1",
                "Bags & Accessories",
                25,
                (120, 50, 12, 25),
            ),
            demo_product(
                "tote-bag-2",
                "Tote Bag Option 2",
                "Bags & Accessories",
                25,
                (150, 30, 18, 25),
            ),
            demo_product(
                "a5-notebook",
                "A5 Hard Cover PU Notebook",
                "Office Supplies",
                25,
                (85, 200, 20, 25),
            ),
            demo_product(
                "flash-drive-16gb",
                "16GB Custom Laser Engraved Flash Drive",
                "Electronics",
                25,
                (250, 500, 8, 25),
            ),
        ])
    }
}

// (unit cost in cents, case pack, carton kg, margin %)
fn demo_product(
    id: &str,
    name: &str,
    category: &str,
    lead_time_days: u32,
    (unit_cost_cents, case_pack_size, carton_weight_kg, margin): (i64, u32, i64, i64),
) -> Product {
    Product {
        id: ProductId(id.to_string()),
        name: name.to_string(),
        description: String::new(),
        category: category.to_string(),
        lead_time_days: Some(lead_time_days),
        cost: ProductCostSpec {
            unit_cost_usd: Decimal::new(unit_cost_cents, 2),
            case_pack_size,
            carton_weight_kg: Decimal::new(carton_weight_kg, 0),
            duties_percent: Decimal::new(20, 0),
            setup_cost_usd: None,
            profit_margin_percent: Decimal::new(margin, 0),
            profit_override_percent: Some(Decimal::ZERO),
        },
    }
}
