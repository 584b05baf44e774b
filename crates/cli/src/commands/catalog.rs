use serde::Serialize;
use tradequote_core::{validate_product_cost_spec, ProductId};

use super::{load_catalog, CommandResult, GlobalOptions, EXIT_CATALOG};

#[derive(Debug, Serialize)]
struct CatalogEntry {
    id: ProductId,
    name: String,
    category: String,
    lead_time_days: Option<u32>,
    valid: bool,
    errors: Vec<String>,
}

pub fn run(options: &GlobalOptions) -> CommandResult {
    let catalog = match load_catalog(options.catalog_path.as_deref()) {
        Ok(catalog) => catalog,
        Err(error) => {
            return CommandResult::failure(
                "catalog",
                "catalog_load",
                format!("{error:#}"),
                EXIT_CATALOG,
            );
        }
    };

    let entries: Vec<CatalogEntry> = catalog
        .products()
        .iter()
        .map(|product| {
            let validation = validate_product_cost_spec(&product.cost);
            CatalogEntry {
                id: product.id.clone(),
                name: product.name.clone(),
                category: product.category.clone(),
                lead_time_days: product.lead_time_days,
                valid: validation.valid,
                errors: validation.errors,
            }
        })
        .collect();

    let invalid = entries.iter().filter(|entry| !entry.valid).count();
    CommandResult::success_with(
        "catalog",
        format!("{} product(s), {invalid} with invalid cost data", entries.len()),
        Some(entries),
    )
}
