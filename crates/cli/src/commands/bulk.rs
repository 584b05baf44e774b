use clap::Args;
use tradequote_core::{BulkEntry, BulkRequest, ProductId};

use super::{quoting_service, CommandResult, GlobalOptions};

#[derive(Debug, Clone, Args)]
pub struct BulkArgs {
    #[arg(
        long = "item",
        required = true,
        value_parser = parse_bulk_request,
        help = "PRODUCT:QUANTITY, repeatable"
    )]
    pub items: Vec<BulkRequest>,
}

pub fn run(options: &GlobalOptions, args: &BulkArgs) -> CommandResult {
    let service = match quoting_service("bulk", options) {
        Ok(service) => service,
        Err(failure) => return failure,
    };

    let entries = service.bulk(&args.items);
    let failed =
        entries.iter().filter(|entry| matches!(entry, BulkEntry::Failed { .. })).count();

    CommandResult::success_with(
        "bulk",
        format!("{} priced, {failed} failed", entries.len() - failed),
        Some(entries),
    )
}

pub fn parse_bulk_request(value: &str) -> Result<BulkRequest, String> {
    let (product, quantity) = value
        .rsplit_once(':')
        .ok_or_else(|| format!("expected PRODUCT:QUANTITY, got `{value}`"))?;
    let quantity = quantity
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("quantity must be a whole number, got `{quantity}`"))?;

    Ok(BulkRequest { product_id: ProductId(product.trim().to_string()), quantity })
}
