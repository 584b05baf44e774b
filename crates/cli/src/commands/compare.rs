use clap::Args;
use tradequote_core::ProductId;

use super::{quoting_service, CommandResult, GlobalOptions};

#[derive(Debug, Clone, Args)]
pub struct CompareArgs {
    #[arg(long, help = "Catalog product id")]
    pub product: String,
    #[arg(long, default_value_t = 100, help = "Units requested")]
    pub quantity: u32,
}

pub fn run(options: &GlobalOptions, args: &CompareArgs) -> CommandResult {
    let service = match quoting_service("compare", options) {
        Ok(service) => service,
        Err(failure) => return failure,
    };

    match service.summary(&ProductId(args.product.clone()), args.quantity) {
        Ok(summary) => CommandResult::success_with(
            "compare",
            format!(
                "{} x{} priced by {} methods",
                summary.product_name,
                summary.quantity,
                summary.pricing.len()
            ),
            Some(summary),
        ),
        Err(error) => CommandResult::pricing_failure("compare", &error),
    }
}
