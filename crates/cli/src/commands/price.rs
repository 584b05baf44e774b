use clap::Args;
use tradequote_core::{ProductId, ShippingMethod};

use super::{quoting_service, CommandResult, GlobalOptions};

#[derive(Debug, Clone, Args)]
pub struct PriceArgs {
    #[arg(long, help = "Catalog product id")]
    pub product: String,
    #[arg(long, help = "Units requested")]
    pub quantity: u32,
    #[arg(long, help = "AIR_EXPRESS or SEA_FREIGHT (DHL and SEA are accepted)")]
    pub shipping: ShippingMethod,
}

pub fn run(options: &GlobalOptions, args: &PriceArgs) -> CommandResult {
    let service = match quoting_service("price", options) {
        Ok(service) => service,
        Err(failure) => return failure,
    };

    match service.price(&ProductId(args.product.clone()), args.quantity, args.shipping) {
        Ok(result) => CommandResult::success_with(
            "price",
            format!(
                "{} x{} by {}: {} per unit",
                args.product, args.quantity, args.shipping, result.unit_price_settlement
            ),
            Some(result),
        ),
        Err(error) => CommandResult::pricing_failure("price", &error),
    }
}
