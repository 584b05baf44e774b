use chrono::Utc;
use clap::Args;
use serde::Serialize;
use tradequote_core::cpq::summary::format_amount;
use tradequote_core::{
    LineItemRequest, ProductId, Proposal, ProposalNumber, Quotation, ShippingMethod,
};

use super::{quoting_service, CommandResult, GlobalOptions, EXIT_INVALID_REQUEST};

#[derive(Debug, Clone, Args)]
pub struct QuoteArgs {
    #[arg(
        long = "item",
        required = true,
        value_parser = parse_line_item,
        help = "PRODUCT:QUANTITY:SHIPPING, repeatable"
    )]
    pub items: Vec<LineItemRequest>,
    #[arg(long, help = "Also draft a proposal for this client")]
    pub client: Option<String>,
    #[arg(long, default_value = "Product proposal", help = "Proposal title")]
    pub title: String,
    #[arg(long, default_value_t = 1, help = "Daily proposal sequence number")]
    pub sequence: u32,
}

#[derive(Debug, Serialize)]
struct QuoteOutput {
    quotation: Quotation,
    #[serde(skip_serializing_if = "Option::is_none")]
    proposal: Option<Proposal>,
}

pub fn run(options: &GlobalOptions, args: &QuoteArgs) -> CommandResult {
    let service = match quoting_service("quote", options) {
        Ok(service) => service,
        Err(failure) => return failure,
    };

    let quotation = match service.quote(&args.items) {
        Ok(quotation) => quotation,
        Err(error) => return CommandResult::pricing_failure("quote", &error),
    };

    let proposal = match &args.client {
        Some(client) => {
            let now = Utc::now();
            let number = ProposalNumber::for_day(now, args.sequence);
            match Proposal::draft(
                number,
                client.as_str(),
                args.title.as_str(),
                quotation.proposal_lines(),
                &quotation.currency,
                now,
            ) {
                Ok(proposal) => Some(proposal),
                Err(error) => {
                    return CommandResult::failure(
                        "quote",
                        "proposal_invariant",
                        error.to_string(),
                        EXIT_INVALID_REQUEST,
                    );
                }
            }
        }
        None => None,
    };

    let message = format!(
        "{} line(s), grand total {}",
        quotation.item_count,
        format_amount(&quotation.currency, quotation.grand_total)
    );
    CommandResult::success_with("quote", message, Some(QuoteOutput { quotation, proposal }))
}

pub fn parse_line_item(value: &str) -> Result<LineItemRequest, String> {
    let mut parts = value.rsplitn(3, ':');
    let (Some(shipping), Some(quantity), Some(product)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return Err(format!("expected PRODUCT:QUANTITY:SHIPPING, got `{value}`"));
    };

    let quantity = quantity
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("quantity must be a whole number, got `{quantity}`"))?;
    let shipping_method =
        shipping.parse::<ShippingMethod>().map_err(|error| error.to_string())?;

    Ok(LineItemRequest {
        product_id: ProductId(product.trim().to_string()),
        quantity,
        shipping_method,
    })
}
