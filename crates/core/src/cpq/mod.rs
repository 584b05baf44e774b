pub mod catalog;
pub mod pricing;
pub mod quotation;
pub mod rates;
pub mod summary;
pub mod validation;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::{
    product::ProductId,
    proposal::{Proposal, ProposalNumber},
    shipping::ShippingMethod,
};
use crate::errors::{DomainError, PricingError};

use self::{
    catalog::Catalog,
    pricing::{PricingEngine, PricingResult},
    quotation::{bulk_compare, quote_line_items, BulkEntry, BulkRequest, LineItemRequest, Quotation},
    summary::{pricing_summary, PricingSummary},
};

/// A pricing engine bound to the product catalog it quotes from.
pub struct QuotingService<E> {
    engine: E,
    catalog: Catalog,
}

impl<E> QuotingService<E>
where
    E: PricingEngine,
{
    pub fn new(engine: E, catalog: Catalog) -> Self {
        Self { engine, catalog }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Raw breakdown for one product. No cost validation is applied.
    pub fn price(
        &self,
        product_id: &ProductId,
        quantity: u32,
        shipping_method: ShippingMethod,
    ) -> Result<PricingResult, PricingError> {
        let product = self
            .catalog
            .find(product_id)
            .ok_or_else(|| PricingError::ProductNotFound(product_id.to_string()))?;
        self.engine.landed_cost(&product.cost, quantity, shipping_method)
    }

    pub fn summary(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<PricingSummary, PricingError> {
        let product = self
            .catalog
            .find(product_id)
            .ok_or_else(|| PricingError::ProductNotFound(product_id.to_string()))?;
        pricing_summary(&self.engine, product, quantity)
    }

    pub fn quote(&self, items: &[LineItemRequest]) -> Result<Quotation, PricingError> {
        quote_line_items(&self.engine, &self.catalog, items)
    }

    pub fn bulk(&self, requests: &[BulkRequest]) -> Vec<BulkEntry> {
        bulk_compare(&self.engine, &self.catalog, requests)
    }

    /// Prices the items and freezes them into a draft proposal.
    pub fn draft_proposal(
        &self,
        number: ProposalNumber,
        client: &str,
        title: &str,
        items: &[LineItemRequest],
        now: DateTime<Utc>,
    ) -> Result<Proposal, DomainError> {
        let quotation = self.quote(items)?;
        let proposal = Proposal::draft(
            number,
            client,
            title,
            quotation.proposal_lines(),
            &quotation.currency,
            now,
        )?;

        debug!(
            event_name = "pricing.proposal.totalled",
            proposal_number = %proposal.number.0,
            subtotal = %proposal.totals.subtotal,
            "draft proposal priced"
        );
        Ok(proposal)
    }
}
