pub mod config;
pub mod cpq;
pub mod domain;
pub mod errors;

pub use cpq::catalog::Catalog;
pub use cpq::pricing::{
    round_settlement, AllMethodsPricing, LandedCostEngine, PricingEngine, PricingResult,
};
pub use cpq::quotation::{BulkEntry, BulkRequest, LineItemRequest, Quotation};
pub use cpq::rates::{ShippingRate, ShippingRateTable};
pub use cpq::summary::{MethodQuote, PricingSummary};
pub use cpq::validation::{validate_product_cost_spec, ValidationResult};
pub use cpq::QuotingService;
pub use domain::product::{Product, ProductCostSpec, ProductId};
pub use domain::proposal::{Proposal, ProposalLine, ProposalNumber, ProposalStatus};
pub use domain::shipping::ShippingMethod;
pub use errors::{ApplicationError, DomainError, InterfaceError, PricingError};
