use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::ProductId;
use crate::domain::shipping::ShippingMethod;
use crate::errors::DomainError;

pub const DEFAULT_VALIDITY_DAYS: i64 = 30;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProposalNumber(pub String);

impl ProposalNumber {
    /// `PROP-YYYYMMDD-NNN`, where the suffix is the caller's daily sequence.
    pub fn for_day(date: DateTime<Utc>, sequence: u32) -> Self {
        Self(format!("PROP-{}-{:03}", date.format("%Y%m%d"), sequence % 1000))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Draft,
    Sent,
    Accepted,
    Rejected,
    Expired,
}

/// A priced line frozen at proposal time. Amounts are settlement currency,
/// already rounded to cents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalLine {
    pub product_id: ProductId,
    pub quantity: u32,
    pub shipping_method: ShippingMethod,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub gross_profit: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalTotals {
    pub subtotal: Decimal,
    pub total_gross_profit: Decimal,
    pub currency: String,
}

impl ProposalTotals {
    pub fn from_lines(lines: &[ProposalLine], currency: &str) -> Self {
        Self {
            subtotal: lines.iter().map(|line| line.total_price).sum(),
            total_gross_profit: lines.iter().map(|line| line.gross_profit).sum(),
            currency: currency.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub number: ProposalNumber,
    pub client: String,
    pub title: String,
    pub status: ProposalStatus,
    pub lines: Vec<ProposalLine>,
    pub totals: ProposalTotals,
    pub created_at: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
}

impl Proposal {
    pub fn draft(
        number: ProposalNumber,
        client: impl Into<String>,
        title: impl Into<String>,
        lines: Vec<ProposalLine>,
        currency: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if lines.is_empty() {
            return Err(DomainError::InvariantViolation(
                "proposal must contain at least one line".to_string(),
            ));
        }
        if let Some(line) = lines.iter().find(|line| line.quantity == 0) {
            return Err(DomainError::InvariantViolation(format!(
                "proposal line for {} has zero quantity",
                line.product_id
            )));
        }

        let totals = ProposalTotals::from_lines(&lines, currency);
        Ok(Self {
            number,
            client: client.into(),
            title: title.into(),
            status: ProposalStatus::Draft,
            lines,
            totals,
            created_at,
            valid_until: created_at + Duration::days(DEFAULT_VALIDITY_DAYS),
        })
    }

    /// Swaps the line set of a draft and recomputes totals.
    pub fn replace_lines(&mut self, lines: Vec<ProposalLine>) -> Result<(), DomainError> {
        if self.status != ProposalStatus::Draft {
            return Err(DomainError::InvariantViolation(
                "only draft proposals can be repriced".to_string(),
            ));
        }
        if lines.is_empty() {
            return Err(DomainError::InvariantViolation(
                "proposal must contain at least one line".to_string(),
            ));
        }
        self.totals = ProposalTotals::from_lines(&lines, &self.totals.currency);
        self.lines = lines;
        Ok(())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.valid_until
    }

    pub fn can_transition_to(&self, next: ProposalStatus) -> bool {
        matches!(
            (&self.status, next),
            (ProposalStatus::Draft, ProposalStatus::Sent)
                | (ProposalStatus::Sent, ProposalStatus::Accepted)
                | (ProposalStatus::Sent, ProposalStatus::Rejected)
                | (ProposalStatus::Draft, ProposalStatus::Expired)
                | (ProposalStatus::Sent, ProposalStatus::Expired)
        )
    }

    pub fn transition_to(&mut self, next: ProposalStatus) -> Result<(), DomainError> {
        if self.can_transition_to(next.clone()) {
            self.status = next;
            return Ok(());
        }

        Err(DomainError::InvalidProposalTransition { from: self.status.clone(), to: next })
    }
}
