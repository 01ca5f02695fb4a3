//! Input checks applied before anything reaches the scoring engine.
//!
//! The engine assumes finite, non-negative numbers; these checks turn a
//! violation into a rejected request instead.

use crate::scoring::reliability::TransactionOutcome;
use crate::scoring::{BuyerGoals, BuyerRequest, SellerId, SellerQuote, UserTotals, VendorOffer};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be finite and non-negative, got {value}")]
    NegativeOrNonFinite { field: String, value: f64 },
    #[error("{field} must lie within [0, 100], got {value}")]
    OutOfScoreRange { field: String, value: f64 },
    #[error("quote {quote} targets request {actual}, expected {expected}")]
    RequestMismatch {
        quote: String,
        expected: String,
        actual: String,
    },
}

fn non_negative(field: impl FnOnce() -> String, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NegativeOrNonFinite {
            field: field(),
            value,
        })
    }
}

fn score_range(field: impl FnOnce() -> String, value: f64) -> Result<(), ValidationError> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfScoreRange {
            field: field(),
            value,
        })
    }
}

pub fn request(request: &BuyerRequest) -> Result<(), ValidationError> {
    non_negative(|| "request.quantity".to_string(), request.quantity)?;
    non_negative(
        || "request.desired_carbon_score".to_string(),
        request.desired_carbon_score,
    )?;
    if let Some(max_price) = request.max_price {
        non_negative(|| "request.max_price".to_string(), max_price)?;
    }
    Ok(())
}

pub fn quote(prefix: &str, quote: &SellerQuote) -> Result<(), ValidationError> {
    non_negative(|| format!("{prefix}.price"), quote.price)?;
    non_negative(|| format!("{prefix}.carbon_score"), quote.carbon_score)?;
    non_negative(|| format!("{prefix}.delivery_days"), quote.delivery_days)?;
    if let Some(snapshot) = quote.reliability_score {
        score_range(|| format!("{prefix}.reliability_score"), snapshot)?;
    }
    Ok(())
}

/// Quotes must all answer the given request.
pub fn quotes_for(request: &BuyerRequest, quotes: &[SellerQuote]) -> Result<(), ValidationError> {
    for (index, entry) in quotes.iter().enumerate() {
        quote(&format!("quotes[{index}]"), entry)?;
        if entry.request_id != request.id {
            return Err(ValidationError::RequestMismatch {
                quote: entry.id.0.clone(),
                expected: request.id.0.clone(),
                actual: entry.request_id.0.clone(),
            });
        }
    }
    Ok(())
}

pub fn reliability_override(field: &str, value: f64) -> Result<(), ValidationError> {
    score_range(|| field.to_string(), value)
}

pub fn reliability_map(scores: &BTreeMap<SellerId, f64>) -> Result<(), ValidationError> {
    for (seller, value) in scores {
        score_range(|| format!("seller_reliability.{seller}"), *value)?;
    }
    Ok(())
}

pub fn vendors(vendors: &[VendorOffer]) -> Result<(), ValidationError> {
    for (index, vendor) in vendors.iter().enumerate() {
        non_negative(|| format!("vendors[{index}].price"), vendor.price)?;
        non_negative(|| format!("vendors[{index}].carbon"), vendor.carbon)?;
        non_negative(|| format!("vendors[{index}].delivery"), vendor.delivery)?;
        non_negative(
            || format!("vendors[{index}].sustainability_score"),
            vendor.sustainability_score,
        )?;
    }
    Ok(())
}

pub fn goals(goals: &BuyerGoals) -> Result<(), ValidationError> {
    non_negative(|| "goals.minimize_cost".to_string(), goals.minimize_cost)?;
    non_negative(|| "goals.minimize_carbon".to_string(), goals.minimize_carbon)?;
    non_negative(|| "goals.minimize_delivery".to_string(), goals.minimize_delivery)?;
    non_negative(
        || "goals.maximize_sustainability".to_string(),
        goals.maximize_sustainability,
    )
}

pub fn outcome(outcome: &TransactionOutcome) -> Result<(), ValidationError> {
    non_negative(|| "rating".to_string(), outcome.rating)?;
    non_negative(|| "carbon_saved".to_string(), outcome.carbon_saved)
}

pub fn totals(totals: &UserTotals) -> Result<(), ValidationError> {
    non_negative(
        || "quantity_purchased".to_string(),
        totals.quantity_purchased,
    )?;
    non_negative(|| "green_credits".to_string(), totals.green_credits)?;
    if let Some(reliability) = totals.reliability_score {
        score_range(|| "reliability_score".to_string(), reliability)?;
    }
    Ok(())
}
