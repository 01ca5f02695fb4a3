use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::{ReliabilityRecord, SellerId};

/// Persisted reliability totals for one seller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerLedgerEntry {
    pub seller_id: SellerId,
    pub record: ReliabilityRecord,
    pub updated_at: DateTime<Utc>,
}

/// Storage seam for seller reliability totals.
///
/// `update` must apply `apply` atomically with respect to other updates for
/// the same seller, and `reliability_scores` must read all requested sellers
/// from one consistent snapshot.
pub trait SellerLedger: Send + Sync {
    fn fetch(&self, seller_id: &SellerId) -> Result<Option<SellerLedgerEntry>, LedgerError>;

    fn update(
        &self,
        seller_id: &SellerId,
        apply: &dyn Fn(&ReliabilityRecord) -> ReliabilityRecord,
    ) -> Result<SellerLedgerEntry, LedgerError>;

    fn reliability_scores(
        &self,
        seller_ids: &[SellerId],
    ) -> Result<BTreeMap<SellerId, f64>, LedgerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger unavailable: {0}")]
    Unavailable(String),
    #[error("ledger rejected update for seller {0}: counts may not decrease")]
    Regression(SellerId),
}

/// Guard for ledger implementations: totals may only grow.
pub fn ensure_monotonic(
    seller_id: &SellerId,
    before: &ReliabilityRecord,
    after: &ReliabilityRecord,
) -> Result<(), LedgerError> {
    if after.total_transactions < before.total_transactions
        || after.successful_transactions < before.successful_transactions
    {
        return Err(LedgerError::Regression(seller_id.clone()));
    }
    Ok(())
}
