use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

use carbon_match::marketplace::{ensure_monotonic, LedgerError, SellerLedger, SellerLedgerEntry};
use carbon_match::scoring::{ReliabilityRecord, SellerId};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local ledger. Every operation holds the single lock, so updates
/// are serialized and reads see one snapshot.
#[derive(Default, Clone)]
pub(crate) struct InMemorySellerLedger {
    records: Arc<Mutex<HashMap<SellerId, SellerLedgerEntry>>>,
}

impl InMemorySellerLedger {
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<SellerId, SellerLedgerEntry>>, LedgerError> {
        self.records
            .lock()
            .map_err(|_| LedgerError::Unavailable("ledger mutex poisoned".to_string()))
    }
}

impl SellerLedger for InMemorySellerLedger {
    fn fetch(&self, seller_id: &SellerId) -> Result<Option<SellerLedgerEntry>, LedgerError> {
        Ok(self.lock()?.get(seller_id).cloned())
    }

    fn update(
        &self,
        seller_id: &SellerId,
        apply: &dyn Fn(&ReliabilityRecord) -> ReliabilityRecord,
    ) -> Result<SellerLedgerEntry, LedgerError> {
        let mut guard = self.lock()?;
        let current = guard
            .get(seller_id)
            .map(|entry| entry.record.clone())
            .unwrap_or_default();

        let record = apply(&current);
        ensure_monotonic(seller_id, &current, &record)?;

        let entry = SellerLedgerEntry {
            seller_id: seller_id.clone(),
            record,
            updated_at: Utc::now(),
        };
        guard.insert(seller_id.clone(), entry.clone());
        Ok(entry)
    }

    fn reliability_scores(
        &self,
        seller_ids: &[SellerId],
    ) -> Result<BTreeMap<SellerId, f64>, LedgerError> {
        let guard = self.lock()?;
        Ok(seller_ids
            .iter()
            .filter_map(|id| {
                guard
                    .get(id)
                    .map(|entry| (id.clone(), entry.record.reliability_score))
            })
            .collect())
    }
}
