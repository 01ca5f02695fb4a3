use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::marketplace::ledger::{ensure_monotonic, LedgerError, SellerLedger, SellerLedgerEntry};
use crate::marketplace::{marketplace_router, MarketplaceService};
use crate::scoring::{
    BuyerRequest, QuoteId, ReliabilityRecord, RequestId, ScoringConfig, SellerId, SellerQuote,
    VendorId, VendorOffer,
};

pub(super) fn buyer_request() -> BuyerRequest {
    BuyerRequest {
        id: RequestId("req-42".to_string()),
        product: "Mangrove restoration credits".to_string(),
        quantity: 250.0,
        desired_carbon_score: 5.0,
        max_price: Some(20.0),
    }
}

pub(super) fn quote(id: &str, seller: &str, price: f64, carbon_score: f64) -> SellerQuote {
    SellerQuote {
        id: QuoteId(id.to_string()),
        request_id: RequestId("req-42".to_string()),
        seller_id: SellerId(seller.to_string()),
        price,
        carbon_score,
        delivery_days: 4.0,
        reliability_score: None,
    }
}

pub(super) fn vendor(
    id: &str,
    price: f64,
    carbon: f64,
    delivery: f64,
    sustainability: f64,
) -> VendorOffer {
    VendorOffer {
        id: VendorId(id.to_string()),
        name: format!("Vendor {id}"),
        price,
        carbon,
        delivery,
        sustainability_score: sustainability,
        willing_to_discount: false,
    }
}

pub(super) fn seller(id: &str) -> SellerId {
    SellerId(id.to_string())
}

pub(super) fn build_service() -> (MarketplaceService<MemoryLedger>, Arc<MemoryLedger>) {
    let ledger = Arc::new(MemoryLedger::default());
    let service = MarketplaceService::new(ledger.clone(), ScoringConfig::default());
    (service, ledger)
}

pub(super) fn router_with_service(service: MarketplaceService<MemoryLedger>) -> axum::Router {
    marketplace_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryLedger {
    pub(super) records: Arc<Mutex<HashMap<SellerId, SellerLedgerEntry>>>,
}

impl MemoryLedger {
    pub(super) fn seed(&self, seller_id: &SellerId, record: ReliabilityRecord) {
        self.records.lock().expect("ledger mutex poisoned").insert(
            seller_id.clone(),
            SellerLedgerEntry {
                seller_id: seller_id.clone(),
                record,
                updated_at: Utc::now(),
            },
        );
    }
}

impl SellerLedger for MemoryLedger {
    fn fetch(&self, seller_id: &SellerId) -> Result<Option<SellerLedgerEntry>, LedgerError> {
        let guard = self.records.lock().expect("ledger mutex poisoned");
        Ok(guard.get(seller_id).cloned())
    }

    fn update(
        &self,
        seller_id: &SellerId,
        apply: &dyn Fn(&ReliabilityRecord) -> ReliabilityRecord,
    ) -> Result<SellerLedgerEntry, LedgerError> {
        let mut guard = self.records.lock().expect("ledger mutex poisoned");
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
        let guard = self.records.lock().expect("ledger mutex poisoned");
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

pub(super) struct UnavailableLedger;

impl SellerLedger for UnavailableLedger {
    fn fetch(&self, _seller_id: &SellerId) -> Result<Option<SellerLedgerEntry>, LedgerError> {
        Err(LedgerError::Unavailable("database offline".to_string()))
    }

    fn update(
        &self,
        _seller_id: &SellerId,
        _apply: &dyn Fn(&ReliabilityRecord) -> ReliabilityRecord,
    ) -> Result<SellerLedgerEntry, LedgerError> {
        Err(LedgerError::Unavailable("database offline".to_string()))
    }

    fn reliability_scores(
        &self,
        _seller_ids: &[SellerId],
    ) -> Result<BTreeMap<SellerId, f64>, LedgerError> {
        Err(LedgerError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
