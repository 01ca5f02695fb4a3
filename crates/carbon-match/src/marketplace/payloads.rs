use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::scoring::{
    BuyerGoals, BuyerRequest, RankedQuote, RequestId, SellerId, SellerQuote, VendorOffer,
};

/// Score a single quote. Reliability falls back to the ledger when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchQuoteRequest {
    pub request: BuyerRequest,
    pub quote: SellerQuote,
    #[serde(default)]
    pub seller_reliability: Option<f64>,
}

/// Rank every quote for one request.
///
/// When `seller_reliability` is omitted the scores are read from the ledger
/// in one snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankQuotesRequest {
    pub request: BuyerRequest,
    pub quotes: Vec<SellerQuote>,
    #[serde(default)]
    pub seller_reliability: Option<BTreeMap<SellerId, f64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedQuotesResponse {
    pub request_id: RequestId,
    pub ranked: Vec<RankedQuote>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NegotiationRequest {
    pub vendors: Vec<VendorOffer>,
    #[serde(default)]
    pub goals: Option<BuyerGoals>,
}
