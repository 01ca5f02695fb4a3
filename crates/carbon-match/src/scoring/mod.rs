//! Deterministic scoring core of the marketplace.
//!
//! Every operation is a pure function of its explicit inputs and the injected
//! [`ScoringConfig`]. Nothing here performs I/O or keeps state between calls,
//! so one [`ScoringEngine`] can be shared freely across request handlers.

pub mod analytics;
pub mod config;
pub mod domain;
pub mod matcher;
pub mod negotiator;
pub mod normalizer;
pub mod reliability;

pub use analytics::{AnalyticsAggregator, AnalyticsConfig, AnalyticsSnapshot, ScoreBreakdown};
pub use config::{ScoringConfig, ScoringConfigError};
pub use domain::{
    BuyerGoals, BuyerRequest, QuoteId, RequestId, SellerId, SellerQuote, UserTotals, VendorId,
    VendorOffer,
};
pub use matcher::{MatchConfig, MatchResult, QuoteMatcher, RankedQuote, ReliabilitySource};
pub use negotiator::{
    NegotiationConfig, NegotiationError, NegotiationResult, VendorComparison, VendorNegotiator,
};
pub use normalizer::ReferenceRanges;
pub use reliability::{ReliabilityRecord, ReliabilityTracker, TransactionOutcome};

use std::collections::BTreeMap;

/// Upper bound shared by every 0-100 score.
pub const SCORE_MAX: f64 = 100.0;

pub(crate) fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, SCORE_MAX)
}

/// The four scoring components built from one configuration.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    matcher: QuoteMatcher,
    reliability: ReliabilityTracker,
    negotiator: VendorNegotiator,
    analytics: AnalyticsAggregator,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            matcher: QuoteMatcher::new(config.matching),
            reliability: ReliabilityTracker::new(config.reliability),
            negotiator: VendorNegotiator::new(config.ranges, config.negotiation),
            analytics: AnalyticsAggregator::new(config.analytics),
        }
    }

    pub fn match_quote(
        &self,
        request: &BuyerRequest,
        quote: &SellerQuote,
        seller_reliability: Option<f64>,
    ) -> MatchResult {
        self.matcher.score(request, quote, seller_reliability)
    }

    pub fn rank_quotes(
        &self,
        request: &BuyerRequest,
        quotes: &[SellerQuote],
        seller_reliability: &BTreeMap<SellerId, f64>,
    ) -> Vec<RankedQuote> {
        self.matcher.rank(request, quotes, seller_reliability)
    }

    pub fn negotiate(
        &self,
        vendors: &[VendorOffer],
        goals: &BuyerGoals,
    ) -> Result<NegotiationResult, NegotiationError> {
        self.negotiator.negotiate(vendors, goals)
    }

    pub fn reliability(&self) -> &ReliabilityTracker {
        &self.reliability
    }

    pub fn overall_score(&self, totals: &UserTotals) -> AnalyticsSnapshot {
        self.analytics.overall_score(totals)
    }
}
