use std::sync::Arc;

use tracing::{debug, info, warn};

use super::ledger::{LedgerError, SellerLedger, SellerLedgerEntry};
use super::payloads::{
    MatchQuoteRequest, NegotiationRequest, RankQuotesRequest, RankedQuotesResponse,
};
use super::validation::{self, ValidationError};
use crate::scoring::reliability::{ReliabilityRecord, TransactionOutcome};
use crate::scoring::{
    AnalyticsSnapshot, MatchResult, NegotiationError, NegotiationResult, ScoringConfig,
    ScoringEngine, SellerId, SellerQuote, UserTotals,
};

/// Facade validating caller input, reading the seller ledger and delegating
/// every calculation to the scoring engine.
pub struct MarketplaceService<L> {
    engine: Arc<ScoringEngine>,
    ledger: Arc<L>,
}

impl<L> MarketplaceService<L>
where
    L: SellerLedger + 'static,
{
    pub fn new(ledger: Arc<L>, config: ScoringConfig) -> Self {
        Self {
            engine: Arc::new(ScoringEngine::new(config)),
            ledger,
        }
    }

    pub fn match_quote(&self, payload: MatchQuoteRequest) -> Result<MatchResult, MarketplaceError> {
        let MatchQuoteRequest {
            request,
            quote,
            seller_reliability,
        } = payload;

        validation::request(&request).map_err(rejected)?;
        validation::quotes_for(&request, std::slice::from_ref(&quote)).map_err(rejected)?;

        let reliability = match seller_reliability {
            Some(score) => {
                validation::reliability_override("seller_reliability", score)
                    .map_err(rejected)?;
                Some(score)
            }
            None => self
                .ledger
                .fetch(&quote.seller_id)?
                .map(|entry| entry.record.reliability_score),
        };

        Ok(self.engine.match_quote(&request, &quote, reliability))
    }

    pub fn rank_quotes(
        &self,
        payload: RankQuotesRequest,
    ) -> Result<RankedQuotesResponse, MarketplaceError> {
        let RankQuotesRequest {
            request,
            quotes,
            seller_reliability,
        } = payload;

        validation::request(&request).map_err(rejected)?;
        validation::quotes_for(&request, &quotes).map_err(rejected)?;

        let reliability = match seller_reliability {
            Some(scores) => {
                validation::reliability_map(&scores).map_err(rejected)?;
                scores
            }
            None => self.ledger.reliability_scores(&distinct_sellers(&quotes))?,
        };

        let ranked = self.engine.rank_quotes(&request, &quotes, &reliability);
        debug!(
            request_id = %request.id.0,
            quotes = ranked.len(),
            best = ?ranked.first().map(|entry| entry.result.match_score),
            "ranked quotes"
        );

        Ok(RankedQuotesResponse {
            request_id: request.id,
            ranked,
        })
    }

    pub fn negotiate(
        &self,
        payload: NegotiationRequest,
    ) -> Result<NegotiationResult, MarketplaceError> {
        let goals = payload.goals.unwrap_or_default();
        validation::goals(&goals).map_err(rejected)?;
        validation::vendors(&payload.vendors).map_err(rejected)?;

        let result = self.engine.negotiate(&payload.vendors, &goals)?;
        info!(
            winner = %result.winner.id,
            score = result.winner_score,
            carbon_saved = result.carbon_saved,
            reward_tokens = result.reward_tokens,
            "negotiation resolved"
        );
        Ok(result)
    }

    /// Fold one completed transaction into the seller's ledger entry.
    pub fn record_transaction(
        &self,
        seller_id: &SellerId,
        outcome: TransactionOutcome,
    ) -> Result<SellerLedgerEntry, MarketplaceError> {
        validation::outcome(&outcome).map_err(rejected)?;

        let tracker = self.engine.reliability();
        let entry = self
            .ledger
            .update(seller_id, &|totals: &ReliabilityRecord| {
                tracker.absorb(totals, &outcome)
            })?;

        info!(
            seller_id = %seller_id,
            success = outcome.success,
            transactions = entry.record.total_transactions,
            reliability = entry.record.reliability_score,
            "transaction recorded"
        );
        Ok(entry)
    }

    pub fn reliability(&self, seller_id: &SellerId) -> Result<SellerLedgerEntry, MarketplaceError> {
        self.ledger
            .fetch(seller_id)?
            .ok_or_else(|| MarketplaceError::UnknownSeller(seller_id.clone()))
    }

    pub fn analytics(&self, totals: UserTotals) -> Result<AnalyticsSnapshot, MarketplaceError> {
        validation::totals(&totals).map_err(rejected)?;
        Ok(self.engine.overall_score(&totals))
    }
}

fn rejected(err: ValidationError) -> MarketplaceError {
    warn!(error = %err, "rejected marketplace input");
    MarketplaceError::Validation(err)
}

fn distinct_sellers(quotes: &[SellerQuote]) -> Vec<SellerId> {
    let mut sellers: Vec<SellerId> = quotes.iter().map(|quote| quote.seller_id.clone()).collect();
    sellers.sort();
    sellers.dedup();
    sellers
}

/// Error raised by the marketplace service.
#[derive(Debug, thiserror::Error)]
pub enum MarketplaceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Negotiation(#[from] NegotiationError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("no reliability record for seller {0}")]
    UnknownSeller(SellerId),
}
