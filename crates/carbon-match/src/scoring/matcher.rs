//! Quote matching: how well a seller's quote fits a buyer's request.

use super::clamp_score;
use super::domain::{BuyerRequest, QuoteId, SellerId, SellerQuote};
use super::normalizer::ratio;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weights of the four match components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchWeights {
    pub price_fairness: f64,
    pub carbon_alignment: f64,
    pub reliability: f64,
    pub ai_confidence: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            price_fairness: 0.30,
            carbon_alignment: 0.30,
            reliability: 0.25,
            ai_confidence: 0.15,
        }
    }
}

impl MatchWeights {
    pub fn sum(&self) -> f64 {
        self.price_fairness + self.carbon_alignment + self.reliability + self.ai_confidence
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub weights: MatchWeights,
    /// Placeholder confidence until a scoring model supplies one.
    pub ai_confidence: f64,
    /// Fairness used when the request carries no price ceiling.
    pub neutral_price_fairness: f64,
    /// Reliability used when neither the seller nor the quote supplies one.
    pub neutral_reliability: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            weights: MatchWeights::default(),
            ai_confidence: 75.0,
            neutral_price_fairness: 75.0,
            neutral_reliability: 50.0,
        }
    }
}

/// Where the reliability component came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReliabilitySource {
    SellerRecord,
    QuoteSnapshot,
    NeutralDefault,
}

impl ReliabilitySource {
    pub fn label(&self) -> &'static str {
        match self {
            ReliabilitySource::SellerRecord => "seller record",
            ReliabilitySource::QuoteSnapshot => "quote snapshot",
            ReliabilitySource::NeutralDefault => "neutral default",
        }
    }
}

/// Unweighted components behind a match score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchBreakdown {
    pub price_fairness: f64,
    pub carbon_alignment: f64,
    pub reliability: f64,
    pub ai_confidence: f64,
}

/// Composite match score with its explanation. Never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub match_score: f64,
    pub breakdown: MatchBreakdown,
    pub reliability_source: ReliabilitySource,
    pub reasoning: String,
}

/// One entry of a ranked quote list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedQuote {
    pub rank: usize,
    pub quote_id: QuoteId,
    pub seller_id: SellerId,
    #[serde(rename = "match")]
    pub result: MatchResult,
}

/// Stepwise fairness of `quote price / price ceiling`. Band edges favor the buyer.
pub fn price_fairness(price_ratio: f64) -> f64 {
    match price_ratio {
        r if r <= 0.8 => 100.0,
        r if r <= 0.9 => 90.0,
        r if r <= 1.0 => 80.0,
        r if r <= 1.1 => 60.0,
        r if r <= 1.2 => 40.0,
        _ => 20.0,
    }
}

/// Stepwise closeness of a quote's carbon score to the desired one.
pub fn carbon_alignment(diff: f64) -> f64 {
    match diff {
        d if d <= 0.5 => 100.0,
        d if d <= 1.0 => 80.0,
        d if d <= 1.5 => 60.0,
        d if d <= 2.0 => 40.0,
        _ => 20.0,
    }
}

#[derive(Debug, Clone, Default)]
pub struct QuoteMatcher {
    config: MatchConfig,
}

impl QuoteMatcher {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn score(
        &self,
        request: &BuyerRequest,
        quote: &SellerQuote,
        seller_reliability: Option<f64>,
    ) -> MatchResult {
        let ceiling = request.max_price.filter(|max| *max > 0.0);
        let (fairness, price_note) = match ceiling {
            Some(max_price) => {
                let price_ratio = ratio(quote.price, max_price);
                let fairness = price_fairness(price_ratio);
                let note = format!(
                    "price {:.2} against ceiling {:.2} (ratio {:.2}) scores {:.0}",
                    quote.price, max_price, price_ratio, fairness
                );
                (fairness, note)
            }
            None => {
                let fairness = self.config.neutral_price_fairness;
                (fairness, format!("no price ceiling, neutral fairness {fairness:.0}"))
            }
        };

        let diff = (quote.carbon_score - request.desired_carbon_score).abs();
        let alignment = carbon_alignment(diff);

        // A zero score counts as no score at all.
        let seller_reliability = seller_reliability.filter(|score| *score != 0.0);
        let snapshot = quote.reliability_score.filter(|score| *score != 0.0);
        let (reliability, reliability_source) = match (seller_reliability, snapshot) {
            (Some(score), _) => (score, ReliabilitySource::SellerRecord),
            (None, Some(snapshot)) => (snapshot, ReliabilitySource::QuoteSnapshot),
            (None, None) => (
                self.config.neutral_reliability,
                ReliabilitySource::NeutralDefault,
            ),
        };
        let reliability = clamp_score(reliability);
        let ai_confidence = clamp_score(self.config.ai_confidence);

        let weights = &self.config.weights;
        let match_score = clamp_score(
            fairness * weights.price_fairness
                + alignment * weights.carbon_alignment
                + reliability * weights.reliability
                + ai_confidence * weights.ai_confidence,
        );

        let reasoning = format!(
            "{price_note}; carbon score {:.2} against desired {:.2} (diff {:.2}) scores {:.0}; \
             reliability {:.1} from {}; confidence {:.0}",
            quote.carbon_score,
            request.desired_carbon_score,
            diff,
            alignment,
            reliability,
            reliability_source.label(),
            ai_confidence
        );

        MatchResult {
            match_score,
            breakdown: MatchBreakdown {
                price_fairness: fairness,
                carbon_alignment: alignment,
                reliability,
                ai_confidence,
            },
            reliability_source,
            reasoning,
        }
    }

    /// Score every quote for one request, best first. Equal scores keep input order.
    pub fn rank(
        &self,
        request: &BuyerRequest,
        quotes: &[SellerQuote],
        seller_reliability: &BTreeMap<SellerId, f64>,
    ) -> Vec<RankedQuote> {
        let mut scored: Vec<(&SellerQuote, MatchResult)> = quotes
            .iter()
            .map(|quote| {
                let reliability = seller_reliability.get(&quote.seller_id).copied();
                (quote, self.score(request, quote, reliability))
            })
            .collect();

        scored.sort_by(|(_, a), (_, b)| b.match_score.total_cmp(&a.match_score));

        scored
            .into_iter()
            .enumerate()
            .map(|(index, (quote, result))| RankedQuote {
                rank: index + 1,
                quote_id: quote.id.clone(),
                seller_id: quote.seller_id.clone(),
                result,
            })
            .collect()
    }
}

/// [`QuoteMatcher::score`] with the default configuration.
pub fn match_score(
    request: &BuyerRequest,
    quote: &SellerQuote,
    seller_reliability: Option<f64>,
) -> MatchResult {
    QuoteMatcher::default().score(request, quote, seller_reliability)
}
