//! Single-shot vendor negotiation against weighted buyer goals.
//!
//! Every offer is scored independently, the comparison is sorted by score
//! with input order breaking ties, and the first entry wins. Savings are
//! reported against the mean of all submitted offers.

use super::domain::{BuyerGoals, VendorId, VendorOffer};
use super::normalizer::{NormalizedAttributes, OfferAttributes, ReferenceRanges};
use serde::{Deserialize, Serialize};

/// Reward-token weights applied to the winning offer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenRewardPolicy {
    pub per_sustainability_point: f64,
    pub per_cost_saved: f64,
    pub per_carbon_saved: f64,
}

impl Default for TokenRewardPolicy {
    fn default() -> Self {
        Self {
            per_sustainability_point: 1.5,
            per_cost_saved: 0.5,
            per_carbon_saved: 2.0,
        }
    }
}

impl TokenRewardPolicy {
    pub fn tokens(&self, sustainability_score: f64, cost_saved: f64, carbon_saved: f64) -> f64 {
        sustainability_score * self.per_sustainability_point
            + cost_saved * self.per_cost_saved
            + carbon_saved * self.per_carbon_saved
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NegotiationConfig {
    /// Added to the raw score of vendors willing to discount.
    pub discount_bonus: f64,
    pub rewards: TokenRewardPolicy,
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self {
            discount_bonus: 0.1,
            rewards: TokenRewardPolicy::default(),
        }
    }
}

/// Score of one offer under a set of goals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VendorScore {
    pub normalized: NormalizedAttributes,
    pub raw_score: f64,
    /// `max(0, (raw + 1) * 50)`; only comparable within one negotiation.
    pub final_score: f64,
}

/// One row of the ranked comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorComparison {
    pub rank: usize,
    pub vendor_id: VendorId,
    pub vendor: String,
    pub score: f64,
    pub raw_score: f64,
    pub advantages: Vec<String>,
    pub negotiation_notes: String,
}

/// Mean price and carbon across every submitted offer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NegotiationBaseline {
    pub mean_price: f64,
    pub mean_carbon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegotiationResult {
    pub winner: VendorOffer,
    pub winner_score: f64,
    pub carbon_saved: f64,
    pub cost_saved: f64,
    pub reward_tokens: f64,
    pub baseline: NegotiationBaseline,
    pub goals: BuyerGoals,
    pub comparison: Vec<VendorComparison>,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NegotiationError {
    #[error("negotiation requires at least one vendor offer")]
    NoVendors,
}

#[derive(Debug, Clone, Default)]
pub struct VendorNegotiator {
    ranges: ReferenceRanges,
    config: NegotiationConfig,
}

impl VendorNegotiator {
    pub fn new(ranges: ReferenceRanges, config: NegotiationConfig) -> Self {
        Self { ranges, config }
    }

    pub fn score(&self, vendor: &VendorOffer, goals: &BuyerGoals) -> VendorScore {
        let normalized = self.ranges.normalize(OfferAttributes {
            price: vendor.price,
            carbon: vendor.carbon,
            delivery: vendor.delivery,
            sustainability: vendor.sustainability_score,
        });

        let mut raw_score = 0.0;
        raw_score -= normalized.price * goals.minimize_cost;
        raw_score -= normalized.carbon * goals.minimize_carbon;
        raw_score -= normalized.delivery * goals.minimize_delivery;
        raw_score += normalized.sustainability * goals.maximize_sustainability;

        if vendor.willing_to_discount {
            raw_score += self.config.discount_bonus;
        }

        VendorScore {
            normalized,
            raw_score,
            final_score: display_score(raw_score),
        }
    }

    pub fn negotiate(
        &self,
        vendors: &[VendorOffer],
        goals: &BuyerGoals,
    ) -> Result<NegotiationResult, NegotiationError> {
        if vendors.is_empty() {
            return Err(NegotiationError::NoVendors);
        }

        let mut scored: Vec<(&VendorOffer, VendorScore)> = vendors
            .iter()
            .map(|vendor| (vendor, self.score(vendor, goals)))
            .collect();
        // Raw scores keep their order below the display floor.
        scored.sort_by(|(_, a), (_, b)| b.raw_score.total_cmp(&a.raw_score));

        let (winner, winner_score) = scored[0];
        let count = vendors.len() as f64;
        let baseline = NegotiationBaseline {
            mean_price: vendors.iter().map(|vendor| vendor.price).sum::<f64>() / count,
            mean_carbon: vendors.iter().map(|vendor| vendor.carbon).sum::<f64>() / count,
        };
        let cost_saved = (baseline.mean_price - winner.price).max(0.0);
        let carbon_saved = (baseline.mean_carbon - winner.carbon).max(0.0);
        let reward_tokens =
            self.config
                .rewards
                .tokens(winner.sustainability_score, cost_saved, carbon_saved);

        let reasoning = format!(
            "{} ranks first of {} vendor(s) with score {:.2}, weighted toward {}. \
             Against the field average it saves {:.2} kg CO2e and {:.2} in cost, \
             earning {:.2} reward tokens.",
            winner.name,
            vendors.len(),
            winner_score.final_score,
            goals.dominant_label(),
            carbon_saved,
            cost_saved,
            reward_tokens
        );

        let comparison = scored
            .iter()
            .enumerate()
            .map(|(index, (vendor, score))| {
                let advantages = competitive_advantages(vendor);
                let negotiation_notes = negotiation_notes(vendor, &advantages);
                VendorComparison {
                    rank: index + 1,
                    vendor_id: vendor.id.clone(),
                    vendor: vendor.name.clone(),
                    score: score.final_score,
                    raw_score: score.raw_score,
                    advantages,
                    negotiation_notes,
                }
            })
            .collect();

        Ok(NegotiationResult {
            winner: winner.clone(),
            winner_score: winner_score.final_score,
            carbon_saved,
            cost_saved,
            reward_tokens,
            baseline,
            goals: *goals,
            comparison,
            reasoning,
        })
    }
}

/// Linear shift-and-scale of a raw score onto a non-negative display range.
pub fn display_score(raw_score: f64) -> f64 {
    ((raw_score + 1.0) * 50.0).max(0.0)
}

/// [`VendorNegotiator::score`] with default ranges and bonus, returning the display score.
pub fn vendor_score(vendor: &VendorOffer, goals: &BuyerGoals) -> f64 {
    VendorNegotiator::default().score(vendor, goals).final_score
}

/// [`VendorNegotiator::negotiate`] with default ranges and bonus.
pub fn negotiate(
    vendors: &[VendorOffer],
    goals: &BuyerGoals,
) -> Result<NegotiationResult, NegotiationError> {
    VendorNegotiator::default().negotiate(vendors, goals)
}

pub fn competitive_advantages(vendor: &VendorOffer) -> Vec<String> {
    let mut advantages = Vec::new();
    if vendor.price < 12.0 {
        advantages.push("competitive pricing".to_string());
    }
    if vendor.carbon < 20.0 {
        advantages.push("low carbon footprint".to_string());
    }
    if vendor.delivery <= 2.0 {
        advantages.push("fast delivery".to_string());
    }
    if vendor.sustainability_score >= 8.0 {
        advantages.push("high sustainability".to_string());
    }
    if vendor.willing_to_discount {
        advantages.push("flexible pricing".to_string());
    }

    if advantages.is_empty() {
        advantages.push("reliable service".to_string());
    }
    advantages
}

fn negotiation_notes(vendor: &VendorOffer, advantages: &[String]) -> String {
    let mut notes = Vec::new();
    if vendor.sustainability_score >= 8.0 {
        notes.push(format!(
            "Strong sustainability credentials ({}/10)",
            vendor.sustainability_score
        ));
    }
    if vendor.delivery <= 2.0 {
        notes.push(format!("Fast delivery ({} days)", vendor.delivery));
    }
    if !advantages.is_empty() {
        notes.push(format!("Key advantages: {}", advantages.join(", ")));
    }

    if notes.is_empty() {
        "Standard competitive offering".to_string()
    } else {
        notes.join(". ")
    }
}
