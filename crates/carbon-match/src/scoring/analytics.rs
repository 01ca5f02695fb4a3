use super::clamp_score;
use super::domain::UserTotals;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsWeights {
    pub quantity: f64,
    pub carbon: f64,
    pub reliability: f64,
    pub transactions: f64,
}

impl Default for AnalyticsWeights {
    fn default() -> Self {
        Self {
            quantity: 0.25,
            carbon: 0.35,
            reliability: 0.25,
            transactions: 0.15,
        }
    }
}

/// Totals at which each sub-score saturates at 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsTargets {
    pub quantity: f64,
    pub green_credits: f64,
    pub transactions: f64,
}

impl Default for AnalyticsTargets {
    fn default() -> Self {
        Self {
            quantity: 100.0,
            green_credits: 1000.0,
            transactions: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub weights: AnalyticsWeights,
    pub targets: AnalyticsTargets,
    pub neutral_reliability: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            weights: AnalyticsWeights::default(),
            targets: AnalyticsTargets::default(),
            neutral_reliability: 50.0,
        }
    }
}

/// Rounded sub-scores, each presentable on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub quantity_score: u8,
    pub carbon_score: u8,
    pub reliability_score: u8,
    pub transaction_score: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub overall_score: u8,
    pub breakdown: ScoreBreakdown,
}

#[derive(Debug, Clone, Default)]
pub struct AnalyticsAggregator {
    config: AnalyticsConfig,
}

impl AnalyticsAggregator {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    pub fn overall_score(&self, totals: &UserTotals) -> AnalyticsSnapshot {
        let targets = &self.config.targets;
        let quantity_score = saturating_percent(totals.quantity_purchased, targets.quantity);
        let carbon_score = saturating_percent(totals.green_credits, targets.green_credits);
        let transaction_score =
            saturating_percent(totals.total_transactions as f64, targets.transactions);
        let reliability_score = clamp_score(
            totals
                .reliability_score
                .unwrap_or(self.config.neutral_reliability),
        );

        let weights = &self.config.weights;
        let overall = clamp_score(
            quantity_score * weights.quantity
                + carbon_score * weights.carbon
                + reliability_score * weights.reliability
                + transaction_score * weights.transactions,
        );

        AnalyticsSnapshot {
            overall_score: round_score(overall),
            breakdown: ScoreBreakdown {
                quantity_score: round_score(quantity_score),
                carbon_score: round_score(carbon_score),
                reliability_score: round_score(reliability_score),
                transaction_score: round_score(transaction_score),
            },
        }
    }
}

/// [`AnalyticsAggregator::overall_score`] with the default configuration.
pub fn overall_score(totals: &UserTotals) -> AnalyticsSnapshot {
    AnalyticsAggregator::default().overall_score(totals)
}

fn saturating_percent(value: f64, target: f64) -> f64 {
    clamp_score(value / target * 100.0)
}

fn round_score(value: f64) -> u8 {
    clamp_score(value).round() as u8
}
