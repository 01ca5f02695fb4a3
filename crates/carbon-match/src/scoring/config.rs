use super::analytics::AnalyticsConfig;
use super::matcher::MatchConfig;
use super::negotiator::NegotiationConfig;
use super::normalizer::ReferenceRanges;
use super::reliability::ReliabilityWeights;
use serde::{Deserialize, Serialize};

/// Every tunable weight, range and placeholder used by the engine.
///
/// Missing fields fall back to their defaults, so a deployment can override
/// a single value without restating the rest.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub ranges: ReferenceRanges,
    pub matching: MatchConfig,
    pub reliability: ReliabilityWeights,
    pub negotiation: NegotiationConfig,
    pub analytics: AnalyticsConfig,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringConfigError {
    #[error("{field} must be a positive finite number")]
    NonPositiveRange { field: &'static str },
    #[error("{field} must be finite and non-negative, got {value}")]
    InvalidWeight { field: &'static str, value: f64 },
    #[error("{field} must lie within [0, 100], got {value}")]
    OutOfScoreRange { field: &'static str, value: f64 },
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ScoringConfigError> {
        if let Some(field) = self.ranges.invalid_fields().into_iter().next() {
            return Err(ScoringConfigError::NonPositiveRange { field });
        }

        let targets = &self.analytics.targets;
        for (field, value) in [
            ("analytics.targets.quantity", targets.quantity),
            ("analytics.targets.green_credits", targets.green_credits),
            ("analytics.targets.transactions", targets.transactions),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ScoringConfigError::NonPositiveRange { field });
            }
        }

        let matching = &self.matching.weights;
        let reliability = &self.reliability;
        let rewards = &self.negotiation.rewards;
        let analytics = &self.analytics.weights;
        for (field, value) in [
            ("matching.weights.price_fairness", matching.price_fairness),
            ("matching.weights.carbon_alignment", matching.carbon_alignment),
            ("matching.weights.reliability", matching.reliability),
            ("matching.weights.ai_confidence", matching.ai_confidence),
            (
                "reliability.successful_transactions",
                reliability.successful_transactions,
            ),
            ("reliability.avg_rating", reliability.avg_rating),
            ("reliability.carbon_savings", reliability.carbon_savings),
            ("negotiation.discount_bonus", self.negotiation.discount_bonus),
            (
                "negotiation.rewards.per_sustainability_point",
                rewards.per_sustainability_point,
            ),
            ("negotiation.rewards.per_cost_saved", rewards.per_cost_saved),
            ("negotiation.rewards.per_carbon_saved", rewards.per_carbon_saved),
            ("analytics.weights.quantity", analytics.quantity),
            ("analytics.weights.carbon", analytics.carbon),
            ("analytics.weights.reliability", analytics.reliability),
            ("analytics.weights.transactions", analytics.transactions),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ScoringConfigError::InvalidWeight { field, value });
            }
        }

        for (field, value) in [
            ("matching.ai_confidence", self.matching.ai_confidence),
            (
                "matching.neutral_price_fairness",
                self.matching.neutral_price_fairness,
            ),
            ("matching.neutral_reliability", self.matching.neutral_reliability),
            (
                "analytics.neutral_reliability",
                self.analytics.neutral_reliability,
            ),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ScoringConfigError::OutOfScoreRange { field, value });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(ScoringConfig::default().validate(), Ok(()));
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config: ScoringConfig =
            serde_json::from_str(r#"{ "matching": { "ai_confidence": 90.0 } }"#)
                .expect("partial config parses");
        assert_eq!(config.matching.ai_confidence, 90.0);
        assert_eq!(config.matching.weights.price_fairness, 0.30);
        assert_eq!(config.ranges.price_max, 50.0);
        assert_eq!(config.negotiation.discount_bonus, 0.1);
    }

    #[test]
    fn rejects_zero_reference_range() {
        let mut config = ScoringConfig::default();
        config.ranges.carbon_max = 0.0;
        assert_eq!(
            config.validate(),
            Err(ScoringConfigError::NonPositiveRange {
                field: "ranges.carbon_max"
            })
        );
    }

    #[test]
    fn rejects_negative_weight() {
        let mut config = ScoringConfig::default();
        config.reliability.avg_rating = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ScoringConfigError::InvalidWeight {
                field: "reliability.avg_rating",
                ..
            })
        ));
    }

    #[test]
    fn rejects_confidence_above_one_hundred() {
        let mut config = ScoringConfig::default();
        config.matching.ai_confidence = 120.0;
        assert!(matches!(
            config.validate(),
            Err(ScoringConfigError::OutOfScoreRange { .. })
        ));
    }
}
