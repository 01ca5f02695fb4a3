//! Seller reliability derived from transaction history.
//!
//! The tracker never stores totals. [`ReliabilityTracker::record_transaction`]
//! describes one transaction's contribution and [`ReliabilityTracker::absorb`]
//! folds that contribution into totals the caller owns.

use super::clamp_score;
use serde::{Deserialize, Serialize};

/// Weights applied to the three reliability signals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReliabilityWeights {
    pub successful_transactions: f64,
    pub avg_rating: f64,
    pub carbon_savings: f64,
}

impl Default for ReliabilityWeights {
    fn default() -> Self {
        Self {
            successful_transactions: 2.0,
            avg_rating: 1.5,
            carbon_savings: 0.75,
        }
    }
}

/// Per-seller aggregate and the score derived from it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReliabilityRecord {
    pub total_transactions: u64,
    pub successful_transactions: u64,
    pub avg_rating: f64,
    pub carbon_savings: f64,
    pub reliability_score: f64,
}

/// A completed transaction as reported by the surrounding application.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransactionOutcome {
    pub success: bool,
    pub rating: f64,
    pub carbon_saved: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ReliabilityTracker {
    weights: ReliabilityWeights,
}

impl ReliabilityTracker {
    pub fn new(weights: ReliabilityWeights) -> Self {
        Self { weights }
    }

    /// Weighted sum of the three signals, clamped to `[0, 100]`.
    pub fn score(&self, successful_transactions: u64, avg_rating: f64, carbon_savings: f64) -> f64 {
        clamp_score(
            successful_transactions as f64 * self.weights.successful_transactions
                + avg_rating * self.weights.avg_rating
                + carbon_savings * self.weights.carbon_savings,
        )
    }

    /// Recompute the derived score from the record's own totals.
    pub fn rescore(&self, record: &ReliabilityRecord) -> ReliabilityRecord {
        ReliabilityRecord {
            reliability_score: self.score(
                record.successful_transactions,
                record.avg_rating,
                record.carbon_savings,
            ),
            ..record.clone()
        }
    }

    /// Record reflecting exactly one transaction's contribution.
    pub fn record_transaction(&self, outcome: &TransactionOutcome) -> ReliabilityRecord {
        let successful_transactions = u64::from(outcome.success);
        ReliabilityRecord {
            total_transactions: 1,
            successful_transactions,
            avg_rating: outcome.rating,
            carbon_savings: outcome.carbon_saved,
            reliability_score: self.score(
                successful_transactions,
                outcome.rating,
                outcome.carbon_saved,
            ),
        }
    }

    /// Fold one transaction into running totals.
    ///
    /// Counts only grow, the rating is averaged over every recorded
    /// transaction and carbon savings accumulate.
    pub fn absorb(
        &self,
        totals: &ReliabilityRecord,
        outcome: &TransactionOutcome,
    ) -> ReliabilityRecord {
        let contribution = self.record_transaction(outcome);
        let total_transactions = totals
            .total_transactions
            .saturating_add(contribution.total_transactions);
        let successful_transactions = totals
            .successful_transactions
            .saturating_add(contribution.successful_transactions);
        let avg_rating = (totals.avg_rating * totals.total_transactions as f64
            + contribution.avg_rating)
            / total_transactions as f64;
        let carbon_savings = totals.carbon_savings + contribution.carbon_savings;

        ReliabilityRecord {
            total_transactions,
            successful_transactions,
            avg_rating,
            carbon_savings,
            reliability_score: self.score(successful_transactions, avg_rating, carbon_savings),
        }
    }
}

/// [`ReliabilityTracker::score`] with the default weights.
pub fn reliability_score(successful_transactions: u64, avg_rating: f64, carbon_savings: f64) -> f64 {
    ReliabilityTracker::default().score(successful_transactions, avg_rating, carbon_savings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(success: bool, rating: f64, carbon_saved: f64) -> TransactionOutcome {
        TransactionOutcome {
            success,
            rating,
            carbon_saved,
        }
    }

    #[test]
    fn weighted_sum_below_cap() {
        // 10*2.0 + 4.0*1.5 + 20*0.75
        assert_eq!(reliability_score(10, 4.0, 20.0), 41.0);
    }

    #[test]
    fn clamps_to_one_hundred() {
        assert_eq!(reliability_score(80, 5.0, 500.0), 100.0);
        assert_eq!(reliability_score(0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn single_transaction_contribution() {
        let tracker = ReliabilityTracker::default();
        let record = tracker.record_transaction(&outcome(true, 4.0, 10.0));
        assert_eq!(record.total_transactions, 1);
        assert_eq!(record.successful_transactions, 1);
        assert_eq!(record.avg_rating, 4.0);
        assert_eq!(record.carbon_savings, 10.0);
        assert_eq!(record.reliability_score, 2.0 + 6.0 + 7.5);

        let failed = tracker.record_transaction(&outcome(false, 1.0, 0.0));
        assert_eq!(failed.successful_transactions, 0);
        assert_eq!(failed.reliability_score, 1.5);
    }

    #[test]
    fn absorb_accumulates_running_totals() {
        let tracker = ReliabilityTracker::default();
        let first = tracker.absorb(&ReliabilityRecord::default(), &outcome(true, 5.0, 4.0));
        let second = tracker.absorb(&first, &outcome(false, 3.0, 2.0));

        assert_eq!(second.total_transactions, 2);
        assert_eq!(second.successful_transactions, 1);
        assert_eq!(second.avg_rating, 4.0);
        assert_eq!(second.carbon_savings, 6.0);
        assert_eq!(second.reliability_score, 2.0 + 6.0 + 4.5);
        assert!(second.total_transactions >= first.total_transactions);
    }

    #[test]
    fn absorb_into_empty_matches_single_contribution() {
        let tracker = ReliabilityTracker::default();
        let outcome = outcome(true, 4.5, 12.0);
        assert_eq!(
            tracker.absorb(&ReliabilityRecord::default(), &outcome),
            tracker.record_transaction(&outcome)
        );
    }

    #[test]
    fn rescore_is_idempotent() {
        let tracker = ReliabilityTracker::new(ReliabilityWeights {
            successful_transactions: 1.0,
            avg_rating: 1.0,
            carbon_savings: 1.0,
        });
        let record = ReliabilityRecord {
            total_transactions: 6,
            successful_transactions: 5,
            avg_rating: 4.0,
            carbon_savings: 3.0,
            reliability_score: 0.0,
        };
        let once = tracker.rescore(&record);
        assert_eq!(once.reliability_score, 12.0);
        assert_eq!(tracker.rescore(&once), once);
    }
}
