use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a buyer's sourcing request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub String);

/// Identifier of a quote submitted against a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(pub String);

/// Identifier of a seller account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SellerId(pub String);

/// Identifier of a vendor taking part in a negotiation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VendorId(pub String);

impl fmt::Display for SellerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for VendorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A buyer's request for carbon credits. Read-only input to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyerRequest {
    pub id: RequestId,
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub quantity: f64,
    pub desired_carbon_score: f64,
    #[serde(default)]
    pub max_price: Option<f64>,
}

/// A seller's quote against exactly one [`BuyerRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerQuote {
    pub id: QuoteId,
    pub request_id: RequestId,
    pub seller_id: SellerId,
    pub price: f64,
    pub carbon_score: f64,
    #[serde(default)]
    pub delivery_days: f64,
    /// Seller reliability captured when the quote was submitted.
    #[serde(default)]
    pub reliability_score: Option<f64>,
}

/// Vendor offer evaluated during a negotiation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorOffer {
    pub id: VendorId,
    pub name: String,
    pub price: f64,
    pub carbon: f64,
    pub delivery: f64,
    pub sustainability_score: f64,
    #[serde(default)]
    pub willing_to_discount: bool,
}

/// Buyer objective weights. Non-negative, not required to sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuyerGoals {
    pub minimize_cost: f64,
    pub minimize_carbon: f64,
    pub minimize_delivery: f64,
    pub maximize_sustainability: f64,
}

impl Default for BuyerGoals {
    fn default() -> Self {
        Self {
            minimize_cost: 0.3,
            minimize_carbon: 0.3,
            minimize_delivery: 0.2,
            maximize_sustainability: 0.2,
        }
    }
}

impl BuyerGoals {
    /// Human label of the heaviest weight; earlier goals win ties.
    pub fn dominant_label(&self) -> &'static str {
        let goals = [
            (self.minimize_cost, "cost"),
            (self.minimize_carbon, "carbon"),
            (self.minimize_delivery, "delivery time"),
            (self.maximize_sustainability, "sustainability"),
        ];

        let mut best: Option<(f64, &'static str)> = None;
        for (weight, label) in goals {
            if weight <= 0.0 {
                continue;
            }
            match best {
                Some((current, _)) if current >= weight => {}
                _ => best = Some((weight, label)),
            }
        }

        best.map(|(_, label)| label).unwrap_or("no stated preference")
    }
}

/// A user's running totals as kept by the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserTotals {
    #[serde(default)]
    pub quantity_purchased: f64,
    /// Total carbon saved, expressed in green credits.
    #[serde(default)]
    pub green_credits: f64,
    #[serde(default)]
    pub reliability_score: Option<f64>,
    #[serde(default)]
    pub total_transactions: u64,
}
