//! Maps raw offer attributes onto a fixed reference scale.

use serde::{Deserialize, Serialize};

/// Reference maxima each attribute is divided by.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceRanges {
    pub price_max: f64,
    pub carbon_max: f64,
    pub delivery_max: f64,
    pub sustainability_max: f64,
}

impl Default for ReferenceRanges {
    fn default() -> Self {
        Self {
            price_max: 50.0,
            carbon_max: 100.0,
            delivery_max: 10.0,
            sustainability_max: 10.0,
        }
    }
}

/// Raw attributes of an offer before normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OfferAttributes {
    pub price: f64,
    pub carbon: f64,
    pub delivery: f64,
    pub sustainability: f64,
}

/// Offer attributes after normalization.
///
/// `price`, `carbon` and `delivery` are within `[0, 1]`. `sustainability` is
/// only bounded below: a score above the reference maximum yields a value
/// above one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedAttributes {
    pub price: f64,
    pub carbon: f64,
    pub delivery: f64,
    pub sustainability: f64,
}

/// Unclamped `raw / reference`.
pub fn ratio(raw: f64, reference: f64) -> f64 {
    raw / reference
}

/// Normalization for attributes the buyer wants to minimize.
pub fn lower_is_better(raw: f64, max: f64) -> f64 {
    ratio(raw, max).min(1.0)
}

/// Normalization for attributes the buyer wants to maximize. No upper clamp.
pub fn higher_is_better(raw: f64, max: f64) -> f64 {
    ratio(raw, max)
}

impl ReferenceRanges {
    pub fn normalize(&self, attributes: OfferAttributes) -> NormalizedAttributes {
        NormalizedAttributes {
            price: lower_is_better(attributes.price, self.price_max),
            carbon: lower_is_better(attributes.carbon, self.carbon_max),
            delivery: lower_is_better(attributes.delivery, self.delivery_max),
            sustainability: higher_is_better(attributes.sustainability, self.sustainability_max),
        }
    }

    /// Names of maxima that are not strictly positive and finite.
    pub(crate) fn invalid_fields(&self) -> Vec<&'static str> {
        [
            ("ranges.price_max", self.price_max),
            ("ranges.carbon_max", self.carbon_max),
            ("ranges.delivery_max", self.delivery_max),
            ("ranges.sustainability_max", self.sustainability_max),
        ]
        .into_iter()
        .filter(|(_, value)| !(value.is_finite() && *value > 0.0))
        .map(|(name, _)| name)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attributes(price: f64, carbon: f64, delivery: f64, sustainability: f64) -> OfferAttributes {
        OfferAttributes {
            price,
            carbon,
            delivery,
            sustainability,
        }
    }

    #[test]
    fn zero_maps_to_zero() {
        let normalized = ReferenceRanges::default().normalize(attributes(0.0, 0.0, 0.0, 0.0));
        assert_eq!(normalized.price, 0.0);
        assert_eq!(normalized.carbon, 0.0);
        assert_eq!(normalized.delivery, 0.0);
        assert_eq!(normalized.sustainability, 0.0);
    }

    #[test]
    fn minimized_attributes_clamp_at_one() {
        let normalized =
            ReferenceRanges::default().normalize(attributes(120.0, 250.0, 30.0, 5.0));
        assert_eq!(normalized.price, 1.0);
        assert_eq!(normalized.carbon, 1.0);
        assert_eq!(normalized.delivery, 1.0);
        assert_eq!(normalized.sustainability, 0.5);
    }

    #[test]
    fn sustainability_is_left_unclamped() {
        let normalized = ReferenceRanges::default().normalize(attributes(10.0, 20.0, 2.0, 15.0));
        assert_eq!(normalized.sustainability, 1.5);
    }

    #[test]
    fn uses_reference_maxima() {
        let normalized = ReferenceRanges::default().normalize(attributes(10.0, 20.0, 2.0, 8.0));
        assert!((normalized.price - 0.2).abs() < 1e-12);
        assert!((normalized.carbon - 0.2).abs() < 1e-12);
        assert!((normalized.delivery - 0.2).abs() < 1e-12);
        assert!((normalized.sustainability - 0.8).abs() < 1e-12);
    }

    #[test]
    fn flags_non_positive_maxima() {
        let ranges = ReferenceRanges {
            price_max: 0.0,
            delivery_max: f64::NAN,
            ..ReferenceRanges::default()
        };
        assert_eq!(
            ranges.invalid_fields(),
            vec!["ranges.price_max", "ranges.delivery_max"]
        );
        assert!(ReferenceRanges::default().invalid_fields().is_empty());
    }
}
