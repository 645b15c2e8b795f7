//! Output record types shared by the scraper and the persistence sinks.

use serde::{Deserialize, Serialize};

/// One priced offer discovered on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferVariant {
    /// Identifying string for the offer (e.g. `"ID 2010"`).
    pub label: String,
    pub weight_kg: Option<f64>,
    pub price_total: Option<f64>,
    /// `price_total / weight_kg` rounded to 6 decimal places; present only
    /// when both inputs are present and the weight is non-zero.
    pub price_per_kg: Option<f64>,
    pub raw_weight: Option<String>,
    pub raw_price: Option<String>,
    /// Which extraction strategy produced this variant.
    pub source: String,
}

/// One page's outcome for one run.
///
/// Carries either a non-empty `variants` list (multi-offer pages) or the
/// scalar `price_total` / `weight_kg_total` fields (single-offer and
/// fallback pages). When neither yields a price, `error` explains why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub url: String,
    pub title: Option<String>,
    pub currency: String,

    pub price_total: Option<f64>,
    pub weight_kg_total: Option<f64>,
    pub price_per_kg: Option<f64>,

    #[serde(default)]
    pub variants: Vec<OfferVariant>,

    pub raw_price: Option<String>,
    pub price_method: Option<String>,
    pub error: Option<String>,

    pub http_status: Option<u16>,
    pub final_url: Option<String>,
    pub content_type: Option<String>,
}

impl PageSnapshot {
    /// An empty snapshot carrying only transport metadata.
    #[must_use]
    pub fn new(url: &str, currency: &str) -> Self {
        Self {
            url: url.to_owned(),
            title: None,
            currency: currency.to_owned(),
            price_total: None,
            weight_kg_total: None,
            price_per_kg: None,
            variants: Vec::new(),
            raw_price: None,
            price_method: None,
            error: None,
            http_status: None,
            final_url: None,
            content_type: None,
        }
    }

    /// `true` when the page produced at least one price this run.
    #[must_use]
    pub fn has_price(&self) -> bool {
        !self.variants.is_empty() || self.price_total.is_some()
    }
}

/// Derives the price-per-kilogram metric, rounded to 6 decimal places.
///
/// Returns `None` unless both inputs are present and the weight is strictly
/// positive; a zero or missing weight is "not computable", never a division.
#[must_use]
pub fn price_per_kg(price_total: Option<f64>, weight_kg: Option<f64>) -> Option<f64> {
    match (price_total, weight_kg) {
        (Some(price), Some(weight)) if weight > 0.0 => {
            Some((price / weight * 1_000_000.0).round() / 1_000_000.0)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_kg_rounds_to_six_places() {
        assert_eq!(price_per_kg(Some(1845.0), Some(975.0)), Some(1.892_308));
    }

    #[test]
    fn per_kg_exact_division() {
        assert_eq!(price_per_kg(Some(1900.0), Some(1000.0)), Some(1.9));
    }

    #[test]
    fn per_kg_absent_when_weight_zero() {
        assert_eq!(price_per_kg(Some(1845.0), Some(0.0)), None);
    }

    #[test]
    fn per_kg_absent_when_weight_missing() {
        assert_eq!(price_per_kg(Some(1845.0), None), None);
    }

    #[test]
    fn per_kg_absent_when_price_missing() {
        assert_eq!(price_per_kg(None, Some(975.0)), None);
    }

    #[test]
    fn per_kg_absent_when_weight_negative() {
        assert_eq!(price_per_kg(Some(10.0), Some(-5.0)), None);
    }

    #[test]
    fn snapshot_has_price_with_variants_only() {
        let mut snap = PageSnapshot::new("https://example.com", "PLN");
        assert!(!snap.has_price());
        snap.variants.push(OfferVariant {
            label: "ID 1".to_owned(),
            weight_kg: Some(975.0),
            price_total: Some(1845.0),
            price_per_kg: price_per_kg(Some(1845.0), Some(975.0)),
            raw_weight: None,
            raw_price: None,
            source: "offer-card".to_owned(),
        });
        assert!(snap.has_price());
    }

    #[test]
    fn snapshot_has_price_with_scalar_total() {
        let mut snap = PageSnapshot::new("https://example.com", "PLN");
        snap.price_total = Some(1099.0);
        assert!(snap.has_price());
    }

    #[test]
    fn snapshot_serializes_round_trip() {
        let mut snap = PageSnapshot::new("https://example.com/p", "PLN");
        snap.title = Some("Pellet Gold".to_owned());
        snap.price_total = Some(1099.0);
        snap.weight_kg_total = Some(975.0);
        snap.price_per_kg = price_per_kg(snap.price_total, snap.weight_kg_total);
        snap.http_status = Some(200);

        let json = serde_json::to_string(&snap).unwrap();
        let back: PageSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }
}
