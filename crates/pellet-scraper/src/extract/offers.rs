//! Structured extraction of priced offer cards from rendered HTML.
//!
//! An offer card is a self-contained markup block carrying a product
//! identifier, a "regular price" label, a weight in kilograms and a
//! currency-tagged price. Cards are located by textual landmarks within
//! bounded DOM proximity rather than by fixed selectors, which survives
//! the frequent class-name churn on the tracked shops.

use regex::Regex;
use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node};

use pellet_core::{price_per_kg, OfferVariant};

use super::text::{normalize, parse_float_pl};

/// Strategy tag recorded on variants produced by this extractor.
pub const OFFER_CARD_SOURCE: &str = "offer-card";

/// Tunable landmarks for offer-card extraction.
///
/// The ancestor climb is a structural-proximity heuristic, not a semantic
/// guarantee; the bound and label patterns are explicit so tests can
/// exercise the edges (label on the immediate parent, label never found).
#[derive(Debug, Clone)]
pub struct ExtractParams {
    /// Pattern marking the start of the related-products section; the
    /// document is truncated at its first match before extraction.
    pub related_marker: String,
    /// Product-identifier pattern; first capture group is the ID digits.
    pub id_pattern: String,
    /// Label that must appear in an ancestor container's flattened text.
    pub price_label: String,
    /// How many ancestors to climb looking for `price_label`; 0 checks
    /// only the text node's immediate parent.
    pub max_ancestor_depth: usize,
}

impl Default for ExtractParams {
    fn default() -> Self {
        Self {
            related_marker: r"Produkty\s+powi[aą]zane".to_owned(),
            id_pattern: r"ID\s*Produktu\s*(\d+)".to_owned(),
            price_label: r"Cena\s+regularna".to_owned(),
            max_ancestor_depth: 6,
        }
    }
}

/// Parses zero-to-many offer cards out of rendered HTML, in document order.
///
/// Cards missing any of identifier, price or weight, or whose weight
/// resolves to zero, are skipped rather than emitted partially filled. An
/// empty result is the designed trigger for the single-offer fallback.
#[must_use]
pub fn extract_offer_cards(html: &str, params: &ExtractParams) -> Vec<OfferVariant> {
    let id_re = Regex::new(&format!("(?i){}", params.id_pattern)).expect("valid regex");
    let label_re = Regex::new(&format!("(?i){}", params.price_label)).expect("valid regex");
    let price_re = Regex::new(r"(?i)(\d[\d\s.,]*)\s*(?:zł|zl|PLN)\b").expect("valid regex");
    let weight_re = Regex::new(&format!(
        r"(?i){}.*?(\d+(?:[.,]\d+)?)\s*kg",
        params.price_label
    ))
    .expect("valid regex");

    // Cut the related-products section completely so its cards cannot
    // contaminate the result.
    let related_re = Regex::new(&format!("(?i){}", params.related_marker)).expect("valid regex");
    let html = match related_re.find(html) {
        Some(m) => &html[..m.start()],
        None => html,
    };

    let doc = Html::parse_document(html);
    let mut results = Vec::new();

    for node in doc.tree.nodes() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        if !id_re.is_match(text) {
            continue;
        }

        // Bounded climb to the nearest ancestor whose flattened text also
        // carries the price label; no such ancestor means this ID mention
        // is not part of an offer card.
        let Some(container) = find_labeled_ancestor(node, &label_re, params.max_ancestor_depth)
        else {
            continue;
        };

        let flat = normalize(&container.text().collect::<Vec<_>>().join(" "));

        let Some(id_caps) = id_re.captures(&flat) else {
            continue;
        };
        let Some(price_m) = price_re.captures(&flat) else {
            continue;
        };
        let Some(weight_m) = weight_re.captures(&flat) else {
            continue;
        };

        let price = parse_float_pl(&price_m[1]);
        let weight = parse_float_pl(&weight_m[1]);
        let (Some(price), Some(weight)) = (price, weight) else {
            continue;
        };
        if weight == 0.0 {
            continue;
        }

        results.push(OfferVariant {
            label: format!("ID {}", &id_caps[1]),
            weight_kg: Some(weight),
            price_total: Some(price),
            price_per_kg: price_per_kg(Some(price), Some(weight)),
            raw_weight: Some(weight_m[0].to_string()),
            raw_price: Some(price_m[0].to_string()),
            source: OFFER_CARD_SOURCE.to_owned(),
        });
    }

    results
}

/// Climbs from a text node's parent up to `max_depth` additional ancestors,
/// returning the first element whose flattened text matches `label_re`.
fn find_labeled_ancestor<'a>(
    node: NodeRef<'a, Node>,
    label_re: &Regex,
    max_depth: usize,
) -> Option<ElementRef<'a>> {
    let mut current = node.parent();
    for _ in 0..=max_depth {
        let candidate = current?;
        if let Some(el) = ElementRef::wrap(candidate) {
            let flat: String = el.text().collect();
            if label_re.is_match(&flat) {
                return Some(el);
            }
        }
        current = candidate.parent();
    }
    None
}

#[cfg(test)]
#[path = "offers_test.rs"]
mod tests;
