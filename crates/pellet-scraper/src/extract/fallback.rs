//! Lower-confidence, page-wide extraction used when no offer cards are
//! recoverable, plus the lightweight price-widget path for static pages.

use regex::Regex;
use scraper::{Html, Selector};

use super::text::{normalize, parse_float_pl};

/// Strategy tag for the rendered-page single-offer fallback.
pub const RENDER_FALLBACK_SOURCE: &str = "render-fallback";
/// Strategy tag for the static WooCommerce price-widget path.
pub const WOOCOMMERCE_SOURCE: &str = "woocommerce";

/// A best-effort single price/weight pair pulled from flattened page text.
/// Either side may be absent; this never represents more than one offer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SingleOffer {
    pub price_total: Option<f64>,
    pub weight_kg: Option<f64>,
    pub raw_price: Option<String>,
}

/// Page-wide single price/weight extraction from rendered HTML.
///
/// The weight is anchored to the "regular price" label ("Cena regularna
/// 975kg z VAT"); the price is the first currency-tagged number anywhere in
/// the visible text ("1 845,00 zł"). Strictly lower confidence than
/// [`super::offers::extract_offer_cards`]; callers must record an
/// explanatory error alongside the result.
#[must_use]
pub fn extract_single_offer(html: &str) -> SingleOffer {
    let doc = Html::parse_document(html);
    let text = normalize(
        &doc.root_element()
            .text()
            .collect::<Vec<_>>()
            .join(" "),
    );

    let weight_re =
        Regex::new(r"(?i)Cena\s+regularna\s+(\d+(?:[.,]\d+)?)\s*kg").expect("valid regex");
    let weight_kg = weight_re
        .captures(&text)
        .and_then(|c| parse_float_pl(&c[1]));

    let price_re = Regex::new(r"(?i)(\d[\d\s.,]*)\s*(?:zł|zl|PLN)\b").expect("valid regex");
    let (price_total, raw_price) = match price_re.captures(&text) {
        Some(c) => (parse_float_pl(&c[1]), Some(c[0].to_string())),
        None => (None, None),
    };

    SingleOffer {
        price_total,
        weight_kg,
        raw_price,
    }
}

/// Static-page price extraction from the WooCommerce price widget.
///
/// Returns the parsed price and the widget's raw text for the first
/// `.woocommerce-Price-amount` node carrying a currency-tagged number.
#[must_use]
pub fn extract_widget_price(html: &str) -> Option<(f64, String)> {
    let doc = Html::parse_document(html);
    let selector = Selector::parse(".woocommerce-Price-amount").ok()?;
    let re = Regex::new(r"(?i)(\d[\d\s.,]*)\s*(?:zł|zl)").expect("valid regex");

    for node in doc.select(&selector) {
        let raw = normalize(&node.text().collect::<Vec<_>>().join(" "));
        if let Some(caps) = re.captures(&raw) {
            if let Some(price) = parse_float_pl(&caps[1]) {
                return Some((price, raw));
            }
        }
    }
    None
}

/// First standalone weight-in-kilograms mention anywhere in the page text.
///
/// Known precision/recall tradeoff: an unrelated "kg" mention earlier in
/// the page wins over the product's own weight.
#[must_use]
pub fn extract_page_weight_kg(html: &str) -> Option<(f64, String)> {
    let doc = Html::parse_document(html);
    let text = normalize(
        &doc.root_element()
            .text()
            .collect::<Vec<_>>()
            .join(" "),
    );
    let re = Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*kg").expect("valid regex");
    let caps = re.captures(&text)?;
    let weight = parse_float_pl(&caps[1])?;
    Some((weight, caps[0].to_string()))
}
