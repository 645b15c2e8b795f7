//! Per-URL pipeline: decode, render when required, extract with layered
//! strategies, and normalize into one [`PageSnapshot`].

use scraper::{Html, Selector};

use pellet_core::{price_per_kg, AppConfig, PageSnapshot};

use crate::encoding::decode_html_bytes;
use crate::extract::{
    extract_offer_cards, extract_page_weight_kg, extract_single_offer, extract_widget_price,
    ExtractParams, RENDER_FALLBACK_SOURCE, WOOCOMMERCE_SOURCE,
};
use crate::fetch::FetchedPage;
use crate::render::PageRenderer;

/// `true` when the source only exposes prices after client-side rendering.
#[must_use]
pub fn requires_render(url: &str, render_hosts: &[String]) -> bool {
    render_hosts.iter().any(|host| url.contains(host.as_str()))
}

/// Builds the snapshot for one fetched source page.
///
/// Extraction failures are absorbed here: a failed render or an extraction
/// chain that finds nothing produces a snapshot with an explanatory
/// `error`, never an `Err`. The run loop therefore records every
/// configured URL.
pub async fn scrape_page(
    config: &AppConfig,
    renderer: &dyn PageRenderer,
    params: &ExtractParams,
    fetched: &FetchedPage,
    url: &str,
) -> PageSnapshot {
    let (html, replacement_chars) =
        decode_html_bytes(&fetched.bytes, fetched.encoding_hint.as_deref());
    if replacement_chars > 0 {
        tracing::warn!(
            url,
            replacement_chars,
            "degraded decode, proceeding with best-effort text"
        );
    }

    let mut snap = PageSnapshot::new(url, &config.currency);
    snap.http_status = Some(fetched.http_status);
    snap.final_url = Some(fetched.final_url.clone());
    snap.content_type = fetched.content_type.clone();
    snap.title = page_title(&html);

    if requires_render(url, &config.render_hosts) {
        scrape_rendered(&mut snap, renderer, params, url).await;
    } else {
        scrape_static(&mut snap, &html);
    }

    // Absence of data is always explained.
    if !snap.has_price() && snap.error.is_none() {
        snap.error = Some("no price found".to_owned());
    }

    snap
}

/// Rendered path: structured offer cards first, page-wide single-offer
/// fallback when no card survives. The structured path is never retried
/// once it yields a non-empty sequence.
async fn scrape_rendered(
    snap: &mut PageSnapshot,
    renderer: &dyn PageRenderer,
    params: &ExtractParams,
    url: &str,
) {
    let rendered = match renderer.render(url).await {
        Ok(html) => html,
        Err(err) => {
            tracing::error!(url, error = %err, "render failed, recording page without price");
            snap.error = Some(format!("render failed: {err}"));
            return;
        }
    };

    snap.variants = extract_offer_cards(&rendered, params);
    if !snap.variants.is_empty() {
        tracing::info!(url, offers = snap.variants.len(), "structured offers extracted");
        return;
    }

    tracing::warn!(url, "no offer cards after render, using single-offer fallback");
    let offer = extract_single_offer(&rendered);
    snap.price_total = offer.price_total;
    snap.weight_kg_total = offer.weight_kg;
    snap.price_per_kg = price_per_kg(offer.price_total, offer.weight_kg);
    snap.raw_price = offer.raw_price;
    snap.price_method = Some(RENDER_FALLBACK_SOURCE.to_owned());
    snap.error = Some("no offers after render".to_owned());
}

/// Static path: WooCommerce price widget plus the first page-wide weight.
fn scrape_static(snap: &mut PageSnapshot, html: &str) {
    if let Some((price, raw)) = extract_widget_price(html) {
        snap.price_total = Some(price);
        snap.raw_price = Some(raw);
        snap.price_method = Some(WOOCOMMERCE_SOURCE.to_owned());

        if let Some((weight, _)) = extract_page_weight_kg(html) {
            snap.weight_kg_total = Some(weight);
            snap.price_per_kg = price_per_kg(snap.price_total, Some(weight));
        }
    }
}

fn page_title(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;
    let title = doc
        .select(&selector)
        .next()?
        .text()
        .collect::<String>()
        .trim()
        .to_string();
    (!title.is_empty()).then_some(title)
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
