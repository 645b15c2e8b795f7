//! Layered extraction strategies over rendered or static HTML.
//!
//! Structured offer-card parsing runs first; the page-wide single-offer
//! fallback fires only when it yields nothing. Static pages use the
//! lightweight price-widget path instead. All strategies are pure
//! functions over HTML text so they test from fixture strings.

pub mod fallback;
pub mod offers;
pub(crate) mod text;

pub use fallback::{
    extract_page_weight_kg, extract_single_offer, extract_widget_price, SingleOffer,
    RENDER_FALLBACK_SOURCE, WOOCOMMERCE_SOURCE,
};
pub use offers::{extract_offer_cards, ExtractParams, OFFER_CARD_SOURCE};
