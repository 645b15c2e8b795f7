//! Rendering boundary for pages that only expose prices after client-side
//! script execution.
//!
//! Extractors stay pure over HTML text; anything needing a live browser
//! goes through [`PageRenderer`], so the pipeline tests with canned HTML
//! and no Chromium dependency.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;

use crate::error::ScrapeError;

/// Selector patterns for the postal-code input, in priority order. The
/// last entry is a deliberate catch-all for pages that rename the field.
const POSTAL_SELECTORS: &[&str] = &[
    "input[name*='postal' i]",
    "input[name*='postcode' i]",
    "input[placeholder*='Kod' i]",
    "input[placeholder*='poczt' i]",
    "input[type='text']",
];

/// Clicks the first button whose visible text matches the tolerant
/// "check price" label; returns whether anything was clicked.
const CLICK_PRICE_BUTTON_JS: &str = r"(() => {
    const btn = Array.from(document.querySelectorAll('button'))
        .find(b => /sprawd/i.test(b.innerText));
    if (btn) { btn.click(); return true; }
    return false;
})()";

/// True once an offer card's landmarks are present in the visible text.
const OFFERS_VISIBLE_JS: &str = r"/ID\s*Produktu\s*\d+/i.test(document.body.innerText)
    || /Cena\s*regularna/i.test(document.body.innerText)";

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(250);
const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Produces fully rendered HTML for a source URL.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Renders `url` and returns the materialized DOM as HTML.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::RenderTimeout`] when the page never reveals a
    /// price within the bound, or a browser error for launch/navigation
    /// failures.
    async fn render(&self, url: &str) -> Result<String, ScrapeError>;
}

/// Headless-Chromium [`PageRenderer`].
///
/// Each call launches an isolated browser, performs the reveal-price
/// interaction sequence (postal code, quantity, button) and tears the
/// browser down; no state persists between calls. Every interaction step
/// is optional on a given page and silently skipped when its control is
/// absent — only the final wait condition can fail the render.
pub struct ChromiumRenderer {
    postal_code: String,
    pallet_count: u32,
    timeout_secs: u64,
}

impl ChromiumRenderer {
    #[must_use]
    pub fn new(postal_code: &str, pallet_count: u32, timeout_secs: u64) -> Self {
        Self {
            postal_code: postal_code.to_owned(),
            pallet_count,
            timeout_secs,
        }
    }

    async fn render_inner(&self, url: &str) -> Result<String, ScrapeError> {
        let config = BrowserConfig::builder()
            .no_sandbox()
            .arg("--lang=pl-PL")
            .build()
            .map_err(ScrapeError::BrowserLaunch)?;

        let (mut browser, mut handler) = Browser::launch(config).await?;
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let result = self.drive_page(&browser, url).await;

        // Teardown regardless of outcome; the handler loop ends with the
        // browser process.
        let _ = browser.close().await;
        let _ = browser.wait().await;
        let _ = handler_task.await;

        result
    }

    async fn drive_page(&self, browser: &Browser, url: &str) -> Result<String, ScrapeError> {
        let page = browser.new_page(url).await?;
        page.wait_for_navigation().await?;
        tokio::time::sleep(SETTLE_DELAY).await;

        // Postal code: first matching input wins, absence is fine.
        for sel in POSTAL_SELECTORS {
            if let Ok(input) = page.find_element(*sel).await {
                input.click().await?;
                input.type_str(&self.postal_code).await?;
                tracing::debug!(url, selector = *sel, "filled postal code input");
                break;
            }
        }

        // Pallet quantity.
        if let Ok(qty) = page.find_element("input[type='number']").await {
            qty.click().await?;
            qty.type_str(&self.pallet_count.to_string()).await?;
            tracing::debug!(url, "filled quantity input");
        }

        // Reveal-price button.
        let clicked = page
            .evaluate(CLICK_PRICE_BUTTON_JS)
            .await?
            .into_value::<bool>()
            .unwrap_or(false);
        tracing::debug!(url, clicked, "price button lookup");

        // Block until an offer card's landmarks appear, bounded.
        let deadline = tokio::time::Instant::now() + Duration::from_secs(self.timeout_secs);
        loop {
            let visible = page
                .evaluate(OFFERS_VISIBLE_JS)
                .await?
                .into_value::<bool>()
                .unwrap_or(false);
            if visible {
                break;
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(ScrapeError::RenderTimeout {
                    url: url.to_owned(),
                    timeout_secs: self.timeout_secs,
                });
            }
            tokio::time::sleep(WAIT_POLL_INTERVAL).await;
        }

        let html = page.content().await?;
        Ok(html)
    }
}

#[async_trait]
impl PageRenderer for ChromiumRenderer {
    async fn render(&self, url: &str) -> Result<String, ScrapeError> {
        tracing::info!(url, "rendering page in headless browser");
        self.render_inner(url).await
    }
}
