//! One tracking pass over all configured source URLs.
//!
//! Strictly sequential: one source at a time with a politeness delay
//! between requests. Per-URL failures are recorded on the snapshot and
//! never abort the rest of the run.

use std::time::Duration;

use chrono::SecondsFormat;

use pellet_core::{AppConfig, PageSnapshot};
use pellet_scraper::{
    build_client, fetch_page, scrape_page, ChromiumRenderer, ExtractParams, PageRenderer,
};

use crate::sink;

/// Executes one full run: fetch, extract, persist, summarize.
pub async fn execute() -> anyhow::Result<()> {
    let config = pellet_core::load_app_config_from_env()?;
    let client = build_client(config.request_timeout_secs, &config.user_agent)?;
    let renderer = ChromiumRenderer::new(
        &config.postal_code,
        config.pallet_count,
        config.render_timeout_secs,
    );

    let run_time = chrono::Local::now().to_rfc3339_opts(SecondsFormat::Secs, false);
    let snapshots = collect_snapshots(&config, &client, &renderer).await;

    sink::persist_run(&config, &run_time, &snapshots)?;

    let ok_sources = snapshots.iter().filter(|s| s.has_price()).count();
    sink::append_run_log(&config.out_run_log, &run_time, ok_sources, snapshots.len())?;

    tracing::info!(
        ok_sources,
        total = snapshots.len(),
        "run finished"
    );
    println!("OK - {ok_sources}/{} finished correctly", snapshots.len());
    Ok(())
}

/// Processes every configured source in order, always producing one
/// snapshot per URL.
pub(crate) async fn collect_snapshots(
    config: &AppConfig,
    client: &reqwest::Client,
    renderer: &dyn PageRenderer,
) -> Vec<PageSnapshot> {
    let params = ExtractParams::default();
    let mut snapshots = Vec::with_capacity(config.source_urls.len());

    for (idx, url) in config.source_urls.iter().enumerate() {
        if idx > 0 && config.inter_request_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(config.inter_request_delay_ms)).await;
        }

        tracing::info!(url, "processing source");
        let snap = match fetch_page(
            client,
            url,
            config.max_retries,
            config.retry_backoff_base_secs,
        )
        .await
        {
            Ok(fetched) => scrape_page(config, renderer, &params, &fetched, url).await,
            Err(err) => {
                // Transport failure: keep the record, move on to the next
                // source.
                tracing::error!(url, error = %err, "fetch failed");
                let mut snap = PageSnapshot::new(url, &config.currency);
                snap.error = Some(format!("fetch failed: {err}"));
                snap
            }
        };
        snapshots.push(snap);
    }

    snapshots
}
