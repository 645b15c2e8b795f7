//! Persistence sinks for run output: append-only JSONL, a latest-run JSON
//! snapshot, a flattened CSV log, and a one-line-per-run text log.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use pellet_core::{AppConfig, PageSnapshot};

/// Full payload of one run, as stored in JSONL and the latest snapshot.
#[derive(Debug, Serialize)]
struct RunPayload<'a> {
    fetched_at: &'a str,
    items: &'a [PageSnapshot],
}

/// CSV columns: one row per variant, or one summary row per page when the
/// page produced no variants.
const CSV_HEADER: [&str; 7] = [
    "fetched_at",
    "url",
    "variant",
    "price",
    "kg",
    "pln_per_kg",
    "source",
];

/// Writes all per-run outputs: overwrites the latest-run snapshot, appends
/// the run payload to the JSONL history, and appends flattened CSV rows.
pub fn persist_run(
    config: &AppConfig,
    fetched_at: &str,
    items: &[PageSnapshot],
) -> anyhow::Result<()> {
    let payload = RunPayload { fetched_at, items };

    std::fs::write(
        &config.out_latest_json,
        serde_json::to_string_pretty(&payload)?,
    )?;

    let mut jsonl = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.out_jsonl)?;
    writeln!(jsonl, "{}", serde_json::to_string(&payload)?)?;

    append_csv_rows(&config.out_csv, fetched_at, items)?;

    tracing::debug!(
        latest = %config.out_latest_json.display(),
        jsonl = %config.out_jsonl.display(),
        csv = %config.out_csv.display(),
        "run output persisted"
    );
    Ok(())
}

/// Appends one summary line (`<ts> ok_sources=N/M`) to the run log.
pub fn append_run_log(
    path: &Path,
    fetched_at: &str,
    ok_sources: usize,
    total: usize,
) -> anyhow::Result<()> {
    let mut log = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(log, "{fetched_at} ok_sources={ok_sources}/{total}")?;
    Ok(())
}

fn append_csv_rows(path: &Path, fetched_at: &str, items: &[PageSnapshot]) -> anyhow::Result<()> {
    let write_header = !path.exists();
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    if write_header {
        writer.write_record(CSV_HEADER)?;
    }

    for page in items {
        if page.variants.is_empty() {
            let (price, kg, per_kg) = (
                fmt_opt(page.price_total),
                fmt_opt(page.weight_kg_total),
                fmt_opt(page.price_per_kg),
            );
            writer.write_record([
                fetched_at,
                page.url.as_str(),
                "",
                price.as_str(),
                kg.as_str(),
                per_kg.as_str(),
                page.price_method.as_deref().unwrap_or(""),
            ])?;
        } else {
            for variant in &page.variants {
                let (price, kg, per_kg) = (
                    fmt_opt(variant.price_total),
                    fmt_opt(variant.weight_kg),
                    fmt_opt(variant.price_per_kg),
                );
                writer.write_record([
                    fetched_at,
                    page.url.as_str(),
                    variant.label.as_str(),
                    price.as_str(),
                    kg.as_str(),
                    per_kg.as_str(),
                    variant.source.as_str(),
                ])?;
            }
        }
    }

    writer.flush()?;
    Ok(())
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pellet_core::{price_per_kg, OfferVariant};

    use super::*;

    fn config_in(dir: &Path) -> AppConfig {
        AppConfig {
            source_urls: vec![],
            render_hosts: vec![],
            currency: "PLN".to_owned(),
            postal_code: "40-000".to_owned(),
            pallet_count: 1,
            out_jsonl: dir.join("pellet_prices.jsonl"),
            out_latest_json: dir.join("pellet_prices_latest.json"),
            out_csv: dir.join("pellet_prices.csv"),
            out_run_log: dir.join("runs.txt"),
            request_timeout_secs: 5,
            render_timeout_secs: 5,
            user_agent: "pellet-tracker/test".to_owned(),
            inter_request_delay_ms: 0,
            max_retries: 0,
            retry_backoff_base_secs: 0,
        }
    }

    fn page_with_variants(url: &str) -> PageSnapshot {
        let mut snap = PageSnapshot::new(url, "PLN");
        snap.variants = vec![
            OfferVariant {
                label: "ID 2010".to_owned(),
                weight_kg: Some(975.0),
                price_total: Some(1845.0),
                price_per_kg: price_per_kg(Some(1845.0), Some(975.0)),
                raw_weight: None,
                raw_price: Some("1 845,00 zł".to_owned()),
                source: "offer-card".to_owned(),
            },
            OfferVariant {
                label: "ID 2011".to_owned(),
                weight_kg: Some(1000.0),
                price_total: Some(1900.0),
                price_per_kg: price_per_kg(Some(1900.0), Some(1000.0)),
                raw_weight: None,
                raw_price: Some("1 900,00 zł".to_owned()),
                source: "offer-card".to_owned(),
            },
        ];
        snap
    }

    fn page_without_variants(url: &str) -> PageSnapshot {
        let mut snap = PageSnapshot::new(url, "PLN");
        snap.price_total = Some(1099.0);
        snap.weight_kg_total = Some(975.0);
        snap.price_per_kg = price_per_kg(snap.price_total, snap.weight_kg_total);
        snap.price_method = Some("woocommerce".to_owned());
        snap
    }

    #[test]
    fn persist_writes_all_three_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let items = vec![page_with_variants("https://a.example/p")];

        persist_run(&config, "2025-01-02T03:04:05+01:00", &items).unwrap();

        assert!(config.out_latest_json.exists());
        assert!(config.out_jsonl.exists());
        assert!(config.out_csv.exists());
    }

    #[test]
    fn jsonl_appends_one_line_per_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let items = vec![page_without_variants("https://a.example/p")];

        persist_run(&config, "2025-01-02T03:04:05+01:00", &items).unwrap();
        persist_run(&config, "2025-01-03T03:04:05+01:00", &items).unwrap();

        let jsonl = std::fs::read_to_string(&config.out_jsonl).unwrap();
        assert_eq!(jsonl.lines().count(), 2);
        let first: serde_json::Value = serde_json::from_str(jsonl.lines().next().unwrap()).unwrap();
        assert_eq!(first["fetched_at"], "2025-01-02T03:04:05+01:00");
        assert_eq!(first["items"][0]["price_total"], 1099.0);
    }

    #[test]
    fn latest_json_is_overwritten_not_appended() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let items = vec![page_without_variants("https://a.example/p")];

        persist_run(&config, "2025-01-02T03:04:05+01:00", &items).unwrap();
        persist_run(&config, "2025-01-03T03:04:05+01:00", &items).unwrap();

        let latest: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&config.out_latest_json).unwrap())
                .unwrap();
        assert_eq!(latest["fetched_at"], "2025-01-03T03:04:05+01:00");
    }

    #[test]
    fn csv_writes_header_once_and_one_row_per_variant() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        persist_run(
            &config,
            "2025-01-02T03:04:05+01:00",
            &[page_with_variants("https://a.example/p")],
        )
        .unwrap();
        persist_run(
            &config,
            "2025-01-03T03:04:05+01:00",
            &[page_without_variants("https://b.example/q")],
        )
        .unwrap();

        let csv_text = std::fs::read_to_string(&config.out_csv).unwrap();
        let lines: Vec<&str> = csv_text.lines().collect();
        // header + 2 variant rows + 1 summary row
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "fetched_at,url,variant,price,kg,pln_per_kg,source"
        );
        assert!(lines[1].contains("ID 2010"));
        assert!(lines[2].contains("ID 2011"));
        assert!(lines[3].contains("woocommerce"));
        assert!(lines[3].contains(",,"), "summary row has empty variant cell");
    }

    #[test]
    fn run_log_appends_summary_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log_path: PathBuf = dir.path().join("runs.txt");

        append_run_log(&log_path, "2025-01-02T03:04:05+01:00", 4, 5).unwrap();
        append_run_log(&log_path, "2025-01-03T03:04:05+01:00", 5, 5).unwrap();

        let log = std::fs::read_to_string(&log_path).unwrap();
        assert_eq!(
            log,
            "2025-01-02T03:04:05+01:00 ok_sources=4/5\n2025-01-03T03:04:05+01:00 ok_sources=5/5\n"
        );
    }
}
