use std::path::PathBuf;

use thiserror::Error;

use crate::app_config::AppConfig;

/// The five production shop pages tracked by the default deployment.
const DEFAULT_SOURCE_URLS: &[&str] = &[
    "https://pellet4future.com/pellet-drzewny-freetime-2010-llc-solid-teploenergo.html",
    "https://pellet4future.com/pellet-drzewny-granulita.html",
    "https://wolebio.pl/produkt/pellet-gold/",
    "https://wolebio.pl/produkt/pellet-olimp-6-mm-5/",
    "https://wolebio.pl/produkt/pellet-lava-premium/",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a set env var holds an unparseable value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a set env var holds an unparseable value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Core parsing logic, decoupled from the actual environment so it can be
/// tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let source_urls = match lookup("PELLET_SOURCE_URLS") {
        Ok(raw) => split_list(&raw),
        Err(_) => DEFAULT_SOURCE_URLS.iter().map(|s| (*s).to_string()).collect(),
    };
    let render_hosts = split_list(&or_default("PELLET_RENDER_HOSTS", "pellet4future.com"));

    let currency = or_default("PELLET_CURRENCY", "PLN");
    let postal_code = or_default("PELLET_POSTAL_CODE", "40-000");
    let pallet_count = parse_u32("PELLET_PALLET_COUNT", "1")?;

    let out_jsonl = PathBuf::from(or_default("PELLET_OUT_JSONL", "pellet_prices.jsonl"));
    let out_latest_json = PathBuf::from(or_default(
        "PELLET_OUT_LATEST_JSON",
        "pellet_prices_latest.json",
    ));
    let out_csv = PathBuf::from(or_default("PELLET_OUT_CSV", "pellet_prices.csv"));
    let out_run_log = PathBuf::from(or_default("PELLET_OUT_RUN_LOG", "runs.txt"));

    let request_timeout_secs = parse_u64("PELLET_REQUEST_TIMEOUT_SECS", "20")?;
    let render_timeout_secs = parse_u64("PELLET_RENDER_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("PELLET_USER_AGENT", "pellet-tracker/0.1");
    let inter_request_delay_ms = parse_u64("PELLET_INTER_REQUEST_DELAY_MS", "300")?;
    let max_retries = parse_u32("PELLET_MAX_RETRIES", "3")?;
    let retry_backoff_base_secs = parse_u64("PELLET_RETRY_BACKOFF_BASE_SECS", "1")?;

    Ok(AppConfig {
        source_urls,
        render_hosts,
        currency,
        postal_code,
        pallet_count,
        out_jsonl,
        out_latest_json,
        out_csv,
        out_run_log,
        request_timeout_secs,
        render_timeout_secs,
        user_agent,
        inter_request_delay_ms,
        max_retries,
        retry_backoff_base_secs,
    })
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn defaults_cover_all_fields() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.source_urls.len(), 5);
        assert_eq!(cfg.render_hosts, vec!["pellet4future.com".to_string()]);
        assert_eq!(cfg.currency, "PLN");
        assert_eq!(cfg.postal_code, "40-000");
        assert_eq!(cfg.pallet_count, 1);
        assert_eq!(cfg.request_timeout_secs, 20);
        assert_eq!(cfg.render_timeout_secs, 30);
        assert_eq!(cfg.inter_request_delay_ms, 300);
        assert_eq!(cfg.max_retries, 3);
        assert_eq!(cfg.retry_backoff_base_secs, 1);
        assert_eq!(cfg.out_csv.to_str(), Some("pellet_prices.csv"));
    }

    #[test]
    fn source_urls_override_is_split_and_trimmed() {
        let mut map = HashMap::new();
        map.insert(
            "PELLET_SOURCE_URLS",
            "https://a.example/p1, https://b.example/p2 ,",
        );
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(
            cfg.source_urls,
            vec![
                "https://a.example/p1".to_string(),
                "https://b.example/p2".to_string()
            ]
        );
    }

    #[test]
    fn pallet_count_override() {
        let mut map = HashMap::new();
        map.insert("PELLET_PALLET_COUNT", "2");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.pallet_count, 2);
    }

    #[test]
    fn invalid_numeric_value_is_rejected() {
        let mut map = HashMap::new();
        map.insert("PELLET_REQUEST_TIMEOUT_SECS", "soon");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PELLET_REQUEST_TIMEOUT_SECS"),
            "expected InvalidEnvVar(PELLET_REQUEST_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn invalid_retry_count_is_rejected() {
        let mut map = HashMap::new();
        map.insert("PELLET_MAX_RETRIES", "-1");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PELLET_MAX_RETRIES"),
            "expected InvalidEnvVar(PELLET_MAX_RETRIES), got: {result:?}"
        );
    }
}
