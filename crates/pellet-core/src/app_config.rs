use std::path::PathBuf;

/// Runtime configuration for a tracking run.
///
/// Built from environment variables by [`crate::config::load_app_config`];
/// tests construct it through the injectable lookup instead of mutating the
/// process environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Source product pages, processed in order.
    pub source_urls: Vec<String>,
    /// Hosts whose pages only expose prices after client-side rendering.
    pub render_hosts: Vec<String>,
    /// Deployment-wide currency tag recorded on every snapshot.
    pub currency: String,

    /// Postal code typed into the delivery-cost form on rendered pages.
    pub postal_code: String,
    /// Pallet quantity typed into the quantity input on rendered pages.
    pub pallet_count: u32,

    pub out_jsonl: PathBuf,
    pub out_latest_json: PathBuf,
    pub out_csv: PathBuf,
    pub out_run_log: PathBuf,

    pub request_timeout_secs: u64,
    pub render_timeout_secs: u64,
    pub user_agent: String,
    pub inter_request_delay_ms: u64,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
}
