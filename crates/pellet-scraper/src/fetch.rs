//! HTTP fetch for source pages, capturing the transport metadata the
//! snapshot records carry.

use std::time::Duration;

use reqwest::Client;

use crate::error::ScrapeError;
use crate::retry::retry_with_backoff;

/// Raw response bytes plus the transport metadata recorded per page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub bytes: Vec<u8>,
    pub http_status: u16,
    /// URL after redirects.
    pub final_url: String,
    pub content_type: Option<String>,
    /// Charset parameter from the `Content-Type` header, if declared.
    pub encoding_hint: Option<String>,
}

/// Builds the shared HTTP client with the configured timeout and user-agent.
///
/// # Errors
///
/// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client` cannot
/// be constructed.
pub fn build_client(timeout_secs: u64, user_agent: &str) -> Result<Client, ScrapeError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Fetches one source page, retrying transient network failures with
/// exponential backoff.
///
/// Non-2xx statuses are surfaced as [`ScrapeError::UnexpectedStatus`] so the
/// run loop can record the failure and continue with the next source.
///
/// # Errors
///
/// - [`ScrapeError::Http`] — network failure after all retries exhausted.
/// - [`ScrapeError::UnexpectedStatus`] — non-2xx response (not retried).
pub async fn fetch_page(
    client: &Client,
    url: &str,
    max_retries: u32,
    backoff_base_secs: u64,
) -> Result<FetchedPage, ScrapeError> {
    retry_with_backoff(max_retries, backoff_base_secs, || async {
        let response = client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "pl-PL,pl;q=0.9")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        // Read headers before consuming the body.
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let encoding_hint = content_type.as_deref().and_then(charset_from_content_type);

        let bytes = response.bytes().await?.to_vec();

        Ok(FetchedPage {
            bytes,
            http_status: status.as_u16(),
            final_url,
            content_type,
            encoding_hint,
        })
    })
    .await
}

/// Pulls the `charset` parameter out of a `Content-Type` header value.
fn charset_from_content_type(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .map(str::trim)
        .find_map(|param| {
            let rest = param
                .strip_prefix("charset=")
                .or_else(|| param.strip_prefix("CHARSET="))?;
            Some(rest.trim_matches('"').to_string())
        })
        .filter(|s| !s.is_empty())
}
