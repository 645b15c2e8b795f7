use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("browser error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),

    #[error("browser launch failed: {0}")]
    BrowserLaunch(String),

    #[error("render wait condition never became true for {url} within {timeout_secs}s")]
    RenderTimeout { url: String, timeout_secs: u64 },
}

impl ScrapeError {
    /// `true` for transient transport failures worth a backoff retry.
    /// Render and status errors are deterministic for a given page state
    /// and are not retried at this level.
    #[must_use]
    pub(crate) fn is_retriable(&self) -> bool {
        matches!(self, ScrapeError::Http(_))
    }
}
