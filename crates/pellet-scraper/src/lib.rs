pub mod encoding;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod render;
mod retry;

pub use encoding::decode_html_bytes;
pub use error::ScrapeError;
pub use extract::ExtractParams;
pub use fetch::{build_client, fetch_page, FetchedPage};
pub use pipeline::{requires_render, scrape_page};
pub use render::{ChromiumRenderer, PageRenderer};
