//! The browsing session behind the crawl.
//!
//! The crawler only needs one capability from its session: render a URL and
//! hand back the resulting document. [`PageSource`] captures that seam so the
//! crawl loop and its tests run against fixture documents, while production
//! uses [`HttpPageSource`] over a shared `reqwest` client.
//!
//! The session value is owned by `main` and threaded into every crawl step by
//! mutable reference; whichever way the run exits, dropping it releases the
//! underlying connections.

use reqwest::Client;
use reqwest::header::{self, HeaderMap, HeaderValue};
use std::error::Error;
use std::time::Duration;
use tracing::{debug, instrument};

/// Render a URL and return the page's HTML.
///
/// Implementations are expected to return the document with lazily-loaded
/// content already settled; how that happens (plain HTTP, a rendering
/// backend) is their concern.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn render(&mut self, url: &str) -> Result<String, Box<dyn Error>>;
}

/// HTTP-backed page source with a per-navigation timeout.
///
/// Every request carries a consent cookie so the site serves content instead
/// of a cookie wall; sites that ignore the cookie are unaffected, which keeps
/// the dismissal best-effort.
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    pub fn new(page_timeout: Duration, user_agent: &str) -> Result<Self, Box<dyn Error>> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("cookie-consent=accepted; gdpr_opt_in=1"),
        );
        let client = Client::builder()
            .timeout(page_timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;
        Ok(Self { client })
    }
}

impl PageSource for HttpPageSource {
    #[instrument(level = "debug", skip(self))]
    async fn render(&mut self, url: &str) -> Result<String, Box<dyn Error>> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let html = response.text().await?;
        debug!(bytes = html.len(), "page rendered");
        Ok(html)
    }
}
