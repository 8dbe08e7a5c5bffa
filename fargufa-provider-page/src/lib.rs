//! Page source fetching the storage listing over plain HTTP.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, header};
use tracing::debug;

use fargufa_core::ports::{PageSource, PortError};

/// Sent as a desktop browser; the site serves a trimmed page to unknown agents.
pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Upper bound for the whole request, connect included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches one page with a single GET per check.
pub struct WebPageSource {
    client: Client,
    url: String,
}

impl WebPageSource {
    /// Create a source for `url` bound to the given HTTP client.
    #[must_use]
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl PageSource for WebPageSource {
    fn url(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<String, PortError> {
        debug!(url = %self.url, "fetching page");

        let req = self
            .client
            .get(&self.url)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::ACCEPT, ACCEPT)
            .timeout(REQUEST_TIMEOUT);

        fetch_text(req).await
    }
}

/// Build the page source for `url`.
#[must_use]
pub fn source(client: Client, url: impl Into<String>) -> Arc<dyn PageSource> {
    Arc::new(WebPageSource::new(client, url))
}

// Body is decoded with the charset the response declares, UTF-8 otherwise.
async fn fetch_text(req: RequestBuilder) -> Result<String, PortError> {
    req.send()
        .await
        .map_err(PortError::from)?
        .error_for_status()
        .map_err(PortError::from)?
        .text()
        .await
        .map_err(PortError::from)
}
