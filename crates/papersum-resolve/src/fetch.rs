use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// User-Agent sent with every page and PDF request. Several publishers serve
/// an interstitial or a 403 to non-browser agents.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

/// Default timeout for fetching a landing page.
pub const DEFAULT_PAGE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to fetch {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to fetch {url}: HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

impl FetchError {
    /// The URL that could not be retrieved.
    pub fn url(&self) -> &str {
        match self {
            FetchError::Transport { url, .. } | FetchError::Status { url, .. } => url,
        }
    }
}

/// Retrieves the raw HTML of a landing page.
pub trait PageFetcher: Send + Sync {
    /// Issue a single request for `url` and return the body text.
    fn fetch<'a>(
        &'a self,
        url: &'a Url,
    ) -> Pin<Box<dyn Future<Output = Result<String, FetchError>> + Send + 'a>>;
}

/// [`PageFetcher`] backed by a shared `reqwest::Client`. No retries.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self::new(client, DEFAULT_PAGE_TIMEOUT)
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch<'a>(
        &'a self,
        url: &'a Url,
    ) -> Pin<Box<dyn Future<Output = Result<String, FetchError>> + Send + 'a>> {
        Box::pin(async move {
            tracing::info!(url = %url, "fetching landing page");

            let resp = self
                .client
                .get(url.as_str())
                .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
                .timeout(self.timeout)
                .send()
                .await
                .map_err(|source| FetchError::Transport {
                    url: url.to_string(),
                    source,
                })?;

            let status = resp.status();
            if !status.is_success() {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status,
                });
            }

            resp.text().await.map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })
        })
    }
}
