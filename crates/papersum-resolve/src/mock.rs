//! Mock page fetcher for testing.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use url::Url;

use crate::fetch::{FetchError, PageFetcher};

/// A configurable mock response for [`MockFetcher`].
#[derive(Clone, Debug)]
pub enum MockPage {
    /// Serve this HTML body.
    Html(String),
    /// Simulate a non-success HTTP status.
    Status(u16),
}

/// A hand-rolled mock implementing [`PageFetcher`] for tests.
///
/// Serves the same response for every call and records the URLs it was asked
/// for, so tests can assert on the number of fetches.
pub struct MockFetcher {
    response: MockPage,
    requested: Mutex<Vec<String>>,
    call_count: AtomicUsize,
}

impl MockFetcher {
    pub fn new(response: MockPage) -> Self {
        Self {
            response,
            requested: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// A fetcher that serves `html` for every URL.
    pub fn html(html: impl Into<String>) -> Self {
        Self::new(MockPage::Html(html.into()))
    }

    /// How many times `fetch()` has been called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// URLs passed to `fetch()`, in call order.
    pub fn requested(&self) -> Vec<String> {
        self.requested
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl PageFetcher for MockFetcher {
    fn fetch<'a>(
        &'a self,
        url: &'a Url,
    ) -> Pin<Box<dyn Future<Output = Result<String, FetchError>> + Send + 'a>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(url.to_string());
        }
        let response = self.response.clone();

        Box::pin(async move {
            match response {
                MockPage::Html(body) => Ok(body),
                MockPage::Status(code) => Err(FetchError::Status {
                    url: url.to_string(),
                    status: reqwest::StatusCode::from_u16(code)
                        .unwrap_or(reqwest::StatusCode::INTERNAL_SERVER_ERROR),
                }),
            }
        })
    }
}
