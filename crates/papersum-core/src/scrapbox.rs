//! Scrapbox page publishing.
//!
//! Scrapbox creates a page pre-filled with `?body=` text when its URL is
//! opened in a logged-in browser, so publishing is just building that URL and
//! handing it to the desktop's URL opener.

use crate::CoreError;

pub const DEFAULT_BASE_URL: &str = "https://scrapbox.io";

/// A page to create in a Scrapbox project.
#[derive(Debug, Clone)]
pub struct ScrapboxPage<'a> {
    pub base_url: Option<&'a str>,
    pub project: &'a str,
    pub title: &'a str,
    pub body: &'a str,
}

impl ScrapboxPage<'_> {
    /// `<base>/<project>/<title>?body=<body>` with every component percent
    /// encoded.
    pub fn url(&self) -> String {
        let base = self
            .base_url
            .map(|b| b.trim_end_matches('/'))
            .filter(|b| !b.is_empty())
            .unwrap_or(DEFAULT_BASE_URL);
        format!(
            "{}/{}/{}?body={}",
            base,
            urlencoding::encode(self.project),
            urlencoding::encode(self.title),
            urlencoding::encode(self.body.trim()),
        )
    }
}

/// Open `url` in the default browser unless `skip` is set. Returns whether the
/// browser was launched.
pub fn open_page(url: &str, skip: bool) -> Result<bool, CoreError> {
    if skip {
        tracing::info!("browser launch skipped");
        return Ok(false);
    }
    tracing::info!(url, "opening Scrapbox page in browser");
    open::that(url).map_err(|e| CoreError::Browser(e.to_string()))?;
    Ok(true)
}
