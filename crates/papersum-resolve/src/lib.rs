//! Resolve an academic landing page to a direct PDF download link.
//!
//! Resolution runs in two stages. Known hosts (arXiv, ACL Anthology,
//! OpenReview, ACM DL) are rewritten from the URL alone by the rules in
//! [`rules`]; nothing is fetched. Any other page is fetched once through a
//! [`PageFetcher`] and its HTML is scanned by [`extract::extract_candidates`].
//! The winner is picked by [`select::select_candidate`].

pub mod extract;
pub mod fetch;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod rules;
pub mod select;

use thiserror::Error;
use url::Url;

pub use extract::{Candidate, CandidateList, Extraction, Plausibility, Provenance};
pub use fetch::{BROWSER_USER_AGENT, DEFAULT_PAGE_TIMEOUT, FetchError, HttpFetcher, PageFetcher};
pub use rules::PatternRule;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("no PDF link found on {page_url}")]
    NoPdfLink { page_url: String },
}

/// How a PDF URL was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The page URL already pointed at a `.pdf` file.
    DirectPdf,
    /// Rewritten by a host-specific rule without fetching.
    Pattern(PatternRule),
    /// An anchor whose path ends in `.pdf`.
    Strong,
    /// The first advisory candidate on the page.
    Candidate(Provenance),
}

impl Route {
    /// Whether this route required fetching the landing page.
    pub fn fetched(&self) -> bool {
        matches!(self, Route::Strong | Route::Candidate(_))
    }
}

/// A successfully resolved PDF URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub url: Url,
    pub route: Route,
}

/// Try to derive the PDF URL from the page URL alone.
pub fn resolve_without_fetch(page: &Url) -> Option<Resolution> {
    if rules::has_pdf_suffix(page) {
        return Some(Resolution {
            url: page.clone(),
            route: Route::DirectPdf,
        });
    }
    rules::match_known_pattern(page).map(|(rule, url)| Resolution {
        url,
        route: Route::Pattern(rule),
    })
}

/// Resolves landing pages using a [`PageFetcher`] for the fallback stage.
pub struct PdfResolver<F = HttpFetcher> {
    fetcher: F,
}

impl Default for PdfResolver<HttpFetcher> {
    fn default() -> Self {
        Self::new(HttpFetcher::default())
    }
}

impl<F: PageFetcher> PdfResolver<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Resolve `page_url` to a single PDF URL.
    ///
    /// The page is fetched at most once, and only when no host rule applies.
    pub async fn resolve(&self, page_url: &str) -> Result<Resolution, ResolveError> {
        let page = parse_url(page_url)?;

        if let Some(resolution) = resolve_without_fetch(&page) {
            tracing::info!(
                url = %resolution.url,
                route = ?resolution.route,
                "derived PDF link without fetching"
            );
            return Ok(resolution);
        }

        let html = self.fetcher.fetch(&page).await?;
        let extraction = extract::extract_candidates(&html, &page);

        let Some(candidate) = select::select_candidate(extraction) else {
            return Err(ResolveError::NoPdfLink {
                page_url: page.to_string(),
            });
        };

        let route = match candidate.plausibility {
            Plausibility::Strong => Route::Strong,
            Plausibility::Weak => Route::Candidate(candidate.provenance),
        };
        tracing::info!(url = %candidate.url, ?route, "selected PDF link");

        Ok(Resolution {
            url: candidate.url,
            route,
        })
    }
}

/// Resolve `page_url` with the default HTTP fetcher and return the PDF URL.
pub async fn resolve_pdf_url(page_url: &str) -> Result<String, ResolveError> {
    PdfResolver::<HttpFetcher>::default()
        .resolve(page_url)
        .await
        .map(|r| r.url.to_string())
}

/// Interpret a user-supplied PDF URL, joining it against the page URL when
/// one is given so relative values work.
pub fn join_explicit(page_url: Option<&str>, pdf_url: &str) -> Result<Url, ResolveError> {
    match page_url {
        Some(page) => {
            let base = parse_url(page)?;
            base.join(pdf_url.trim())
                .map_err(|source| ResolveError::InvalidUrl {
                    url: pdf_url.to_string(),
                    source,
                })
        }
        None => parse_url(pdf_url),
    }
}

fn parse_url(raw: &str) -> Result<Url, ResolveError> {
    Url::parse(raw.trim()).map_err(|source| ResolveError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}
