//! Candidate extraction from fetched landing-page HTML.
//!
//! Classification is two-tier. A *decisive* signal (the resolved path ends in
//! `.pdf`) ends the scan on the spot. *Advisory* signals only add the link to
//! an ordered candidate list that the selector consults when no decisive
//! signal shows up.

use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use url::Url;

const PDF_MIME: &str = "application/pdf";
const CITATION_PDF_META: &str = "citation_pdf_url";

static ANCHOR_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());
static META_SEL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(&format!(r#"meta[name="{CITATION_PDF_META}"]"#)).unwrap()
});
static LINK_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("link[href]").unwrap());

/// Where in the document a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Anchor,
    MetaTag,
    LinkTag,
}

/// How much a candidate can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plausibility {
    /// The path literally ends in `.pdf`.
    Strong,
    /// Some other heuristic matched.
    Weak,
}

/// A URL believed to reference a PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub url: Url,
    pub provenance: Provenance,
    pub plausibility: Plausibility,
}

/// Insertion-ordered set of weak candidates, unique by URL string.
#[derive(Debug, Clone, Default)]
pub struct CandidateList {
    items: Vec<Candidate>,
    seen: HashSet<String>,
}

impl CandidateList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `candidate` unless its URL is already present. Returns whether
    /// it was inserted.
    pub fn push(&mut self, candidate: Candidate) -> bool {
        if !self.seen.insert(candidate.url.as_str().to_string()) {
            return false;
        }
        self.items.push(candidate);
        true
    }

    pub fn first(&self) -> Option<&Candidate> {
        self.items.first()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.items.iter()
    }

    pub fn into_first(self) -> Option<Candidate> {
        self.items.into_iter().next()
    }
}

/// Outcome of scanning a document.
#[derive(Debug, Clone)]
pub enum Extraction {
    /// An anchor whose path ends in `.pdf`; scanning stopped here.
    Strong(Candidate),
    /// Every advisory match, in document order. May be empty.
    Candidates(CandidateList),
}

/// Scan `html` for PDF references, resolving relative links against `page`.
pub fn extract_candidates(html: &str, page: &Url) -> Extraction {
    let document = Html::parse_document(html);
    let mut candidates = CandidateList::new();

    for anchor in document.select(&ANCHOR_SEL) {
        let Some(resolved) = anchor.value().attr("href").and_then(|h| resolve(page, h)) else {
            continue;
        };

        let Some(plausibility) = classify_anchor(&resolved, &anchor) else {
            continue;
        };
        tracing::debug!(url = %resolved, ?plausibility, "PDF link candidate");

        let candidate = Candidate {
            url: resolved,
            provenance: Provenance::Anchor,
            plausibility,
        };
        if plausibility == Plausibility::Strong {
            return Extraction::Strong(candidate);
        }
        candidates.push(candidate);
    }

    if let Some(url) = document
        .select(&META_SEL)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .and_then(|content| resolve(page, content))
    {
        tracing::debug!(url = %url, "citation_pdf_url meta tag");
        candidates.push(weak(url, Provenance::MetaTag));
    }

    for link in document.select(&LINK_SEL) {
        let is_pdf = link
            .value()
            .attr("type")
            .is_some_and(|t| t.trim().eq_ignore_ascii_case(PDF_MIME));
        if !is_pdf {
            continue;
        }
        if let Some(url) = link.value().attr("href").and_then(|h| resolve(page, h)) {
            tracing::debug!(url = %url, "alternate link element");
            candidates.push(weak(url, Provenance::LinkTag));
        }
    }

    Extraction::Candidates(candidates)
}

fn weak(url: Url, provenance: Provenance) -> Candidate {
    Candidate {
        url,
        provenance,
        plausibility: Plausibility::Weak,
    }
}

/// Join `raw` against `page`. Empty values, fragment-only references (which
/// name the page itself) and unparseable references yield `None`.
fn resolve(page: &Url, raw: &str) -> Option<Url> {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with('#') {
        return None;
    }
    page.join(raw).ok()
}

fn classify_anchor(url: &Url, anchor: &ElementRef<'_>) -> Option<Plausibility> {
    let path = url.path().to_ascii_lowercase();
    if path.ends_with(".pdf") {
        return Some(Plausibility::Strong);
    }

    let mime_is_pdf = anchor
        .value()
        .attr("type")
        .is_some_and(|t| t.trim().eq_ignore_ascii_case(PDF_MIME));
    let query = url.query().unwrap_or_default().to_ascii_lowercase();
    let text = anchor.text().map(str::trim).collect::<String>().to_lowercase();

    let advisory = mime_is_pdf
        || path.contains(".pdf")
        || path.contains("/pdf/")
        || query.contains("format=pdf")
        || query.contains("download=1")
        || text.contains("pdf");

    advisory.then_some(Plausibility::Weak)
}
