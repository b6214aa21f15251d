//! Zero-fetch URL rewriting for sites with a known PDF location.
//!
//! Each [`PatternRule`] is an independent predicate/transform pair. Rules are
//! tried in [`PatternRule::ALL`] order and the first one that produces a URL
//! wins. A rule that recognizes the host but cannot find the component it
//! needs (identifier, query id) declines, and the caller falls through to
//! fetching the page.

use url::Url;

/// Host-specific conventions for deriving a PDF URL from a landing page URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternRule {
    /// arXiv: `/abs/<id>` → `/pdf/<id>.pdf`.
    AbstractPagePattern,
    /// ACL Anthology: `/<paper-id>/` → `/<paper-id>.pdf`.
    ProceedingsPattern,
    /// OpenReview: `/forum?id=<id>` → `/pdf?id=<id>`.
    ReviewPortalPattern,
    /// ACM Digital Library: `/doi/<doi>` → `/doi/pdf/<doi>?download=true`.
    DigitalLibraryPattern,
}

const ARXIV_DOMAIN: &str = "arxiv.org";
const ACL_DOMAIN: &str = "aclanthology.org";
const OPENREVIEW_DOMAIN: &str = "openreview.net";
const ACM_DL_HOST: &str = "dl.acm.org";

/// Intermediate ACM path segments that select a view of the article rather
/// than being part of the DOI.
const ACM_VIEW_SEGMENTS: &[&str] = &["abs", "full", "fullHtml", "epdf", "pdf"];

impl PatternRule {
    /// All rules in evaluation order.
    pub const ALL: [PatternRule; 4] = [
        PatternRule::AbstractPagePattern,
        PatternRule::ProceedingsPattern,
        PatternRule::ReviewPortalPattern,
        PatternRule::DigitalLibraryPattern,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PatternRule::AbstractPagePattern => "arXiv",
            PatternRule::ProceedingsPattern => "ACL Anthology",
            PatternRule::ReviewPortalPattern => "OpenReview",
            PatternRule::DigitalLibraryPattern => "ACM Digital Library",
        }
    }

    /// Apply this rule to `page`, returning the synthesized PDF URL or `None`
    /// if the rule does not apply.
    pub fn apply(&self, page: &Url) -> Option<Url> {
        let host = page.host_str()?.to_ascii_lowercase();
        let path = page.path();

        let relative = match self {
            PatternRule::AbstractPagePattern => {
                if !host.ends_with(ARXIV_DOMAIN) {
                    return None;
                }
                let identifier = path.strip_prefix("/abs/")?.trim_matches('/');
                if identifier.is_empty() {
                    return None;
                }
                let suffix = if identifier.ends_with(".pdf") { "" } else { ".pdf" };
                format!("/pdf/{identifier}{suffix}")
            }
            PatternRule::ProceedingsPattern => {
                if !host.ends_with(ACL_DOMAIN) {
                    return None;
                }
                let normalized = path.trim_end_matches('/');
                if normalized.is_empty() {
                    return None;
                }
                format!("{normalized}.pdf")
            }
            PatternRule::ReviewPortalPattern => {
                if !host.ends_with(OPENREVIEW_DOMAIN) {
                    return None;
                }
                let id = page
                    .query_pairs()
                    .find(|(key, value)| key == "id" && !value.is_empty())
                    .map(|(_, value)| value.into_owned())?;
                let mut url = page.join("/pdf").ok()?;
                url.query_pairs_mut().clear().append_pair("id", &id);
                return Some(url);
            }
            PatternRule::DigitalLibraryPattern => {
                if host != ACM_DL_HOST {
                    return None;
                }
                let (_, doi_part) = path.rsplit_once("/doi/")?;
                let doi = strip_acm_view_segment(doi_part.trim_matches('/'));
                if doi.is_empty() {
                    return None;
                }
                format!("/doi/pdf/{doi}?download=true")
            }
        };

        page.join(&relative).ok()
    }
}

fn strip_acm_view_segment(doi: &str) -> &str {
    match doi.split_once('/') {
        Some((first, rest)) if ACM_VIEW_SEGMENTS.contains(&first) && !rest.is_empty() => rest,
        _ => doi,
    }
}

/// Whether the URL path already points at a PDF file.
pub fn has_pdf_suffix(url: &Url) -> bool {
    url.path().to_ascii_lowercase().ends_with(".pdf")
}

/// Try every rule in order and return the first match.
pub fn match_known_pattern(page: &Url) -> Option<(PatternRule, Url)> {
    PatternRule::ALL
        .iter()
        .find_map(|rule| rule.apply(page).map(|url| (*rule, url)))
}
