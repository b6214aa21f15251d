use crate::extract::{Candidate, Extraction};

/// Pick the single best candidate from an extraction.
///
/// A strong candidate always wins. Otherwise the earliest advisory candidate
/// in document order is chosen. `None` means nothing plausible was found; the
/// caller reports that as a failure and never substitutes the page URL.
pub fn select_candidate(extraction: Extraction) -> Option<Candidate> {
    match extraction {
        Extraction::Strong(candidate) => Some(candidate),
        Extraction::Candidates(list) => {
            if list.len() > 1 {
                tracing::debug!(count = list.len(), "choosing first of several candidates");
            }
            list.into_first()
        }
    }
}
