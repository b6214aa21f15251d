use std::io::Write;

use owo_colors::OwoColorize;
use papersum_core::{ProgressEvent, Route};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

pub fn describe_route(route: Option<Route>) -> String {
    match route {
        None => "given explicitly".to_string(),
        Some(Route::DirectPdf) => "page URL is already a PDF".to_string(),
        Some(Route::Pattern(rule)) => format!("{} URL pattern", rule.name()),
        Some(Route::Strong) => "direct .pdf link on page".to_string(),
        Some(Route::Candidate(provenance)) => format!("best {:?} candidate on page", provenance),
    }
}

/// Print a real-time progress event.
pub fn print_progress(
    w: &mut dyn Write,
    event: &ProgressEvent,
    color: ColorMode,
) -> std::io::Result<()> {
    let (label, detail) = match event {
        ProgressEvent::Resolving { page_url } => ("Resolving", page_url.clone()),
        ProgressEvent::Resolved { pdf_url, route } => {
            ("PDF", format!("{} ({})", pdf_url, describe_route(*route)))
        }
        ProgressEvent::Downloading { pdf_url } => ("Downloading", pdf_url.clone()),
        ProgressEvent::Summarizing { model } => ("Summarizing", format!("with {}", model)),
        ProgressEvent::Summarized { title, chars } => {
            ("Title", format!("{} ({} chars of summary)", title, chars))
        }
        ProgressEvent::Publishing { url } => ("Scrapbox", url.clone()),
        ProgressEvent::Done { opened } => {
            let detail = if *opened {
                "page opened in browser"
            } else {
                "browser launch skipped"
            };
            ("Done", detail.to_string())
        }
    };

    if color.enabled() {
        writeln!(w, "{:>12} {}", label.bold().green(), detail)
    } else {
        writeln!(w, "{:>12} {}", label, detail)
    }
}
