use std::path::PathBuf;

use thiserror::Error;
use url::Url;

pub mod config;
pub mod config_file;
pub mod download;
pub mod prompts;
pub mod scrapbox;
pub mod summarize;

// Re-export for convenience
pub use config::Config;
pub use papersum_resolve::{PdfResolver, Resolution, ResolveError, Route};
pub use prompts::Prompts;
pub use scrapbox::ScrapboxPage;
pub use summarize::{OpenAiClient, Summary};

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("failed to download PDF {url}: {message}")]
    Download { url: String, message: String },
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("OpenAI API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,
    #[error("OpenAI response contained no {0} text")]
    EmptyResponse(&'static str),
    #[error("failed to read prompt file {path}: {source}")]
    Prompt {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to open Scrapbox page: {0}")]
    Browser(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What to summarize and where to publish it.
#[derive(Debug, Clone)]
pub struct Request {
    /// Landing page of the paper.
    pub page_url: String,
    /// Explicit PDF URL, bypassing resolution. Relative values are joined
    /// against `page_url`.
    pub pdf_url: Option<String>,
    /// Scrapbox project to publish into.
    pub project: String,
}

/// Progress events emitted while the pipeline runs.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    Resolving { page_url: String },
    Resolved { pdf_url: String, route: Option<Route> },
    Downloading { pdf_url: String },
    Summarizing { model: String },
    Summarized { title: String, chars: usize },
    Publishing { url: String },
    Done { opened: bool },
}

/// Result of a completed pipeline run.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub pdf_url: String,
    pub summary: Summary,
    pub scrapbox_url: String,
    pub opened: bool,
}

/// Build the HTTP client shared by page fetching, downloading and the
/// summarization API.
pub fn build_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(papersum_resolve::BROWSER_USER_AGENT)
        .pool_max_idle_per_host(2)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Resolve the PDF for `request`, or use the explicit URL when one is given.
pub async fn resolve_request<F: papersum_resolve::PageFetcher>(
    resolver: &PdfResolver<F>,
    request: &Request,
) -> Result<(Url, Option<Route>), CoreError> {
    match request.pdf_url.as_deref() {
        Some(explicit) => {
            let page = Some(request.page_url.as_str()).filter(|p| !p.trim().is_empty());
            let url = papersum_resolve::join_explicit(page, explicit)?;
            tracing::info!(url = %url, "using explicit PDF URL");
            Ok((url, None))
        }
        None => {
            let resolution = resolver.resolve(&request.page_url).await?;
            Ok((resolution.url, Some(resolution.route)))
        }
    }
}

/// Run the full pipeline: resolve, download, summarize, publish.
///
/// The downloaded PDF lives in a temporary file that is removed when this
/// function returns, on success or failure.
pub async fn run<F>(request: Request, config: &Config, progress: F) -> Result<Outcome, CoreError>
where
    F: Fn(ProgressEvent),
{
    let api_key = config
        .openai_api_key
        .clone()
        .ok_or(CoreError::MissingApiKey)?;
    if request.project.trim().is_empty() {
        return Err(CoreError::Config("Scrapbox project name is empty".into()));
    }
    let prompts = Prompts::load(
        config.title_prompt_path.as_deref(),
        config.summary_prompt_path.as_deref(),
    )?;

    let client = build_client();
    let resolver = PdfResolver::new(papersum_resolve::HttpFetcher::new(
        client.clone(),
        config.page_timeout(),
    ));

    progress(ProgressEvent::Resolving {
        page_url: request.page_url.clone(),
    });
    let (pdf_url, route) = resolve_request(&resolver, &request).await?;
    progress(ProgressEvent::Resolved {
        pdf_url: pdf_url.to_string(),
        route,
    });

    progress(ProgressEvent::Downloading {
        pdf_url: pdf_url.to_string(),
    });
    let referer = Some(request.page_url.as_str()).filter(|p| !p.trim().is_empty());
    let pdf_file =
        download::download_pdf(&client, &pdf_url, referer, config.download_timeout()).await?;

    let openai = OpenAiClient::new(
        client.clone(),
        api_key,
        config.openai_base_url.clone(),
        config.openai_model.clone(),
    );
    progress(ProgressEvent::Summarizing {
        model: openai.model().to_string(),
    });
    let summary = openai.summarize_pdf(pdf_file.path(), &prompts).await?;
    drop(pdf_file);
    progress(ProgressEvent::Summarized {
        title: summary.title.clone(),
        chars: summary.body.chars().count(),
    });

    let page = ScrapboxPage {
        base_url: config.scrapbox_base_url.as_deref(),
        project: &request.project,
        title: &summary.title,
        body: &summary.body,
    };
    let scrapbox_url = page.url();
    progress(ProgressEvent::Publishing {
        url: scrapbox_url.clone(),
    });
    let opened = scrapbox::open_page(&scrapbox_url, config.skip_browser)?;

    tracing::info!("done");
    progress(ProgressEvent::Done { opened });

    Ok(Outcome {
        pdf_url: pdf_url.to_string(),
        summary,
        scrapbox_url,
        opened,
    })
}
