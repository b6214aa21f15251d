use std::io::Write;
use std::time::Duration;

use papersum_resolve::BROWSER_USER_AGENT;
use tempfile::NamedTempFile;
use url::Url;

use crate::CoreError;

const PDF_MAGIC: &[u8] = b"%PDF";

/// Download `pdf_url` into a temporary `.pdf` file.
///
/// The file is removed when the returned handle is dropped. `referer` is sent
/// when known; some publishers refuse PDF requests without it.
pub async fn download_pdf(
    client: &reqwest::Client,
    pdf_url: &Url,
    referer: Option<&str>,
    timeout: Duration,
) -> Result<NamedTempFile, CoreError> {
    tracing::info!(url = %pdf_url, "downloading PDF");

    let mut request = client
        .get(pdf_url.as_str())
        .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
        .timeout(timeout);
    if let Some(referer) = referer {
        request = request.header(reqwest::header::REFERER, referer);
    }

    let resp = request.send().await.map_err(|e| CoreError::Download {
        url: pdf_url.to_string(),
        message: e.to_string(),
    })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(CoreError::Download {
            url: pdf_url.to_string(),
            message: format!("HTTP {}", status),
        });
    }

    let bytes = resp.bytes().await.map_err(|e| CoreError::Download {
        url: pdf_url.to_string(),
        message: e.to_string(),
    })?;
    if !bytes.starts_with(PDF_MAGIC) {
        tracing::warn!(url = %pdf_url, "downloaded body does not look like a PDF");
    }

    let file = write_temp_pdf(&bytes)?;
    tracing::info!(path = %file.path().display(), bytes = bytes.len(), "saved PDF to temporary file");
    Ok(file)
}

/// Write `bytes` to a fresh temporary file with a `.pdf` suffix.
pub fn write_temp_pdf(bytes: &[u8]) -> Result<NamedTempFile, CoreError> {
    let mut file = tempfile::Builder::new()
        .prefix("papersum-")
        .suffix(".pdf")
        .tempfile()?;
    file.write_all(bytes)?;
    file.flush()?;
    Ok(file)
}
