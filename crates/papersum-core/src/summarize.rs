//! Title and summary generation through the OpenAI Responses API.
//!
//! The PDF is uploaded once, referenced by file id in two requests (title,
//! then summary) and deleted afterwards whether or not the requests worked.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{Value, json};

use crate::CoreError;
use crate::prompts::{Prompts, SYSTEM_PROMPT};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Title and summary text produced for a paper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Deserialize)]
struct FileObject {
    id: String,
}

/// Thin client for the parts of the OpenAI API the pipeline needs.
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(
        client: reqwest::Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Upload `pdf_path`, ask for its title and summary, then delete the
    /// upload.
    pub async fn summarize_pdf(&self, pdf_path: &Path, prompts: &Prompts) -> Result<Summary, CoreError> {
        let file_id = self.upload_file(pdf_path).await?;

        let result = self.title_and_summary(&file_id, prompts).await;

        tracing::debug!(file_id = %file_id, "deleting uploaded file");
        if let Err(e) = self.delete_file(&file_id).await {
            tracing::warn!(file_id = %file_id, error = %e, "failed to delete uploaded file");
        }

        result
    }

    async fn title_and_summary(&self, file_id: &str, prompts: &Prompts) -> Result<Summary, CoreError> {
        let title_text = self.request_text(file_id, &prompts.title, "title").await?;
        let title = first_line(&title_text).ok_or(CoreError::EmptyResponse("title"))?;
        tracing::info!(title = %title, "detected title");

        let summary_text = self.request_text(file_id, &prompts.summary, "summary").await?;
        let (body, json_title) = parse_summary(&summary_text);
        if body.is_empty() {
            return Err(CoreError::EmptyResponse("summary"));
        }
        if let Some(json_title) = json_title.filter(|t| t != &title) {
            tracing::info!(title = %json_title, "summary response carried a different title");
        }
        tracing::info!(chars = body.chars().count(), "received summary");

        Ok(Summary { title, body })
    }

    async fn upload_file(&self, pdf_path: &Path) -> Result<String, CoreError> {
        tracing::info!(path = %pdf_path.display(), "uploading PDF");
        let bytes = tokio::fs::read(pdf_path).await?;
        let file_name = pdf_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "paper.pdf".to_string());

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/pdf")?;
        let form = reqwest::multipart::Form::new()
            .text("purpose", "assistants")
            .part("file", part);

        let resp = self
            .client
            .post(format!("{}/files", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        let resp = check_status(resp).await?;
        let file: FileObject = resp.json().await?;
        Ok(file.id)
    }

    async fn request_text(&self, file_id: &str, prompt: &str, description: &'static str) -> Result<String, CoreError> {
        tracing::info!(model = %self.model, request = description, "requesting completion");
        let body = build_request(&self.model, prompt, file_id);

        let resp = self
            .client
            .post(format!("{}/responses", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        let resp = check_status(resp).await?;
        let value: Value = resp.json().await?;

        let text = extract_output_text(&value).ok_or(CoreError::EmptyResponse(description))?;
        tracing::debug!(request = description, raw = %text, "raw response text");
        Ok(text)
    }

    async fn delete_file(&self, file_id: &str) -> Result<(), CoreError> {
        let resp = self
            .client
            .delete(format!("{}/files/{}", self.base_url, file_id))
            .bearer_auth(&self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, CoreError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(CoreError::Api {
        status: status.as_u16(),
        body,
    })
}

/// Request body for `POST /responses` with a system prompt, a user prompt and
/// an attached file.
pub fn build_request(model: &str, prompt: &str, file_id: &str) -> Value {
    json!({
        "model": model,
        "input": [
            {
                "role": "system",
                "content": [{ "type": "input_text", "text": SYSTEM_PROMPT }],
            },
            {
                "role": "user",
                "content": [
                    { "type": "input_text", "text": prompt },
                    { "type": "input_file", "file_id": file_id },
                ],
            },
        ],
    })
}

/// Collect the text of a Responses API payload.
///
/// Every `output[].content[]` item of type `output_text` is used, joined by
/// newlines. The top-level `output_text` convenience field is the fallback.
/// Returns `None` if no non-blank text is present.
pub fn extract_output_text(response: &Value) -> Option<String> {
    let mut chunks: Vec<&str> = response
        .get("output")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|item| item.get("content").and_then(Value::as_array))
        .flatten()
        .filter(|content| content.get("type").and_then(Value::as_str) == Some("output_text"))
        .filter_map(|content| content.get("text").and_then(Value::as_str))
        .collect();

    if chunks.is_empty()
        && let Some(text) = response.get("output_text").and_then(Value::as_str)
    {
        chunks.push(text);
    }

    let text = chunks
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// First non-blank line, trimmed.
pub fn first_line(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

/// Interpret the summary response.
///
/// Models sometimes answer with a JSON object despite the prompt. When the
/// text starts with `{` and parses, a non-empty `summary` field replaces the
/// raw text and a `title` field is returned alongside. Otherwise the raw text
/// is used as is.
pub fn parse_summary(raw: &str) -> (String, Option<String>) {
    let raw = raw.trim();
    if !raw.starts_with('{') {
        return (raw.to_string(), None);
    }

    let parsed: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "summary looked like JSON but did not parse; using raw text");
            return (raw.to_string(), None);
        }
    };

    let field = |name: &str| {
        parsed
            .get(name)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let body = field("summary").unwrap_or_else(|| raw.to_string());
    (body, field("title"))
}
