use std::path::{Path, PathBuf};

use crate::CoreError;

const DEFAULT_TITLE_PROMPT: &str = include_str!("prompts/title_prompt.txt");
const DEFAULT_SUMMARY_PROMPT: &str = include_str!("prompts/summary_prompt.txt");

/// System message sent with every summarization request.
pub const SYSTEM_PROMPT: &str = "You are a research assistant who writes concise, accurate \
     summaries in Japanese. Convey the paper's main contributions faithfully and follow the \
     requested output format exactly.";

/// User prompts for the two summarization requests.
#[derive(Debug, Clone)]
pub struct Prompts {
    pub title: String,
    pub summary: String,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE_PROMPT.trim().to_string(),
            summary: DEFAULT_SUMMARY_PROMPT.trim().to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts, reading each from its file when a path is configured and
    /// falling back to the built-in text otherwise.
    pub fn load(title_path: Option<&Path>, summary_path: Option<&Path>) -> Result<Self, CoreError> {
        let defaults = Self::default();
        Ok(Self {
            title: match title_path {
                Some(path) => read_prompt(path)?,
                None => defaults.title,
            },
            summary: match summary_path {
                Some(path) => read_prompt(path)?,
                None => defaults.summary,
            },
        })
    }
}

fn read_prompt(path: &Path) -> Result<String, CoreError> {
    let text = std::fs::read_to_string(path).map_err(|source| CoreError::Prompt {
        path: PathBuf::from(path),
        source,
    })?;
    tracing::debug!(path = %path.display(), "loaded prompt file");
    Ok(text.trim().to_string())
}
