//! Runtime configuration resolved from environment variables and config files.
//!
//! Precedence is CLI flag > environment variable > config file > default.
//! The CLI applies its flags on top of [`Config::from_sources`].

use std::path::PathBuf;
use std::time::Duration;

use crate::config_file::ConfigFile;

pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_PAGE_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    /// Fallback project when none is given on the command line.
    pub scrapbox_project: Option<String>,
    /// `None` means `https://scrapbox.io`.
    pub scrapbox_base_url: Option<String>,
    pub skip_browser: bool,
    pub page_timeout_secs: u64,
    pub download_timeout_secs: u64,
    pub title_prompt_path: Option<PathBuf>,
    pub summary_prompt_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_model: DEFAULT_MODEL.to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            scrapbox_project: None,
            scrapbox_base_url: None,
            skip_browser: false,
            page_timeout_secs: DEFAULT_PAGE_TIMEOUT_SECS,
            download_timeout_secs: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
            title_prompt_path: None,
            summary_prompt_path: None,
        }
    }
}

impl Config {
    /// Build a config from the process environment and the on-disk config
    /// cascade.
    pub fn load() -> Self {
        Self::from_sources(&crate::config_file::load_config(), |key| {
            std::env::var(key).ok()
        })
    }

    /// Build a config from a parsed config file and an environment lookup.
    /// Empty environment values are treated as unset.
    pub fn from_sources(file: &ConfigFile, env: impl Fn(&str) -> Option<String>) -> Self {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());
        let openai = file.openai.clone().unwrap_or_default();
        let scrapbox = file.scrapbox.clone().unwrap_or_default();
        let http = file.http.clone().unwrap_or_default();
        let prompts = file.prompts.clone().unwrap_or_default();

        let timeout = |key: &str, file_value: Option<u64>, default: u64| {
            env(key)
                .and_then(|v| v.trim().parse().ok())
                .or(file_value)
                .unwrap_or(default)
        };

        Self {
            openai_api_key: env("OPENAI_API_KEY").or(openai.api_key),
            openai_model: env("OPENAI_MODEL")
                .or(openai.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            openai_base_url: env("OPENAI_BASE_URL")
                .or(openai.base_url)
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            scrapbox_project: scrapbox.project,
            scrapbox_base_url: env("SCRAPBOX_BASE_URL").or(scrapbox.base_url),
            skip_browser: env("SCRAPBOX_SKIP_BROWSER")
                .map(|v| is_truthy(&v))
                .or(scrapbox.skip_browser)
                .unwrap_or(false),
            page_timeout_secs: timeout(
                "PAPERSUM_PAGE_TIMEOUT",
                http.page_timeout_secs,
                DEFAULT_PAGE_TIMEOUT_SECS,
            ),
            download_timeout_secs: timeout(
                "PAPERSUM_DOWNLOAD_TIMEOUT",
                http.download_timeout_secs,
                DEFAULT_DOWNLOAD_TIMEOUT_SECS,
            ),
            title_prompt_path: prompts.title_path.map(PathBuf::from),
            summary_prompt_path: prompts.summary_path.map(PathBuf::from),
        }
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

/// `1`, `true` and `yes` (any case) enable a flag.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}
