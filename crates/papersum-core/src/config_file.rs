use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub openai: Option<OpenAiConfig>,
    pub scrapbox: Option<ScrapboxConfig>,
    pub http: Option<HttpConfig>,
    pub prompts: Option<PromptsConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrapboxConfig {
    pub project: Option<String>,
    pub base_url: Option<String>,
    pub skip_browser: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpConfig {
    pub page_timeout_secs: Option<u64>,
    pub download_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptsConfig {
    pub title_path: Option<String>,
    pub summary_path: Option<String>,
}

/// Platform config directory path: `<config_dir>/papersum/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("papersum").join("config.toml"))
}

/// Load config by cascading CWD `.papersum.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".papersum.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config file");
            None
        }
    }
}

fn pick<S, T>(overlay: Option<&S>, base: Option<&S>, field: impl Fn(&S) -> Option<T>) -> Option<T> {
    overlay.and_then(&field).or_else(|| base.and_then(&field))
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let (bo, oo) = (base.openai.as_ref(), overlay.openai.as_ref());
    let (bs, os) = (base.scrapbox.as_ref(), overlay.scrapbox.as_ref());
    let (bh, oh) = (base.http.as_ref(), overlay.http.as_ref());
    let (bp, op) = (base.prompts.as_ref(), overlay.prompts.as_ref());

    ConfigFile {
        openai: Some(OpenAiConfig {
            api_key: pick(oo, bo, |c| c.api_key.clone()),
            model: pick(oo, bo, |c| c.model.clone()),
            base_url: pick(oo, bo, |c| c.base_url.clone()),
        }),
        scrapbox: Some(ScrapboxConfig {
            project: pick(os, bs, |c| c.project.clone()),
            base_url: pick(os, bs, |c| c.base_url.clone()),
            skip_browser: pick(os, bs, |c| c.skip_browser),
        }),
        http: Some(HttpConfig {
            page_timeout_secs: pick(oh, bh, |c| c.page_timeout_secs),
            download_timeout_secs: pick(oh, bh, |c| c.download_timeout_secs),
        }),
        prompts: Some(PromptsConfig {
            title_path: pick(op, bp, |c| c.title_path.clone()),
            summary_path: pick(op, bp, |c| c.summary_path.clone()),
        }),
    }
}
