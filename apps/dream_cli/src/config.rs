use std::{collections::HashMap, fs, path::Path};

use anyhow::{bail, Context};
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub access_token: Option<String>,
    pub log_filter: String,
    pub dream_title: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            access_token: None,
            log_filter: "info".into(),
            dream_title: client_core::flow::DEFAULT_DREAM_TITLE.into(),
        }
    }
}

/// Defaults, then `path` if it exists, then process environment.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    load_settings_with(path, |key| std::env::var(key).ok())
}

pub fn load_settings_with(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let file_cfg = toml::from_str::<HashMap<String, String>>(&raw)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
        if let Some(v) = file_cfg.get("api_base_url") {
            settings.api_base_url = v.clone();
        }
        if let Some(v) = file_cfg.get("access_token") {
            settings.access_token = Some(v.clone());
        }
        if let Some(v) = file_cfg.get("log") {
            settings.log_filter = v.clone();
        }
        if let Some(v) = file_cfg.get("dream_title") {
            settings.dream_title = v.clone();
        }
    }

    if let Some(v) = env("DREAM_API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("DREAM__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = env("DREAM__ACCESS_TOKEN") {
        settings.access_token = Some(v);
    }

    if let Some(v) = env("DREAM__LOG") {
        settings.log_filter = v;
    }

    if let Some(v) = env("DREAM__DREAM_TITLE") {
        settings.dream_title = v;
    }

    settings.api_base_url = normalize_base_url(&settings.api_base_url)?;
    settings.access_token = settings
        .access_token
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty());
    Ok(settings)
}

/// Blank means the default; otherwise an absolute http(s) URL without a trailing slash.
pub fn normalize_base_url(raw: &str) -> anyhow::Result<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(DEFAULT_API_BASE_URL.to_string());
    }

    let parsed = Url::parse(raw).with_context(|| format!("invalid api base url '{raw}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!(
            "api base url '{raw}' must use http or https, got '{}'",
            parsed.scheme()
        );
    }

    Ok(raw.trim_end_matches('/').to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
