use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use shared::protocol::ToggleAllPolicy;
use url::Url;

pub const DEFAULT_SETTINGS_FILE: &str = "todo.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub request_timeout_secs: Option<u64>,
    pub toggle_all: ToggleAllPolicy,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000/".into(),
            request_timeout_secs: None,
            toggle_all: ToggleAllPolicy::FlipFlop,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn api_url(&self) -> Result<Url> {
        parse_api_base_url(&self.api_base_url)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    toggle_all: Option<ToggleAllPolicy>,
    log_filter: Option<String>,
}

/// Defaults, then the TOML file, then environment variables.
///
/// An explicit `path` must exist; without one, `todo.toml` in the working
/// directory is read when present.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    load_settings_with_env(path, |key| std::env::var(key).ok())
}

pub fn load_settings_with_env(
    path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings> {
    let mut settings = Settings::default();

    let file_cfg = match path {
        Some(path) => Some(read_file_settings(path)?),
        None => {
            let default_path = PathBuf::from(DEFAULT_SETTINGS_FILE);
            if default_path.exists() {
                Some(read_file_settings(&default_path)?)
            } else {
                None
            }
        }
    };

    if let Some(file_cfg) = file_cfg {
        if let Some(v) = file_cfg.api_base_url {
            settings.api_base_url = parse_api_base_url(&v)?.to_string();
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            settings.request_timeout_secs = Some(v);
        }
        if let Some(v) = file_cfg.toggle_all {
            settings.toggle_all = v;
        }
        if let Some(v) = file_cfg.log_filter {
            settings.log_filter = v;
        }
    }

    if let Some(v) = env("TODO_API_URL") {
        settings.api_base_url = parse_api_base_url(&v)?.to_string();
    }
    if let Some(v) = env("APP__API_BASE_URL") {
        settings.api_base_url = parse_api_base_url(&v)?.to_string();
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        let secs = v
            .trim()
            .parse::<u64>()
            .with_context(|| format!("invalid APP__REQUEST_TIMEOUT_SECS '{v}'"))?;
        settings.request_timeout_secs = Some(secs);
    }

    if let Some(v) = env("APP__TOGGLE_ALL") {
        settings.toggle_all = parse_toggle_all_policy(&v)?;
    }

    if let Some(v) = env("RUST_LOG") {
        settings.log_filter = v;
    }
    if let Some(v) = env("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    Ok(settings)
}

fn read_file_settings(path: &Path) -> Result<FileSettings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("failed to parse settings file '{}'", path.display()))
}

pub fn parse_api_base_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    let url = Url::parse(raw).with_context(|| format!("invalid api base url '{raw}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("api base url '{raw}' must use http or https");
    }
    Ok(url)
}

pub fn parse_toggle_all_policy(raw: &str) -> Result<ToggleAllPolicy> {
    match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
        "flip_flop" => Ok(ToggleAllPolicy::FlipFlop),
        "by_completeness" => Ok(ToggleAllPolicy::ByCompleteness),
        other => bail!("unknown toggle-all policy '{other}' (expected flip_flop or by_completeness)"),
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
