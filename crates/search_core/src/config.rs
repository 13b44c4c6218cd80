use std::{collections::HashMap, fs, path::Path, time::Duration};

use anyhow::Context;
use tracing::warn;

use crate::pagination::PaginationLayout;

pub const SETTINGS_FILE: &str = "course_search.toml";
const DEFAULT_CATALOG_URL: &str = "http://localhost:8080/api";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub catalog_url: String,
    pub page_size: u32,
    pub request_timeout: Duration,
    pub pagination_layout: PaginationLayout,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.into(),
            page_size: 12,
            request_timeout: Duration::from_secs(10),
            pagination_layout: PaginationLayout::Desktop,
        }
    }
}

/// Defaults, then `course_search.toml` in the working directory, then env.
pub fn load_settings() -> anyhow::Result<Settings> {
    let file = match fs::read_to_string(SETTINGS_FILE) {
        Ok(raw) => Some(raw),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read '{SETTINGS_FILE}'"));
        }
    };
    settings_from_sources(file.as_deref(), |key| std::env::var(key).ok())
}

pub fn load_settings_from_path(path: &Path) -> anyhow::Result<Settings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    settings_from_sources(Some(&raw), |key| std::env::var(key).ok())
}

pub fn settings_from_sources(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        let file_cfg: HashMap<String, toml::Value> =
            toml::from_str(raw).context("settings file is not valid TOML")?;
        for (key, value) in &file_cfg {
            let value = match value {
                toml::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            apply_setting(&mut settings, key, &value);
        }
    }

    for (var, key) in [
        ("APP__CATALOG_URL", "catalog_url"),
        ("APP__PAGE_SIZE", "page_size"),
        ("APP__REQUEST_TIMEOUT_MS", "request_timeout_ms"),
        ("APP__PAGINATION_LAYOUT", "pagination_layout"),
    ] {
        if let Some(value) = env(var) {
            apply_setting(&mut settings, key, &value);
        }
    }

    settings.catalog_url = normalize_catalog_url(&settings.catalog_url);
    Ok(settings)
}

fn apply_setting(settings: &mut Settings, key: &str, value: &str) {
    match key {
        "catalog_url" => settings.catalog_url = value.to_string(),
        "page_size" => match value.trim().parse::<u32>() {
            Ok(size) if size > 0 => settings.page_size = size,
            _ => warn!(value, "ignoring invalid page_size"),
        },
        "request_timeout_ms" => match value.trim().parse::<u64>() {
            Ok(ms) if ms > 0 => settings.request_timeout = Duration::from_millis(ms),
            _ => warn!(value, "ignoring invalid request_timeout_ms"),
        },
        "pagination_layout" => match value.parse::<PaginationLayout>() {
            Ok(layout) => settings.pagination_layout = layout,
            Err(err) => warn!("ignoring pagination_layout: {err}"),
        },
        other => warn!(key = other, "ignoring unknown setting"),
    }
}

pub fn normalize_catalog_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return DEFAULT_CATALOG_URL.to_string();
    }
    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };
    with_scheme.trim_end_matches('/').to_string()
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
