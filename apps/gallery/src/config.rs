use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, bail, Context};
use catalog_client::DEFAULT_CATALOG_URL;
use gallery_core::{DateStyle, GalleryOptions, ShapePolicy};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "gallery.toml";
const ENV_PREFIX: &str = "APOD_GALLERY__";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub catalog_url: String,
    pub date_style: DateStyle,
    pub shape_policy: ShapePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.into(),
            date_style: DateStyle::default(),
            shape_policy: ShapePolicy::default(),
        }
    }
}

impl Settings {
    pub fn gallery_options(&self) -> GalleryOptions {
        GalleryOptions {
            date_style: self.date_style,
            shape_policy: self.shape_policy,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileSettings {
    catalog_url: Option<String>,
    date_style: Option<DateStyle>,
    strict_payload_shape: Option<bool>,
}

/// Defaults, then the config file, then `APOD_GALLERY__*` environment variables.
///
/// A missing default `gallery.toml` is fine; a missing explicit path is an error.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    match fs::read_to_string(&path) {
        Ok(raw) => apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid config file '{}'", path.display()))?,
        Err(err) if config_path.is_none() && err.kind() == ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file.catalog_url {
        settings.catalog_url = v;
    }
    if let Some(v) = file.date_style {
        settings.date_style = v;
    }
    if let Some(strict) = file.strict_payload_shape {
        settings.shape_policy = shape_policy(strict);
    }
    Ok(())
}

fn apply_env(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

    if let Some(v) = var("CATALOG_URL") {
        settings.catalog_url = v;
    }
    if let Some(v) = var("DATE_STYLE") {
        settings.date_style = v
            .parse()
            .with_context(|| format!("{ENV_PREFIX}DATE_STYLE"))?;
    }
    if let Some(v) = var("STRICT_PAYLOAD_SHAPE") {
        let strict = parse_flag(&v)
            .ok_or_else(|| anyhow!("{ENV_PREFIX}STRICT_PAYLOAD_SHAPE must be true or false, got '{v}'"))?;
        settings.shape_policy = shape_policy(strict);
    }
    Ok(())
}

pub fn shape_policy(strict: bool) -> ShapePolicy {
    if strict {
        ShapePolicy::TreatAsError
    } else {
        ShapePolicy::TreatAsEmpty
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn validate_catalog_url(raw: &str) -> anyhow::Result<Url> {
    let url = Url::parse(raw.trim()).with_context(|| format!("invalid catalog url '{raw}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("catalog url must use http or https, got '{}'", url.scheme());
    }
    Ok(url)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
