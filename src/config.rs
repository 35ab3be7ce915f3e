//! Generator settings.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes:
//!
//! ```json
//! { "header": { "app_name": "Shop", "author": "Ada" }, "empty_arrays": "string_array" }
//! ```
//!
//! `"header": null` drops the attribution block entirely.

use std::path::Path;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::path_de::{PathError, from_str_with_path};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// `None` omits the attribution header.
    pub header: Option<HeaderConfig>,
    pub empty_arrays: EmptyArrayPolicy,
    pub url_mode: UrlMode,
    /// Only used by [`UrlMode::Probe`].
    pub probe_timeout_ms: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            header: Some(HeaderConfig::default()),
            empty_arrays: EmptyArrayPolicy::default(),
            url_mode: UrlMode::default(),
            probe_timeout_ms: 2_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeaderConfig {
    pub app_name: String,
    pub author: String,
    pub year: i32,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            app_name: "<Your App Name>".to_string(),
            author: "<Your Name>".to_string(),
            year: chrono::Local::now().year(),
        }
    }
}

/// What an empty JSON array turns into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum EmptyArrayPolicy {
    /// Drop the field and warn.
    #[default]
    Skip,
    /// Emit `[String]?`.
    StringArray,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum UrlMode {
    /// `scheme://authority…` pattern match.
    #[default]
    Syntactic,
    /// Never type strings as `URL`.
    Never,
    /// Pattern match plus a timed reachability probe (`probe` feature).
    Probe,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io { path: String, #[source] source: std::io::Error },
    #[error("invalid config {path}: {source}")]
    Invalid { path: String, #[source] source: PathError },
}

impl GeneratorConfig {
    pub fn from_json_str(src: &str) -> Result<Self, PathError> {
        from_str_with_path(src)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let src = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: display.clone(), source })?;
        Self::from_json_str(&src).map_err(|source| ConfigError::Invalid { path: display, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_means_defaults() {
        let config = GeneratorConfig::from_json_str("{}").unwrap();
        assert_eq!(config.empty_arrays, EmptyArrayPolicy::Skip);
        assert_eq!(config.url_mode, UrlMode::Syntactic);
        assert_eq!(config.header.unwrap().app_name, "<Your App Name>");
    }

    #[test]
    fn header_can_be_dropped_or_partially_set() {
        let config = GeneratorConfig::from_json_str(r#"{"header": null}"#).unwrap();
        assert!(config.header.is_none());

        let config = GeneratorConfig::from_json_str(
            r#"{"header": {"author": "Ada", "year": 2019}, "empty_arrays": "string_array"}"#,
        )
        .unwrap();
        let header = config.header.unwrap();
        assert_eq!(header.author, "Ada");
        assert_eq!(header.year, 2019);
        assert_eq!(header.app_name, "<Your App Name>");
        assert_eq!(config.empty_arrays, EmptyArrayPolicy::StringArray);
    }

    #[test]
    fn bad_values_report_their_path() {
        let err = GeneratorConfig::from_json_str(r#"{"url_mode": "sometimes"}"#).unwrap_err();
        assert_eq!(err.path, "url_mode");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = GeneratorConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
