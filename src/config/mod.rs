//! Configuration Management
//!
//! File-based configuration with environment variable overrides for the
//! extractors. Every field has a default, so an empty file (or no file at all)
//! yields the same behaviour as `BlobExtractor::new(DelimiterPair::default())`.
//!
//! ```toml
//! [extraction]
//! open_tag = "<code>"
//! close_tag = "</code>"
//! markdown_fallback = true
//! raw_code_fallback = false
//!
//! [json]
//! lenient_strings = true
//! ```

use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};
use thiserror::Error;

use crate::extract::{DelimiterPair, FallbackPolicy};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable parsing error: {0}")]
    EnvVarParse(String),
    #[error("File parsing error: {0}")]
    FileParse(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BlobkitConfig {
    /// Code-blob extraction configuration
    #[serde(default)]
    pub extraction: ExtractionConfig,
    /// JSON-blob extraction configuration
    #[serde(default)]
    pub json: JsonConfig,
}

/// Code-blob extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractionConfig {
    /// Marker opening a code blob
    #[serde(default = "default_open_tag")]
    pub open_tag: String,
    /// Marker closing a code blob
    #[serde(default = "default_close_tag")]
    pub close_tag: String,
    /// Accept markdown python fences when the markers are missing
    #[serde(default = "default_true")]
    pub markdown_fallback: bool,
    /// Accept un-fenced code as a single payload
    #[serde(default)]
    pub raw_code_fallback: bool,
}

/// JSON-blob extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonConfig {
    /// Escape raw control characters inside string literals before decoding
    #[serde(default = "default_true")]
    pub lenient_strings: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            open_tag: default_open_tag(),
            close_tag: default_close_tag(),
            markdown_fallback: true,
            raw_code_fallback: false,
        }
    }
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self {
            lenient_strings: true,
        }
    }
}

impl ExtractionConfig {
    /// Delimiter pair described by `open_tag` / `close_tag`
    pub fn delimiters(&self) -> crate::Result<DelimiterPair> {
        DelimiterPair::new(self.open_tag.clone(), self.close_tag.clone())
    }

    /// Fallback policy described by the `*_fallback` flags
    pub fn fallback(&self) -> FallbackPolicy {
        FallbackPolicy {
            markdown_fences: self.markdown_fallback,
            raw_code: self.raw_code_fallback,
        }
    }
}

impl BlobkitConfig {
    /// Load configuration from a file (supports TOML, YAML, JSON)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let extension = path.extension().and_then(|s| s.to_str());

        match extension {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| ConfigError::FileParse(e.to_string()))
            }
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&content).map_err(|e| ConfigError::FileParse(e.to_string()))
            }
            Some("json") => {
                serde_json::from_str(&content).map_err(|e| ConfigError::FileParse(e.to_string()))
            }
            _ => Err(ConfigError::FileParse(
                "Unsupported file format. Use .toml, .yaml, .yml, or .json".to_string(),
            )),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().merge_with_env()
    }

    /// Merge configuration with environment variable overrides
    pub fn merge_with_env(mut self) -> Result<Self, ConfigError> {
        if let Ok(open_tag) = env::var("BLOBKIT_OPEN_TAG") {
            self.extraction.open_tag = open_tag;
        }
        if let Ok(close_tag) = env::var("BLOBKIT_CLOSE_TAG") {
            self.extraction.close_tag = close_tag;
        }
        if let Some(enabled) = bool_from_env("BLOBKIT_MARKDOWN_FALLBACK")? {
            self.extraction.markdown_fallback = enabled;
        }
        if let Some(enabled) = bool_from_env("BLOBKIT_RAW_CODE_FALLBACK")? {
            self.extraction.raw_code_fallback = enabled;
        }
        if let Some(lenient) = bool_from_env("BLOBKIT_JSON_LENIENT")? {
            self.json.lenient_strings = lenient;
        }

        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extraction.open_tag.is_empty() {
            return Err(ConfigError::Validation(
                "Extraction open_tag cannot be empty".to_string(),
            ));
        }
        if self.extraction.close_tag.is_empty() {
            return Err(ConfigError::Validation(
                "Extraction close_tag cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Parse an optional boolean environment variable
fn bool_from_env(name: &str) -> Result<Option<bool>, ConfigError> {
    match env::var(name) {
        Ok(value) => parse_bool(&value).map(Some).ok_or_else(|| {
            ConfigError::EnvVarParse(format!("{}: expected a boolean, got '{}'", name, value))
        }),
        Err(_) => Ok(None),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

// Default value functions for serde
fn default_open_tag() -> String {
    "```python".to_string()
}

fn default_close_tag() -> String {
    "```".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod test_example;

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = BlobkitConfig::default();
        assert_eq!(config.extraction.open_tag, "```python");
        assert_eq!(config.extraction.close_tag, "```");
        assert!(config.extraction.markdown_fallback);
        assert!(!config.extraction.raw_code_fallback);
        assert!(config.json.lenient_strings);
        assert_eq!(config.extraction.fallback(), FallbackPolicy::default());
        assert_eq!(
            config.extraction.delimiters().unwrap(),
            DelimiterPair::python_fence()
        );
    }

    #[test]
    fn test_config_validation() {
        let mut config = BlobkitConfig::default();
        assert!(config.validate().is_ok());

        config.extraction.close_tag = String::new();
        assert!(config.validate().is_err());
        assert!(config.extraction.delimiters().is_err());
    }

    #[test]
    fn test_toml_config_loading() {
        let toml_content = r#"
[extraction]
open_tag = "<code>"
close_tag = "</code>"
raw_code_fallback = true

[json]
lenient_strings = false
"#;

        let temp_file = NamedTempFile::with_suffix(".toml").unwrap();
        std::fs::write(temp_file.path(), toml_content).unwrap();

        let config = BlobkitConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.extraction.open_tag, "<code>");
        assert_eq!(config.extraction.close_tag, "</code>");
        assert!(config.extraction.markdown_fallback);
        assert!(config.extraction.raw_code_fallback);
        assert!(!config.json.lenient_strings);
    }

    #[test]
    fn test_yaml_and_json_config_loading() {
        let yaml_file = NamedTempFile::with_suffix(".yaml").unwrap();
        std::fs::write(
            yaml_file.path(),
            "extraction:\n  open_tag: \"<py>\"\n  close_tag: \"</py>\"\n",
        )
        .unwrap();
        let config = BlobkitConfig::from_file(yaml_file.path()).unwrap();
        assert_eq!(config.extraction.open_tag, "<py>");
        assert!(config.json.lenient_strings);

        let json_file = NamedTempFile::with_suffix(".json").unwrap();
        std::fs::write(
            json_file.path(),
            r#"{"extraction": {"markdown_fallback": false}}"#,
        )
        .unwrap();
        let config = BlobkitConfig::from_file(json_file.path()).unwrap();
        assert!(!config.extraction.markdown_fallback);
        assert_eq!(config.extraction.open_tag, "```python");
    }

    #[test]
    fn test_unsupported_extension() {
        let temp_file = NamedTempFile::with_suffix(".ini").unwrap();
        std::fs::write(temp_file.path(), "open_tag=<code>").unwrap();
        let err = BlobkitConfig::from_file(temp_file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::FileParse(_)));
    }

    #[test]
    fn test_env_var_loading() {
        env::set_var("BLOBKIT_OPEN_TAG", "<code>");
        env::set_var("BLOBKIT_CLOSE_TAG", "</code>");
        env::set_var("BLOBKIT_RAW_CODE_FALLBACK", "yes");
        env::set_var("BLOBKIT_JSON_LENIENT", "false");

        let config = BlobkitConfig::from_env().unwrap();
        assert_eq!(config.extraction.open_tag, "<code>");
        assert_eq!(config.extraction.close_tag, "</code>");
        assert!(config.extraction.raw_code_fallback);
        assert!(!config.json.lenient_strings);

        env::set_var("BLOBKIT_MARKDOWN_FALLBACK", "sometimes");
        let err = BlobkitConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::EnvVarParse(_)));

        // Clean up
        env::remove_var("BLOBKIT_OPEN_TAG");
        env::remove_var("BLOBKIT_CLOSE_TAG");
        env::remove_var("BLOBKIT_RAW_CODE_FALLBACK");
        env::remove_var("BLOBKIT_JSON_LENIENT");
        env::remove_var("BLOBKIT_MARKDOWN_FALLBACK");
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" 0 "), Some(false));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
