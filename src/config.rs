//! `glowmini.toml` configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::schema::request::{
    Audience, GenerationRequest, Language, Platform, DEFAULT_DURATION_SEC, DEFAULT_STYLE_PRESET,
};

/// Looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "glowmini.toml";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlowConfig {
    /// Directory packs are exported into.
    pub output_dir: PathBuf,
    pub defaults: RequestDefaults,
    pub catalogs: CatalogPaths,
    pub gemini: GeminiConfig,
}

/// Values used for request fields the caller leaves unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestDefaults {
    pub language: Language,
    pub platform: Platform,
    pub duration_sec: u32,
    pub audience: Audience,
    pub style_preset: String,
}

/// Optional catalog overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogPaths {
    /// Replaces the built-in phrase bank.
    pub phrase_bank: Option<PathBuf>,
    /// Merged over the built-in style presets.
    pub styles: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for GlowConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            defaults: RequestDefaults::default(),
            catalogs: CatalogPaths::default(),
            gemini: GeminiConfig::default(),
        }
    }
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            language: Language::default(),
            platform: Platform::default(),
            duration_sec: DEFAULT_DURATION_SEC,
            audience: Audience::default(),
            style_preset: DEFAULT_STYLE_PRESET.to_string(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            timeout_secs: DEFAULT_GEMINI_TIMEOUT_SECS,
        }
    }
}

impl GlowConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_FILE`] is
    /// read if present and defaults are used otherwise. A non-empty
    /// `GEMINI_API_KEY` in the environment overrides the file's key.
    pub fn load(path: Option<&Path>) -> Result<GlowConfig, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::from_file(fallback)?
                } else {
                    debug!("no {DEFAULT_CONFIG_FILE} found, using defaults");
                    Self::default()
                }
            }
        };
        config.apply_api_key(std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<GlowConfig, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&contents)?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<GlowConfig, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Override the API key when `key` is non-blank.
    pub fn apply_api_key(&mut self, key: Option<String>) {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.gemini.api_key = Some(key);
        }
    }

    /// A request for `topic` carrying the configured defaults.
    pub fn request(&self, topic: impl Into<String>) -> GenerationRequest {
        let d = &self.defaults;
        GenerationRequest::new(topic)
            .language(d.language)
            .platform(d.platform)
            .duration_sec(d.duration_sec)
            .audience(d.audience)
            .style_preset(d.style_preset.clone())
    }
}
