//! Environment-driven configuration.
//!
//! Every field has a default; [`CoreConfig::from_env`] loads `.env` first.
//! Callers such as the CLI may overwrite fields after loading.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::generation::gemini::{DEFAULT_GEMINI_MODEL, GEMINI_API_BASE};
use crate::generation::{DisabledBackend, GeminiBackend, GenerationBackend, StubBackend};
use crate::providers::CatalogLanguages;
use crate::providers::tmdb::{TMDB_API_BASE, TMDB_IMAGE_BASE};
use crate::throttle::DEFAULT_MIN_INTERVAL;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not a valid URL: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("unknown generation backend {0:?} (expected gemini, stub or disabled)")]
    InvalidBackend(String),

    #[error("GENERATION_BACKEND=gemini requires GEMINI_API_KEY")]
    MissingGeminiKey,

    #[error("failed to build generation backend: {0}")]
    Backend(String),
}

#[derive(Clone, PartialEq, Eq)]
pub struct TmdbSettings {
    pub api_key: String,
    pub base_url: String,
    pub image_base_url: String,
    pub languages: CatalogLanguages,
    pub min_interval: Duration,
}

impl fmt::Debug for TmdbSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TmdbSettings")
            .field("api_key", &redacted(&self.api_key))
            .field("base_url", &self.base_url)
            .field("image_base_url", &self.image_base_url)
            .field("languages", &self.languages)
            .field("min_interval", &self.min_interval)
            .finish()
    }
}

impl Default for TmdbSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: TMDB_API_BASE.to_string(),
            image_base_url: TMDB_IMAGE_BASE.to_string(),
            languages: CatalogLanguages::default(),
            min_interval: DEFAULT_MIN_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    Gemini,
    Stub,
    #[default]
    Disabled,
}

impl BackendKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            BackendKind::Gemini => "gemini",
            BackendKind::Stub => "stub",
            BackendKind::Disabled => "disabled",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(BackendKind::Gemini),
            "stub" | "mock" => Ok(BackendKind::Stub),
            "disabled" | "none" | "off" => Ok(BackendKind::Disabled),
            other => Err(ConfigError::InvalidBackend(other.to_string())),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl fmt::Debug for GeminiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiSettings")
            .field("api_key", &redacted(&self.api_key))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: GEMINI_API_BASE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationSettings {
    pub backend: BackendKind,
    pub gemini: GeminiSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub tmdb: TmdbSettings,
    pub generation: GenerationSettings,
    /// Directory holding `watchedData.json`.
    pub data_dir: PathBuf,
    /// Seed file used instead of the embedded dataset.
    pub bootstrap_path: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            tmdb: TmdbSettings::default(),
            generation: GenerationSettings::default(),
            data_dir: PathBuf::from("./data"),
            bootstrap_path: None,
        }
    }
}

impl CoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = CoreConfig::default();

        let min_interval = match var("CATALOG_MIN_INTERVAL_MS") {
            Some(raw) => Duration::from_millis(raw.trim().parse().map_err(|_| {
                ConfigError::InvalidNumber {
                    var: "CATALOG_MIN_INTERVAL_MS",
                    value: raw.clone(),
                }
            })?),
            None => defaults.tmdb.min_interval,
        };

        let tmdb = TmdbSettings {
            api_key: var("TMDB_API_KEY").unwrap_or_default(),
            base_url: url_var(&var, "TMDB_BASE_URL", defaults.tmdb.base_url)?,
            image_base_url: url_var(
                &var,
                "TMDB_IMAGE_BASE_URL",
                defaults.tmdb.image_base_url,
            )?,
            languages: CatalogLanguages {
                primary: var("CATALOG_PRIMARY_LANGUAGE")
                    .unwrap_or(defaults.tmdb.languages.primary),
                fallback: var("CATALOG_FALLBACK_LANGUAGE")
                    .unwrap_or(defaults.tmdb.languages.fallback),
            },
            min_interval,
        };

        let backend = match var("GENERATION_BACKEND") {
            Some(raw) => raw.parse()?,
            None => BackendKind::default(),
        };
        let generation = GenerationSettings {
            backend,
            gemini: GeminiSettings {
                api_key: var("GEMINI_API_KEY").unwrap_or_default(),
                model: var("GEMINI_MODEL").unwrap_or(defaults.generation.gemini.model),
                base_url: url_var(
                    &var,
                    "GEMINI_BASE_URL",
                    defaults.generation.gemini.base_url,
                )?,
            },
        };

        Ok(Self {
            tmdb,
            generation,
            data_dir: var("CINETASTE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            bootstrap_path: var("CINETASTE_BOOTSTRAP_PATH").map(PathBuf::from),
        })
    }
}

fn url_var(
    var: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: String,
) -> Result<String, ConfigError> {
    let Some(raw) = var(key) else {
        return Ok(default);
    };
    Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl { var: key, source })?;
    Ok(raw.trim().to_string())
}

fn redacted(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { "<redacted>" }
}

/// Instantiate the configured generation backend. Selecting Gemini without
/// a key is an error rather than a fallback to canned answers.
pub fn build_generation_backend(
    settings: &GenerationSettings,
) -> Result<Arc<dyn GenerationBackend>, ConfigError> {
    match settings.backend {
        BackendKind::Gemini => {
            if settings.gemini.api_key.trim().is_empty() {
                return Err(ConfigError::MissingGeminiKey);
            }
            let backend = GeminiBackend::new(&settings.gemini)
                .map_err(|e| ConfigError::Backend(e.to_string()))?;
            Ok(Arc::new(backend))
        }
        BackendKind::Stub => Ok(Arc::new(StubBackend)),
        BackendKind::Disabled => Ok(Arc::new(DisabledBackend)),
    }
}
