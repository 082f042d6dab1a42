//! Pluggable text generation.
//!
//! The disambiguator and the recommendation service only see
//! [`GenerationBackend`]. Which backend is live is a configuration choice
//! ([`crate::config::BackendKind`]); a missing credential never silently
//! switches to canned answers.

pub mod gemini;
pub mod stub;

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

pub use gemini::GeminiBackend;
pub use stub::StubBackend;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Generation backend unavailable: {0}")]
    Unavailable(String),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationPurpose {
    /// Pick one catalog id out of several search hits.
    Disambiguation,
    Recommendation,
    Prediction,
}

impl fmt::Display for GenerationPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationPurpose::Disambiguation => write!(f, "disambiguation"),
            GenerationPurpose::Recommendation => write!(f, "recommendation"),
            GenerationPurpose::Prediction => write!(f, "prediction"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub purpose: GenerationPurpose,
    pub prompt: String,
    /// Ground the answer with web search results.
    pub web_search: bool,
    /// Constrain the answer to JSON matching this schema.
    pub response_schema: Option<Value>,
}

impl GenerationRequest {
    pub fn new(purpose: GenerationPurpose, prompt: impl Into<String>) -> Self {
        Self {
            purpose,
            prompt: prompt.into(),
            web_search: false,
            response_schema: None,
        }
    }

    pub fn with_web_search(mut self) -> Self {
        self.web_search = true;
        self
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Produce the raw text answer for `request`.
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;

    fn name(&self) -> &'static str;
}

/// Backend that refuses every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledBackend;

#[async_trait]
impl GenerationBackend for DisabledBackend {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        Err(GenerationError::Unavailable(format!(
            "generation is disabled ({} request)",
            request.purpose
        )))
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}
