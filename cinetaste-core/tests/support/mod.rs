//! Shared fakes for core integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use cinetaste_core::generation::{GenerationBackend, GenerationError, GenerationRequest};
use cinetaste_core::providers::{CatalogLanguages, CatalogProvider, ProviderError};
use cinetaste_model::{CandidateResult, CatalogDetails, CatalogId, Genre, MediaKind};

pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

pub fn candidate(
    id: u64,
    kind: MediaKind,
    title: &str,
    popularity: f64,
    release_date: Option<&str>,
) -> CandidateResult {
    CandidateResult {
        id: CatalogId(id),
        kind,
        title: title.to_string(),
        overview: format!("Overview of {title}"),
        popularity,
        release_date: release_date.map(str::to_string),
        poster_path: Some(format!("/poster-{id}.jpg")),
    }
}

pub fn details(
    id: u64,
    kind: MediaKind,
    title: &str,
    release_date: Option<&str>,
    genres: &[(u32, &str)],
    original_language: &str,
) -> CatalogDetails {
    CatalogDetails {
        id: CatalogId(id),
        kind,
        title: title.to_string(),
        release_date: release_date.map(str::to_string),
        genres: genres
            .iter()
            .map(|(id, name)| Genre {
                id: *id,
                name: name.to_string(),
            })
            .collect(),
        overview: Some(format!("Synopsis of {title}")),
        poster_path: Some(format!("/poster-{id}.jpg")),
        original_language: Some(original_language.to_string()),
    }
}

/// In-memory catalog keyed by `(query, language)`, recording every call.
#[derive(Debug, Default)]
pub struct FakeCatalog {
    languages: CatalogLanguages,
    searches: HashMap<(String, String), Vec<CandidateResult>>,
    failing_queries: Vec<String>,
    details: HashMap<u64, CatalogDetails>,
    calls: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(
        mut self,
        query: &str,
        language: &str,
        results: Vec<CandidateResult>,
    ) -> Self {
        self.searches
            .insert((query.to_string(), language.to_string()), results);
        self
    }

    pub fn with_failing_search(mut self, query: &str) -> Self {
        self.failing_queries.push(query.to_string());
        self
    }

    pub fn with_details(mut self, details: CatalogDetails) -> Self {
        self.details.insert(details.id.get(), details);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn search_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with("search"))
            .collect()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

#[async_trait]
impl CatalogProvider for FakeCatalog {
    async fn search(
        &self,
        query: &str,
        language: &str,
    ) -> Result<Vec<CandidateResult>, ProviderError> {
        self.record(format!("search {query} [{language}]"));
        if self.failing_queries.iter().any(|q| q == query) {
            return Err(ProviderError::ApiError("status 500".into()));
        }
        Ok(self
            .searches
            .get(&(query.to_string(), language.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn details(
        &self,
        id: CatalogId,
        kind: MediaKind,
    ) -> Result<CatalogDetails, ProviderError> {
        self.record(format!("details {id} {}", kind.as_api_str()));
        self.details
            .get(&id.get())
            .cloned()
            .ok_or(ProviderError::NotFound)
    }

    fn languages(&self) -> &CatalogLanguages {
        &self.languages
    }

    fn image_base_url(&self) -> &str {
        IMAGE_BASE
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Backend replaying scripted answers; an exhausted script is unavailable.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    answers: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answering(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|a| a.to_string()).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request);
        self.answers
            .lock()
            .expect("answers lock")
            .pop_front()
            .ok_or_else(|| GenerationError::Unavailable("script exhausted".into()))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
