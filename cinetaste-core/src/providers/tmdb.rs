use std::fmt;

use async_trait::async_trait;
use cinetaste_model::{CandidateResult, CatalogDetails, CatalogId, Genre, MediaKind};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::traits::{CatalogLanguages, CatalogProvider, ProviderError};
use crate::config::TmdbSettings;
use crate::throttle::RequestThrottle;

pub const TMDB_API_BASE: &str = "https://api.themoviedb.org/3";
pub const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

/// TMDB v3 client. Every request goes through the shared [`RequestThrottle`].
#[derive(Clone)]
pub struct TmdbCatalog {
    http: Client,
    api_key: String,
    base_url: String,
    image_base_url: String,
    languages: CatalogLanguages,
    throttle: RequestThrottle,
}

impl fmt::Debug for TmdbCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TmdbCatalog")
            .field("base_url", &self.base_url)
            .field("languages", &self.languages)
            .field("throttle", &self.throttle)
            .finish_non_exhaustive()
    }
}

impl TmdbCatalog {
    pub fn new(
        settings: &TmdbSettings,
        throttle: RequestThrottle,
    ) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .user_agent(concat!("cinetaste/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            image_base_url: settings.image_base_url.clone(),
            languages: settings.languages.clone(),
            throttle,
        })
    }

    async fn get_tmdb_json<T>(
        &self,
        path: String,
        mut params: Vec<(&'static str, String)>,
    ) -> Result<T, ProviderError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        if self.api_key.is_empty() {
            return Err(ProviderError::InvalidApiKey);
        }

        let http = self.http.clone();
        let url = format!("{}/{}", self.base_url, path);
        params.push(("api_key", self.api_key.clone()));

        self.throttle
            .enqueue(move || fetch_json::<T>(http, url, params))
            .await?
    }

    async fn details_in(
        &self,
        id: CatalogId,
        kind: MediaKind,
        language: &str,
    ) -> Result<CatalogDetails, ProviderError> {
        let raw: TmdbDetails = self
            .get_tmdb_json(
                format!("{}/{}", kind.as_api_str(), id),
                vec![("language", language.to_string())],
            )
            .await?;
        Ok(raw.into_details(kind))
    }
}

async fn fetch_json<T: DeserializeOwned>(
    http: Client,
    url: String,
    params: Vec<(&'static str, String)>,
) -> Result<T, ProviderError> {
    debug!(%url, "catalog request");
    let response = http.get(&url).query(&params).send().await?;

    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()));
    }

    #[derive(Debug, Deserialize)]
    struct TmdbErrorBody {
        #[serde(default)]
        status_message: Option<String>,
    }

    let message = response
        .json::<TmdbErrorBody>()
        .await
        .ok()
        .and_then(|body| body.status_message)
        .unwrap_or_else(|| format!("TMDB request failed with status {}", status));

    match status.as_u16() {
        401 => Err(ProviderError::InvalidApiKey),
        404 => Err(ProviderError::NotFound),
        429 => Err(ProviderError::RateLimited),
        _ => Err(ProviderError::ApiError(message)),
    }
}

#[derive(Debug, Deserialize)]
struct TmdbSearchPage {
    #[serde(default)]
    results: Vec<TmdbMultiResult>,
}

#[derive(Debug, Deserialize)]
struct TmdbMultiResult {
    id: u64,
    media_type: Option<String>,
    title: Option<String>,
    name: Option<String>, // TV shows use "name" instead of "title"
    overview: Option<String>,
    popularity: Option<f64>,
    release_date: Option<String>,
    first_air_date: Option<String>, // TV shows
    poster_path: Option<String>,
}

impl TmdbMultiResult {
    fn into_candidate(self) -> Option<CandidateResult> {
        let kind = MediaKind::from_api_str(self.media_type.as_deref()?)?;
        let (title, date) = match kind {
            MediaKind::Movie => (self.title.or(self.name), self.release_date),
            MediaKind::Series => (self.name.or(self.title), self.first_air_date),
        };

        Some(CandidateResult {
            id: CatalogId(self.id),
            kind,
            title: title.unwrap_or_default(),
            overview: self.overview.unwrap_or_default(),
            popularity: self
                .popularity
                .filter(|p| p.is_finite() && *p > 0.0)
                .unwrap_or(0.0),
            release_date: non_empty(date),
            poster_path: non_empty(self.poster_path),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TmdbGenre {
    id: u32,
    name: String,
}

#[derive(Debug, Deserialize)]
struct TmdbDetails {
    id: u64,
    title: Option<String>,
    name: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    #[serde(default)]
    genres: Vec<TmdbGenre>,
    overview: Option<String>,
    poster_path: Option<String>,
    original_language: Option<String>,
}

impl TmdbDetails {
    fn into_details(self, kind: MediaKind) -> CatalogDetails {
        let (title, date) = match kind {
            MediaKind::Movie => (self.title.or(self.name), self.release_date),
            MediaKind::Series => (self.name.or(self.title), self.first_air_date),
        };

        CatalogDetails {
            id: CatalogId(self.id),
            kind,
            title: title.unwrap_or_default(),
            release_date: non_empty(date),
            genres: self
                .genres
                .into_iter()
                .map(|g| Genre {
                    id: g.id,
                    name: g.name,
                })
                .collect(),
            overview: non_empty(self.overview),
            poster_path: non_empty(self.poster_path),
            original_language: non_empty(self.original_language),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[async_trait]
impl CatalogProvider for TmdbCatalog {
    async fn search(
        &self,
        query: &str,
        language: &str,
    ) -> Result<Vec<CandidateResult>, ProviderError> {
        let page: TmdbSearchPage = self
            .get_tmdb_json(
                "search/multi".to_string(),
                vec![
                    ("query", query.to_string()),
                    ("include_adult", "false".to_string()),
                    ("language", language.to_string()),
                    ("page", "1".to_string()),
                ],
            )
            .await?;

        let candidates: Vec<CandidateResult> = page
            .results
            .into_iter()
            .filter_map(TmdbMultiResult::into_candidate)
            .collect();

        debug!(
            query = %query,
            language = %language,
            count = candidates.len(),
            "catalog search finished"
        );
        Ok(candidates)
    }

    async fn details(
        &self,
        id: CatalogId,
        kind: MediaKind,
    ) -> Result<CatalogDetails, ProviderError> {
        let primary = self.languages.primary.clone();
        match self.details_in(id, kind, &primary).await {
            Err(ProviderError::NotFound)
                if self.languages.fallback != self.languages.primary =>
            {
                warn!(
                    id = %id,
                    kind = %kind,
                    language = %primary,
                    fallback = %self.languages.fallback,
                    "details not found, retrying in fallback language"
                );
                let fallback = self.languages.fallback.clone();
                self.details_in(id, kind, &fallback).await
            }
            other => other,
        }
    }

    fn languages(&self) -> &CatalogLanguages {
        &self.languages
    }

    fn image_base_url(&self) -> &str {
        &self.image_base_url
    }

    fn name(&self) -> &'static str {
        "TMDB"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_results_keep_only_movies_and_series() {
        let raw = r#"{"results":[
            {"id":1,"media_type":"movie","title":"Alien","release_date":"1979-05-25","popularity":40.5},
            {"id":2,"media_type":"person","name":"Sigourney Weaver","popularity":90.0},
            {"id":3,"media_type":"tv","name":"Alien: Earth","first_air_date":"","popularity":-3.0}
        ]}"#;
        let page: TmdbSearchPage = serde_json::from_str(raw).expect("search page");
        let hits: Vec<CandidateResult> = page
            .results
            .into_iter()
            .filter_map(TmdbMultiResult::into_candidate)
            .collect();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "Alien");
        assert_eq!(hits[0].release_date.as_deref(), Some("1979-05-25"));
        assert_eq!(hits[1].kind, MediaKind::Series);
        assert_eq!(hits[1].release_date, None);
        assert_eq!(hits[1].popularity, 0.0);
    }

    #[test]
    fn series_details_use_name_and_first_air_date() {
        let raw = r#"{"id":1396,"name":"Breaking Bad","first_air_date":"2008-01-20",
            "genres":[{"id":18,"name":"Drama"}],"overview":"","original_language":"en"}"#;
        let details: TmdbDetails = serde_json::from_str(raw).expect("details");
        let details = details.into_details(MediaKind::Series);

        assert_eq!(details.title_with_year(), "Breaking Bad (2008)");
        assert_eq!(details.overview, None);
        assert_eq!(details.primary_genre(), Some("Drama"));
    }
}
