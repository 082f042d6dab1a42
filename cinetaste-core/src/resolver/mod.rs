//! Free-text title resolution.
//!
//! [`TitleResolver::resolve`] runs a linear fallback chain of catalog
//! searches, stopping at the first stage that yields candidates:
//!
//! 1. the query with any trailing year removed, primary then fallback
//!    language, narrowed to the year when that leaves something;
//! 2. the unmodified query, primary then fallback language;
//! 3. the query with parenthesised qualifiers removed, when that differs
//!    from both earlier search strings.
//!
//! The surviving candidates go to the [`Disambiguator`], and the chosen id
//! is hydrated into a [`CatalogRecord`].

pub mod category;
pub mod disambiguator;
pub mod query;

use std::fmt;
use std::sync::Arc;

use cinetaste_model::{CandidateResult, CatalogRecord};
use tracing::{debug, info};

pub use category::{build_record, derive_category};
pub use disambiguator::{Disambiguator, most_popular, parse_judgment};
pub use query::{ParsedQuery, strip_parentheticals};

use crate::error::ResolveError;
use crate::generation::GenerationBackend;
use crate::providers::{CatalogProvider, ProviderError};

#[derive(Clone)]
pub struct TitleResolver {
    catalog: Arc<dyn CatalogProvider>,
    disambiguator: Disambiguator,
}

impl fmt::Debug for TitleResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TitleResolver")
            .field("catalog", &self.catalog.name())
            .field("disambiguator", &self.disambiguator)
            .finish()
    }
}

impl TitleResolver {
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        backend: Arc<dyn GenerationBackend>,
    ) -> Self {
        Self {
            catalog,
            disambiguator: Disambiguator::new(backend),
        }
    }

    pub fn catalog(&self) -> &Arc<dyn CatalogProvider> {
        &self.catalog
    }

    /// Resolve `query` into one hydrated record.
    pub async fn resolve(&self, query: &str) -> Result<CatalogRecord, ResolveError> {
        let (parsed, candidates) = self.candidates(query).await?;

        let chosen_id = self
            .disambiguator
            .choose(&parsed.original, &candidates)
            .await?;
        let chosen = candidates
            .iter()
            .find(|c| c.id == chosen_id)
            .ok_or_else(|| {
                ResolveError::SelectionFailed(format!(
                    "selected id {chosen_id} is not among the candidates"
                ))
            })?;

        let details = self.catalog.details(chosen.id, chosen.kind).await?;
        let record = build_record(&parsed.original, &details, self.catalog.image_base_url());

        info!(
            query = %parsed.original,
            id = %record.id,
            title = %record.title,
            category = %record.category,
            "resolved title"
        );
        Ok(record)
    }

    /// Run the search fallback chain and return the surviving candidates.
    pub async fn candidates(
        &self,
        query: &str,
    ) -> Result<(ParsedQuery, Vec<CandidateResult>), ResolveError> {
        let parsed = ParsedQuery::parse(query);
        if parsed.original.is_empty() {
            return Err(ResolveError::EmptyQuery);
        }

        let mut candidates = Vec::new();

        if !parsed.title.is_empty() {
            candidates = self.search_with_fallback(&parsed.title).await?;
        }

        if let Some(year) = parsed.year.as_deref()
            && candidates.len() > 1
        {
            let narrowed: Vec<CandidateResult> = candidates
                .iter()
                .filter(|c| c.released_in(year))
                .cloned()
                .collect();
            if !narrowed.is_empty() {
                debug!(
                    year = %year,
                    before = candidates.len(),
                    after = narrowed.len(),
                    "narrowed candidates by year"
                );
                candidates = narrowed;
            }
        }

        if candidates.is_empty() && parsed.title != parsed.original {
            debug!(query = %parsed.original, "retrying with the unmodified query");
            candidates = self.search_with_fallback(&parsed.original).await?;
        }

        if candidates.is_empty() {
            let simplified = strip_parentheticals(&parsed.original);
            if !simplified.is_empty()
                && simplified != parsed.original
                && simplified != parsed.title
            {
                debug!(
                    query = %parsed.original,
                    simplified = %simplified,
                    "retrying without parenthesised qualifiers"
                );
                candidates = self.search_with_fallback(&simplified).await?;
            }
        }

        if candidates.is_empty() {
            return Err(ResolveError::NoResults {
                query: parsed.original,
            });
        }

        Ok((parsed, candidates))
    }

    /// Search the primary language, then the fallback language if the
    /// primary came back empty.
    async fn search_with_fallback(
        &self,
        text: &str,
    ) -> Result<Vec<CandidateResult>, ProviderError> {
        let languages = self.catalog.languages();
        let results = self.catalog.search(text, &languages.primary).await?;
        if !results.is_empty() || languages.fallback == languages.primary {
            return Ok(results);
        }
        self.catalog.search(text, &languages.fallback).await
    }

    /// Most popular hit for a display title, trying the title and its
    /// parenthesis-free form in the primary language before the fallback.
    pub async fn best_match_by_title(
        &self,
        title: &str,
    ) -> Result<Option<CandidateResult>, ProviderError> {
        let title = title.trim();
        let simplified = strip_parentheticals(title);
        let languages = self.catalog.languages().clone();

        let mut attempts = vec![(title, languages.primary.as_str())];
        if simplified != title && !simplified.is_empty() {
            attempts.push((simplified.as_str(), languages.primary.as_str()));
        }
        if languages.fallback != languages.primary {
            attempts.push((title, languages.fallback.as_str()));
            if simplified != title && !simplified.is_empty() {
                attempts.push((simplified.as_str(), languages.fallback.as_str()));
            }
        }

        for (text, language) in attempts {
            let results = self.catalog.search(text, language).await?;
            if !results.is_empty() {
                return Ok(most_popular(&results).cloned());
            }
        }
        Ok(None)
    }
}
