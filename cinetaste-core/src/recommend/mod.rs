pub mod prompts;

use std::fmt;
use std::sync::Arc;

use cinetaste_model::{
    CollectionState, PosterSize, Prediction, Recommendation, SuggestionFilters, poster_url,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::RecommendError;
use crate::generation::{GenerationBackend, GenerationPurpose, GenerationRequest};
use crate::resolver::TitleResolver;

static JSON_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("json object regex should compile"));

/// Suggestions and predictions generated from the collection's taste
/// profile.
#[derive(Clone)]
pub struct RecommendationService {
    backend: Arc<dyn GenerationBackend>,
    resolver: TitleResolver,
}

impl fmt::Debug for RecommendationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecommendationService")
            .field("backend", &self.backend.name())
            .finish_non_exhaustive()
    }
}

impl RecommendationService {
    pub fn new(backend: Arc<dyn GenerationBackend>, resolver: TitleResolver) -> Self {
        Self { backend, resolver }
    }

    pub async fn random_suggestion(
        &self,
        state: &CollectionState,
        session_exclude: &[String],
    ) -> Result<Recommendation, RecommendError> {
        let profile = prompts::taste_profile(state, session_exclude);
        self.recommend(prompts::random_prompt(&profile)).await
    }

    pub async fn personalized_suggestion(
        &self,
        state: &CollectionState,
        filters: &SuggestionFilters,
        session_exclude: &[String],
    ) -> Result<Recommendation, RecommendError> {
        let profile = prompts::taste_profile(state, session_exclude);
        self.recommend(prompts::personalized_prompt(&profile, filters))
            .await
    }

    pub async fn predict(
        &self,
        title: &str,
        state: &CollectionState,
    ) -> Result<Prediction, RecommendError> {
        let profile = prompts::taste_profile(state, &[]);
        let request = GenerationRequest::new(
            GenerationPurpose::Prediction,
            prompts::prediction_prompt(title.trim(), &profile),
        )
        .with_web_search();

        let text = self.backend.generate(request).await?;
        let prediction: Prediction = parse_embedded_json(&text)?;
        info!(title = %title, verdict = %prediction.prediction, "prediction ready");
        Ok(prediction)
    }

    /// Poster URL of the most popular catalog hit for `title`. Lookup
    /// failures are logged and yield `None`.
    pub async fn find_poster(&self, title: &str) -> Option<String> {
        let catalog = self.resolver.catalog();
        match self.resolver.best_match_by_title(title).await {
            Ok(Some(hit)) => poster_url(
                catalog.image_base_url(),
                PosterSize::default(),
                hit.poster_path.as_deref(),
            ),
            Ok(None) => {
                debug!(title = %title, "no catalog match for poster");
                None
            }
            Err(err) => {
                warn!(title = %title, error = %err, "poster lookup failed");
                None
            }
        }
    }

    async fn recommend(&self, prompt: String) -> Result<Recommendation, RecommendError> {
        let request = GenerationRequest::new(GenerationPurpose::Recommendation, prompt)
            .with_schema(prompts::recommendation_schema());

        let text = self.backend.generate(request).await?;
        let mut recommendation: Recommendation = parse_embedded_json(&text)?;
        recommendation.poster_url = self.find_poster(&recommendation.title).await;

        info!(
            title = %recommendation.title,
            category = %recommendation.category,
            "recommendation ready"
        );
        Ok(recommendation)
    }
}

/// Deserialize the first `{ ... }` span of a generated answer.
pub fn parse_embedded_json<T: DeserializeOwned>(text: &str) -> Result<T, RecommendError> {
    let object = JSON_OBJECT
        .find(text)
        .ok_or_else(|| RecommendError::Malformed("response contained no JSON object".into()))?;
    serde_json::from_str(object.as_str()).map_err(|e| RecommendError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_is_found_inside_prose_and_fences() {
        let text = "Sure!\n```json\n{\"prediction\": \"Probably NOT FOR YOU.\", \"reason\": \"Slow {pacing}.\"}\n```";
        let prediction: Prediction = parse_embedded_json(text).expect("prediction");
        assert_eq!(prediction.prediction, "Probably NOT FOR YOU.");
        assert_eq!(prediction.reason, "Slow {pacing}.");
    }

    #[test]
    fn missing_json_is_malformed() {
        let err = parse_embedded_json::<Prediction>("I cannot answer that").unwrap_err();
        assert!(matches!(err, RecommendError::Malformed(_)));
    }
}
