use std::sync::Arc;

use cinetaste_model::{CandidateResult, CatalogId};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ResolveError;
use crate::generation::{GenerationBackend, GenerationPurpose, GenerationRequest};

/// Picks one id out of a candidate set.
///
/// A single candidate is taken as is. Several candidates are put to the
/// generation backend; an answer that does not name a listed id, or no
/// answer at all, falls back to the most popular candidate.
#[derive(Clone)]
pub struct Disambiguator {
    backend: Arc<dyn GenerationBackend>,
}

impl std::fmt::Debug for Disambiguator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Disambiguator")
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl Disambiguator {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    pub async fn choose(
        &self,
        query: &str,
        candidates: &[CandidateResult],
    ) -> Result<CatalogId, ResolveError> {
        let fallback = match candidates {
            [] => {
                return Err(ResolveError::SelectionFailed(
                    "no candidates to choose from".to_string(),
                ));
            }
            [only] => return Ok(only.id),
            _ => most_popular(candidates).ok_or_else(|| {
                ResolveError::SelectionFailed("no candidates to choose from".to_string())
            })?,
        };

        let request = GenerationRequest::new(
            GenerationPurpose::Disambiguation,
            judgment_prompt(query, candidates),
        )
        .with_web_search();

        match self.backend.generate(request).await {
            Ok(answer) => match parse_judgment(&answer, candidates) {
                Some(id) => {
                    debug!(query = %query, id = %id, "judgment selected candidate");
                    Ok(id)
                }
                None => {
                    warn!(
                        query = %query,
                        answer = %answer,
                        fallback = %fallback.id,
                        "judgment named no listed id, using most popular candidate"
                    );
                    Ok(fallback.id)
                }
            },
            Err(err) => {
                debug!(
                    query = %query,
                    error = %err,
                    fallback = %fallback.id,
                    "judgment unavailable, using most popular candidate"
                );
                Ok(fallback.id)
            }
        }
    }
}

/// Highest popularity; the first of equally popular candidates wins.
pub fn most_popular(candidates: &[CandidateResult]) -> Option<&CandidateResult> {
    candidates.iter().fold(None, |best, candidate| match best {
        Some(current) if current.popularity >= candidate.popularity => Some(current),
        _ => Some(candidate),
    })
}

/// Read the leading integer of a judgment answer and accept it only if it
/// names one of the candidates.
pub fn parse_judgment(answer: &str, candidates: &[CandidateResult]) -> Option<CatalogId> {
    let trimmed = answer.trim_matches(|c: char| {
        c.is_whitespace() || matches!(c, '`' | '"' | '\'' | '*')
    });
    let digits_end = trimmed
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(trimmed.len(), |(index, _)| index);

    let id = CatalogId(trimmed[..digits_end].parse().ok()?);
    candidates.iter().any(|c| c.id == id).then_some(id)
}

#[derive(Serialize)]
struct JudgmentCandidate<'a> {
    id: u64,
    title: &'a str,
    overview: &'a str,
    popularity: f64,
    media_type: &'static str,
}

fn judgment_prompt(query: &str, candidates: &[CandidateResult]) -> String {
    let listing: Vec<JudgmentCandidate<'_>> = candidates
        .iter()
        .map(|c| JudgmentCandidate {
            id: c.id.get(),
            title: &c.title,
            overview: &c.overview,
            popularity: c.popularity,
            media_type: c.kind.as_api_str(),
        })
        .collect();
    let listing = serde_json::to_string_pretty(&listing).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"You identify the correct title from a list of catalog search results. Use the user_query as the main context hint and decide which result the user most likely means. Search the web when the query contains descriptive words (for example "live action", "black and white", "remake") to find the official title. Reply with ONLY the id number of the chosen result.

Criteria:
1. Query context: words that are not part of the title, such as "series", "film", "anime", "dorama", a country or language, "live action", are strong hints for the right version and for the media type (movie vs tv).
2. Overview: does each synopsis match the hints in the query and what the search found?
3. Popularity: between two very similar results, the one with higher popularity is usually the safer choice.
4. Media type: if the query mentions "series", prefer media_type "tv"; if it mentions "film", prefer "movie".

user_query: "{query}"

search_results:
{listing}

Which id is correct? Reply with ONLY the id number."#
    )
}
