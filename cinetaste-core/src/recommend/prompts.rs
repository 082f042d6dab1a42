use std::collections::BTreeSet;

use cinetaste_model::{Category, CollectionState, Rating, SuggestionFilters};
use serde_json::{Value, json};

fn rating_heading(rating: Rating) -> &'static str {
    match rating {
        Rating::Loved => "Loved (works I consider perfect, the main source of inspiration)",
        Rating::Liked => "Liked (very good works, clues to what kept them from 'loved')",
        Rating::Meh => "Meh (mediocre works, traps to avoid)",
        Rating::Disliked => "Disliked (works I did not enjoy, elements to exclude entirely)",
    }
}

/// The user's taste profile: an exclusion list of every collected title
/// plus `session_exclude`, then each rating list with type and genre.
pub fn taste_profile(state: &CollectionState, session_exclude: &[String]) -> String {
    let mut seen = BTreeSet::new();
    let excluded: Vec<&str> = state
        .titles()
        .into_iter()
        .chain(session_exclude.iter().map(String::as_str))
        .filter(|title| seen.insert(*title))
        .collect();

    let mut profile = String::from(
        "**Already in the collection or suggested this session (NEVER SUGGEST THESE):**\n",
    );
    if excluded.is_empty() {
        profile.push_str("None");
    } else {
        profile.push_str(&excluded.join(", "));
    }

    for rating in Rating::ALL {
        profile.push_str(&format!("\n\n**{}:**\n", rating_heading(rating)));
        let lines: Vec<String> = state
            .partition(rating)
            .iter()
            .map(|item| {
                format!(
                    "- {} (Type: {}, Genre: {})",
                    item.title(),
                    item.record.category,
                    item.record.genre
                )
            })
            .collect();
        if lines.is_empty() {
            profile.push_str("None");
        } else {
            profile.push_str(&lines.join("\n"));
        }
    }

    profile
}

pub fn recommendation_schema() -> Value {
    let categories: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "title": {
                "type": "STRING",
                "description": "Official title including the year, e.g. 'Interstellar (2014)'."
            },
            "type": { "type": "STRING", "enum": categories, "description": "Media category." },
            "genre": { "type": "STRING", "description": "Main genre, e.g. 'Science Fiction/Adventure'." },
            "synopsis": { "type": "STRING", "description": "A short, engaging 2-3 sentence synopsis." },
            "probabilities": {
                "type": "OBJECT",
                "properties": {
                    "loved": { "type": "INTEGER", "description": "Probability (0-100) the user LOVES it." },
                    "liked": { "type": "INTEGER", "description": "Probability (0-100) the user LIKES it." },
                    "meh": { "type": "INTEGER", "description": "Probability (0-100) the user finds it MEDIOCRE." },
                    "disliked": { "type": "INTEGER", "description": "Probability (0-100) the user DISLIKES it." }
                },
                "required": ["loved", "liked", "meh", "disliked"]
            },
            "analysis": {
                "type": "STRING",
                "description": "Why this fits the user's profile, e.g. 'Since you loved Inception...'"
            }
        },
        "required": ["title", "type", "genre", "synopsis", "probabilities", "analysis"]
    })
}

const PERSONA: &str = "You are \"Personal CineGenius\", a film and series expert with deep analytical skills.";

pub fn random_prompt(profile: &str) -> String {
    format!(
        r#"{PERSONA} Analyse the user's taste profile and give ONE movie or series recommendation.

**ANALYSIS RULES:**

1. **Absolute exclusion:** never suggest a title from the exclusion list.
2. **Weighted lists:**
   * **Loved:** the main source of inspiration. Find the key patterns (genres, themes, directors, tone, narrative complexity) and mirror them.
   * **Liked:** valuable clues. Consider what kept these out of "Loved" and find something with a similar concept and better execution.
   * **Meh:** traps. Avoid works sharing their common elements.
   * **Disliked:** exclude their subgenres and themes entirely.
3. **Thematic bridges:** use themes, not only the genres the user watches most.
4. **Discovery:** prefer a hidden gem the user probably does not know.
5. **Calibrated probabilities:** probabilities must reflect your analysis.

**USER PROFILE:**
{profile}

**Task:** reply with a single JSON object matching the schema. The analysis must connect the choice to the user's likes and dislikes."#
    )
}

pub fn personalized_prompt(profile: &str, filters: &SuggestionFilters) -> String {
    let category = filters
        .category
        .map_or_else(|| "Any".to_string(), |c| c.label().to_string());
    let genres = if filters.genres.is_empty() {
        "Any".to_string()
    } else {
        filters.genres.join(", ")
    };
    let keywords = if filters.keywords.trim().is_empty() {
        "None"
    } else {
        filters.keywords.trim()
    };

    format!(
        r#"{PERSONA} Find the PERFECT recommendation matching both the user's filters and their taste profile.

**ANALYSIS RULES:**

1. **Filters first:** the suggestion MUST match every filter given (category, genres, keywords).
2. **Absolute exclusion:** within the filtered results, never suggest a title from the exclusion list.
3. **Weighted lists (within the filters):**
   * **Loved:** find something that matches the filters and shares the DNA of the loved works.
   * **Liked:** use as a tie-breaker.
   * **Meh / Disliked:** discard candidates sharing their elements.
4. **Calibrated probabilities:** probabilities must reflect your analysis.

**USER FILTERS:**
- Category: {category}
- Genres: {genres}
- Keywords: {keywords}

**USER PROFILE:**
{profile}

**Task:** reply with a single JSON object matching the schema. The analysis must connect the choice to the filters and to the user's likes and dislikes."#
    )
}

pub fn prediction_prompt(title: &str, profile: &str) -> String {
    format!(
        r#"{PERSONA} Predict whether the user will enjoy the title "{title}". Search for information about it (genre, plot, themes) and compare it with the user's history:
{profile}

Reply with a JSON object with "prediction" (one of: "Very likely you will LOVE it!", "Good chance you will LIKE it.", "You might like it, WITH RESERVATIONS.", "Probably NOT FOR YOU.") and "reason" (a detailed justification). Your reply MUST be ONLY the JSON object."#
    )
}

#[cfg(test)]
mod tests {
    use cinetaste_model::{CatalogId, CatalogRecord, CollectionItem, MediaKind};

    use super::*;

    fn state() -> CollectionState {
        let mut state = CollectionState::new();
        state.insert(CollectionItem::new(
            CatalogRecord {
                id: CatalogId(157336),
                kind: MediaKind::Movie,
                title: "Interstellar (2014)".into(),
                category: Category::Movie,
                genre: "Adventure".into(),
                synopsis: None,
                poster_url: None,
            },
            Rating::Loved,
            1,
        ));
        state
    }

    #[test]
    fn profile_merges_exclusions_without_duplicates() {
        let profile = taste_profile(
            &state(),
            &["Dune (2021)".to_string(), "Interstellar (2014)".to_string()],
        );
        assert!(profile.contains("Interstellar (2014), Dune (2021)\n"));
        assert!(profile.contains("- Interstellar (2014) (Type: Movie, Genre: Adventure)"));
        assert_eq!(profile.matches("None").count(), 3);
    }

    #[test]
    fn personalized_prompt_renders_defaults() {
        let prompt = personalized_prompt("profile", &SuggestionFilters::default());
        assert!(prompt.contains("- Category: Any"));
        assert!(prompt.contains("- Genres: Any"));
        assert!(prompt.contains("- Keywords: None"));
    }

    #[test]
    fn schema_enumerates_categories() {
        let schema = recommendation_schema();
        assert_eq!(
            schema["properties"]["type"]["enum"],
            json!(["Movie", "Series", "Anime", "Show"])
        );
    }
}
