use cinetaste_model::{
    CatalogDetails, CatalogRecord, Category, MediaKind, PosterSize, poster_url,
};

pub const UNKNOWN_GENRE: &str = "Unknown";
pub const SYNOPSIS_UNAVAILABLE: &str = "Synopsis not available.";

/// Classify a detail record.
///
/// Series become `Anime` on an explicit "anime" hint in the query or on
/// Japanese-language animation. Talk and news genres override everything.
pub fn derive_category(query: &str, details: &CatalogDetails) -> Category {
    let mut category = Category::for_kind(details.kind);

    if details.kind == MediaKind::Series {
        let anime_hint = query.to_lowercase().contains("anime");
        if anime_hint || details.is_japanese_animation() {
            category = Category::Anime;
        }
    }

    if details.is_talk_or_news() {
        category = Category::Show;
    }

    category
}

pub fn build_record(query: &str, details: &CatalogDetails, image_base: &str) -> CatalogRecord {
    CatalogRecord {
        id: details.id,
        kind: details.kind,
        title: details.title_with_year(),
        category: derive_category(query, details),
        genre: details
            .primary_genre()
            .unwrap_or(UNKNOWN_GENRE)
            .to_string(),
        synopsis: Some(
            details
                .overview
                .clone()
                .unwrap_or_else(|| SYNOPSIS_UNAVAILABLE.to_string()),
        ),
        poster_url: poster_url(
            image_base,
            PosterSize::default(),
            details.poster_path.as_deref(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use cinetaste_model::{CatalogId, Genre, genre_ids};

    use super::*;

    fn details(kind: MediaKind, language: &str, genres: &[u32]) -> CatalogDetails {
        CatalogDetails {
            id: CatalogId(31910),
            kind,
            title: "Naruto Shippuden".into(),
            release_date: Some("2007-02-15".into()),
            genres: genres
                .iter()
                .map(|id| Genre {
                    id: *id,
                    name: format!("genre-{id}"),
                })
                .collect(),
            overview: None,
            poster_path: Some("/kV27j3Nz4d5z8u6mN3EJw9RiLg2.jpg".into()),
            original_language: Some(language.into()),
        }
    }

    #[test]
    fn japanese_animated_series_is_anime() {
        let d = details(MediaKind::Series, "ja", &[genre_ids::ANIMATION]);
        assert_eq!(derive_category("Naruto Shippuden", &d), Category::Anime);
    }

    #[test]
    fn anime_hint_only_applies_to_series() {
        let series = details(MediaKind::Series, "en", &[18]);
        assert_eq!(derive_category("Castlevania anime", &series), Category::Anime);

        let movie = details(MediaKind::Movie, "ja", &[genre_ids::ANIMATION]);
        assert_eq!(derive_category("Akira anime", &movie), Category::Movie);
    }

    #[test]
    fn talk_or_news_overrides_anime() {
        let d = details(
            MediaKind::Series,
            "ja",
            &[genre_ids::ANIMATION, genre_ids::TALK],
        );
        assert_eq!(derive_category("some anime", &d), Category::Show);

        let news = details(MediaKind::Movie, "en", &[genre_ids::NEWS]);
        assert_eq!(derive_category("news", &news), Category::Show);
    }

    #[test]
    fn record_defaults_missing_fields() {
        let d = details(MediaKind::Series, "en", &[]);
        let record = build_record("Naruto", &d, "https://image.tmdb.org/t/p");

        assert_eq!(record.title, "Naruto Shippuden (2007)");
        assert_eq!(record.genre, UNKNOWN_GENRE);
        assert_eq!(record.synopsis.as_deref(), Some(SYNOPSIS_UNAVAILABLE));
        assert_eq!(
            record.poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/kV27j3Nz4d5z8u6mN3EJw9RiLg2.jpg")
        );
    }
}
