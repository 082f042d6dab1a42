//! Catalog-facing records: transient search hits, hydrated detail payloads,
//! and the finished record the resolver hands to the collection.

use crate::{CatalogId, Category, MediaKind};

/// Well-known catalog genre ids used by category heuristics.
pub mod genre_ids {
    pub const ANIMATION: u32 = 16;
    pub const NEWS: u32 = 10763;
    pub const TALK: u32 = 10767;
}

/// One search hit. Produced per search call and never persisted.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CandidateResult {
    pub id: CatalogId,
    pub kind: MediaKind,
    pub title: String,
    pub overview: String,
    /// Provider popularity score, never negative.
    pub popularity: f64,
    /// `release_date` for movies, `first_air_date` for series.
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
}

impl CandidateResult {
    /// Whether the release date string starts with the given year token.
    pub fn released_in(&self, year: &str) -> bool {
        self.release_date
            .as_deref()
            .is_some_and(|date| date.starts_with(year))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// Detail payload for one catalog entry, normalized across movies and
/// series (`title`/`name`, `release_date`/`first_air_date`).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogDetails {
    pub id: CatalogId,
    pub kind: MediaKind,
    pub title: String,
    pub release_date: Option<String>,
    pub genres: Vec<Genre>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub original_language: Option<String>,
}

impl CatalogDetails {
    pub fn has_genre(&self, genre_id: u32) -> bool {
        self.genres.iter().any(|g| g.id == genre_id)
    }

    /// Leading four-digit year of the release date, if any.
    pub fn release_year(&self) -> Option<i32> {
        self.release_date
            .as_deref()
            .and_then(|date| date.get(..4))
            .and_then(|year| year.parse().ok())
    }

    /// Title with the release year appended, `N/A` when undated.
    pub fn title_with_year(&self) -> String {
        match self.release_year() {
            Some(year) => format!("{} ({})", self.title, year),
            None => format!("{} (N/A)", self.title),
        }
    }

    pub fn primary_genre(&self) -> Option<&str> {
        self.genres.first().map(|g| g.name.as_str())
    }

    pub fn is_japanese_animation(&self) -> bool {
        self.original_language.as_deref() == Some("ja")
            && self.has_genre(genre_ids::ANIMATION)
    }

    pub fn is_talk_or_news(&self) -> bool {
        self.has_genre(genre_ids::TALK) || self.has_genre(genre_ids::NEWS)
    }
}

/// Fully hydrated record produced by the resolver.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CatalogRecord {
    pub id: CatalogId,
    pub kind: MediaKind,
    /// Canonical title with the release year appended.
    pub title: String,
    pub category: Category,
    pub genre: String,
    /// Optional so that seeded entries can be backfilled lazily.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub synopsis: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub poster_url: Option<String>,
}
