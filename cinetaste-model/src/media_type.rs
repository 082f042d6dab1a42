use std::fmt::Formatter;

use std::fmt::Display;
use std::str::FromStr;

use crate::error::ModelError;

/// Provider-level classification of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MediaKind {
    /// Theatrical or streaming film
    #[cfg_attr(feature = "serde", serde(rename = "movie"))]
    Movie,
    /// Episodic television
    #[cfg_attr(feature = "serde", serde(rename = "tv"))]
    Series,
}

impl MediaKind {
    /// Path segment and `media_type` value used by the catalog API.
    pub const fn as_api_str(self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "tv",
        }
    }

    /// Parse the `media_type` value of a multi-search hit. Kinds other than
    /// movie and tv (people, collections) yield `None`.
    pub fn from_api_str(raw: &str) -> Option<Self> {
        match raw {
            "movie" => Some(MediaKind::Movie),
            "tv" => Some(MediaKind::Series),
            _ => None,
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Movie => write!(f, "movie"),
            MediaKind::Series => write!(f, "series"),
        }
    }
}

impl FromStr for MediaKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" | "film" => Ok(MediaKind::Movie),
            "tv" | "series" => Ok(MediaKind::Series),
            _ => Err(ModelError::InvalidMediaKind(s.to_string())),
        }
    }
}

/// The collection's own four-way classification, derived from the
/// provider kind plus genre and language heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    Movie,
    Series,
    Anime,
    /// Talk shows and news programs
    Show,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Movie,
        Category::Series,
        Category::Anime,
        Category::Show,
    ];

    /// Default category for a provider kind before heuristics apply.
    pub const fn for_kind(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Movie => Category::Movie,
            MediaKind::Series => Category::Series,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Category::Movie => "Movie",
            Category::Series => "Series",
            Category::Anime => "Anime",
            Category::Show => "Show",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Category {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" | "film" => Ok(Category::Movie),
            "series" | "tv" => Ok(Category::Series),
            "anime" => Ok(Category::Anime),
            "show" | "program" => Ok(Category::Show),
            _ => Err(ModelError::InvalidCategory(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_strings_round_trip_for_supported_kinds() {
        for kind in [MediaKind::Movie, MediaKind::Series] {
            assert_eq!(MediaKind::from_api_str(kind.as_api_str()), Some(kind));
        }
        assert_eq!(MediaKind::from_api_str("person"), None);
    }

    #[test]
    fn category_parsing_is_case_insensitive() {
        assert_eq!("ANIME".parse::<Category>(), Ok(Category::Anime));
        assert_eq!("tv".parse::<Category>(), Ok(Category::Series));
        assert!("documentary".parse::<Category>().is_err());
    }
}
