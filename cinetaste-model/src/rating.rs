use std::fmt::{self, Display};
use std::str::FromStr;

use crate::error::ModelError;

/// The user's taste label. Every collection item lives in exactly one
/// rating partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Rating {
    Loved,
    Liked,
    Meh,
    Disliked,
}

impl Rating {
    /// Partition order used for display, seeding and prompt rendering.
    pub const ALL: [Rating; 4] =
        [Rating::Loved, Rating::Liked, Rating::Meh, Rating::Disliked];

    /// Stable key used in persisted state.
    pub const fn key(self) -> &'static str {
        match self {
            Rating::Loved => "loved",
            Rating::Liked => "liked",
            Rating::Meh => "meh",
            Rating::Disliked => "disliked",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Rating::Loved => "Loved",
            Rating::Liked => "Liked",
            Rating::Meh => "Meh",
            Rating::Disliked => "Disliked",
        }
    }
}

impl Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Rating {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "loved" | "love" => Ok(Rating::Loved),
            "liked" | "like" => Ok(Rating::Liked),
            "meh" => Ok(Rating::Meh),
            "disliked" | "dislike" => Ok(Rating::Disliked),
            _ => Err(ModelError::InvalidRating(s.to_string())),
        }
    }
}
