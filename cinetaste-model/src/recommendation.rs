use crate::{Category, Rating};

/// Probability (0-100) of each rating for a suggested title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RatingProbabilities {
    pub loved: u8,
    pub liked: u8,
    pub meh: u8,
    pub disliked: u8,
}

impl RatingProbabilities {
    pub fn get(&self, rating: Rating) -> u8 {
        match rating {
            Rating::Loved => self.loved,
            Rating::Liked => self.liked,
            Rating::Meh => self.meh,
            Rating::Disliked => self.disliked,
        }
    }

    /// The rating with the highest probability; earlier ratings win ties.
    pub fn most_likely(&self) -> Rating {
        Rating::ALL
            .into_iter()
            .fold(Rating::Loved, |best, rating| {
                if self.get(rating) > self.get(best) {
                    rating
                } else {
                    best
                }
            })
    }
}

/// One generated suggestion, with a poster attached after lookup.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Recommendation {
    pub title: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub category: Category,
    pub genre: String,
    pub synopsis: String,
    pub probabilities: RatingProbabilities,
    pub analysis: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub poster_url: Option<String>,
}

/// Verdict on whether the user will enjoy a title.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Prediction {
    pub prediction: String,
    pub reason: String,
}

/// User-supplied constraints for a personalized suggestion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionFilters {
    pub category: Option<Category>,
    pub genres: Vec<String>,
    pub keywords: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn most_likely_prefers_earlier_rating_on_tie() {
        let probs = RatingProbabilities {
            loved: 40,
            liked: 40,
            meh: 10,
            disliked: 10,
        };
        assert_eq!(probs.most_likely(), Rating::Loved);

        let probs = RatingProbabilities {
            loved: 5,
            liked: 10,
            meh: 60,
            disliked: 25,
        };
        assert_eq!(probs.most_likely(), Rating::Meh);
    }
}
