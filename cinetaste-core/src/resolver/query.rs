use once_cell::sync::Lazy;
use regex::Regex;

static TRAILING_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\s*\(?([0-9]{4})\)?\s*)$").expect("trailing year regex should compile")
});

static PARENTHETICAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*\([^)]*\)\s*").expect("parenthetical regex should compile")
});

/// A user title query split into its searchable parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    /// The query as typed, trimmed.
    pub original: String,
    /// Query with the trailing year removed, or the original when no year
    /// was found. May be empty when the query is only a year.
    pub title: String,
    pub year: Option<String>,
}

impl ParsedQuery {
    pub fn parse(query: &str) -> Self {
        let original = query.trim().to_string();

        match TRAILING_YEAR.captures(&original) {
            Some(caps) => {
                let start = caps.get(0).map_or(original.len(), |m| m.start());
                let year = caps.get(1).map(|m| m.as_str().to_string());
                let title = original[..start].trim().to_string();
                Self {
                    original,
                    title,
                    year,
                }
            }
            None => Self {
                title: original.clone(),
                original,
                year: None,
            },
        }
    }
}

/// Remove every parenthesised qualifier, e.g. `"Oldboy (Remake)"` becomes
/// `"Oldboy"`. Words on either side stay separated by one space; deleting
/// the match outright would glue them (`"Death Note (2017) Netflix"` into
/// `"Death NoteNetflix"`).
pub fn strip_parentheticals(query: &str) -> String {
    PARENTHETICAL
        .replace_all(query, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
