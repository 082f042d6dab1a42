use std::fmt::{self, Display};
use std::str::FromStr;

use crate::error::ModelError;

/// Provider-assigned identifier for one catalog title.
///
/// The provider scopes ids by [`MediaKind`](crate::MediaKind); the local
/// collection treats the bare number as unique across both kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CatalogId(pub u64);

impl CatalogId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl From<u64> for CatalogId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl FromStr for CatalogId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ModelError::InvalidCatalogId(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trimmed_numbers() {
        assert_eq!(" 157336 ".parse::<CatalogId>(), Ok(CatalogId(157336)));
        assert!("abc".parse::<CatalogId>().is_err());
        assert!("-4".parse::<CatalogId>().is_err());
    }
}
