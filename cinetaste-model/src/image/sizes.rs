use std::fmt::Display;
use std::fmt::Formatter;

/// Poster widths served by the catalog image CDN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PosterSize {
    /// 92px width - tiny thumbnail
    W92,
    /// 154px width - list thumbnail
    W154,
    /// 185px width - small poster
    W185,
    /// 342px width - medium poster
    W342,
    /// 500px width - collection card (default)
    #[default]
    W500,
    /// 780px width - large poster
    W780,
    /// Original upload resolution
    Original,
}

impl PosterSize {
    /// Size segment placed between the image base URL and the poster path.
    pub const fn as_path(self) -> &'static str {
        match self {
            PosterSize::W92 => "w92",
            PosterSize::W154 => "w154",
            PosterSize::W185 => "w185",
            PosterSize::W342 => "w342",
            PosterSize::W500 => "w500",
            PosterSize::W780 => "w780",
            PosterSize::Original => "original",
        }
    }

    pub const fn width(self) -> Option<u32> {
        match self {
            PosterSize::W92 => Some(92),
            PosterSize::W154 => Some(154),
            PosterSize::W185 => Some(185),
            PosterSize::W342 => Some(342),
            PosterSize::W500 => Some(500),
            PosterSize::W780 => Some(780),
            PosterSize::Original => None,
        }
    }
}

impl Display for PosterSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_path())
    }
}

/// Build a poster reference: base URL + size segment + poster path.
/// Empty paths yield `None`.
pub fn poster_url(
    image_base: &str,
    size: PosterSize,
    poster_path: Option<&str>,
) -> Option<String> {
    let path = poster_path.map(str::trim).filter(|p| !p.is_empty())?;
    let base = image_base.trim_end_matches('/');
    if path.starts_with('/') {
        Some(format!("{base}/{}{path}", size.as_path()))
    } else {
        Some(format!("{base}/{}/{path}", size.as_path()))
    }
}
