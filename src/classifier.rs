//! Tag-based genre classification.

/// Substrings that mark a tag as belonging to the metal family.
pub const METAL_KEYWORDS: [&str; 4] = ["metal", "grind", "death", "thrash"];

/// Returns `true` if any tag contains one of [`METAL_KEYWORDS`], ignoring case.
///
/// ```rust
/// use metal_roulette::is_metal_band;
///
/// assert!(is_metal_band(&["Black Metal".to_string(), "Atmospheric".to_string()]));
/// assert!(!is_metal_band(&["Ambient".to_string(), "Drone".to_string()]));
/// assert!(!is_metal_band(&[]));
/// ```
pub fn is_metal_band(tags: &[String]) -> bool {
    GenreClassifier::default().matches(tags)
}

/// Case-insensitive substring matcher over a keyword list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreClassifier {
    keywords: Vec<String>,
}

impl Default for GenreClassifier {
    fn default() -> Self {
        Self::new(METAL_KEYWORDS.iter().map(|k| k.to_string()))
    }
}

impl GenreClassifier {
    /// Build a classifier from custom keywords. Blank keywords are dropped.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.into().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// The first tag that matches a keyword, if any.
    pub fn matching_tag<'a>(&self, tags: &'a [String]) -> Option<&'a str> {
        tags.iter()
            .find(|tag| {
                let tag = tag.to_lowercase();
                self.keywords.iter().any(|k| tag.contains(k.as_str()))
            })
            .map(String::as_str)
    }

    pub fn matches(&self, tags: &[String]) -> bool {
        self.matching_tag(tags).is_some()
    }
}
