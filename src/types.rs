//! Data types for band and release metadata.
//!
//! These are produced fresh by each lookup and handed to the search loop;
//! none of them is persisted except through the [`ResultCache`](crate::ResultCache).

use crate::embed::EmbedSnippet;
use serde::{Deserialize, Serialize};

// ================================================================================================
// DIRECTORY SERVICE
// ================================================================================================

/// Value used for band details missing from the directory page.
pub const UNKNOWN: &str = "Unknown";

/// A band as listed on the directory service's random band page.
///
/// # Examples
///
/// ```rust
/// use metal_roulette::BandRecord;
///
/// let band = BandRecord::named("Dark Funeral", "https://www.metal-archives.com/bands/Dark_Funeral/463");
/// assert_eq!(band.genre, "Unknown");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BandRecord {
    /// The band name from the page heading
    pub name: String,
    /// Country of origin
    pub country_of_origin: String,
    /// City/region the band is from
    pub location: String,
    /// Genre as listed by the directory
    pub genre: String,
    /// Lyrical themes
    pub lyrical_themes: String,
    /// Current (or last known) label
    pub label: String,
    /// Active, split-up, on hold...
    pub status: String,
    /// Link to the band's profile on the directory service
    pub profile_url: String,
}

impl BandRecord {
    /// Create a record with only the name and profile URL known.
    pub fn named(name: impl Into<String>, profile_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country_of_origin: UNKNOWN.to_string(),
            location: UNKNOWN.to_string(),
            genre: UNKNOWN.to_string(),
            lyrical_themes: UNKNOWN.to_string(),
            label: UNKNOWN.to_string(),
            status: UNKNOWN.to_string(),
            profile_url: profile_url.into(),
        }
    }
}

// ================================================================================================
// MARKETPLACE
// ================================================================================================

/// Metadata extracted from a marketplace release (album) page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReleaseInfo {
    /// The album page this was extracted from
    pub url: String,
    /// Band name as shown in the release byline
    pub band_name: String,
    /// Album title
    pub album_title: String,
    /// Free-text tags in page order; duplicates are kept
    pub tags: Vec<String>,
    /// Player widget URL, already rewritten to the minimal skin
    pub embed_url: Option<String>,
}

impl ReleaseInfo {
    /// A release is usable only when both names are present.
    pub fn is_valid(&self) -> bool {
        !self.band_name.trim().is_empty() && !self.album_title.trim().is_empty()
    }

    /// Build the embeddable player snippet, if the page had widget metadata.
    pub fn embed_snippet(&self) -> Option<EmbedSnippet> {
        self.embed_url.as_ref().map(|player_url| EmbedSnippet {
            player_url: player_url.clone(),
            album_url: self.url.clone(),
            album_title: self.album_title.clone(),
            band_name: self.band_name.clone(),
        })
    }
}

// ================================================================================================
// SEARCH RESULT
// ================================================================================================

/// The terminal result of a successful search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// The directory record that led to the match
    pub band: BandRecord,
    /// The matching release
    pub release: ReleaseInfo,
    /// Player snippet; `None` when the release page has no widget metadata
    pub embed: Option<EmbedSnippet>,
    /// Number of attempts made, including the successful one
    pub attempts: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release(band: &str, album: &str, embed_url: Option<&str>) -> ReleaseInfo {
        ReleaseInfo {
            url: "https://band.bandcamp.com/album/x".to_string(),
            band_name: band.to_string(),
            album_title: album.to_string(),
            tags: vec!["black metal".to_string()],
            embed_url: embed_url.map(str::to_string),
        }
    }

    #[test]
    fn test_release_validity_requires_both_names() {
        assert!(release("Band", "Album", None).is_valid());
        assert!(!release("", "Album", None).is_valid());
        assert!(!release("Band", "  ", None).is_valid());
    }

    #[test]
    fn test_release_without_tags_is_still_valid() {
        let mut info = release("Band", "Album", None);
        info.tags.clear();
        assert!(info.is_valid());
    }

    #[test]
    fn test_embed_snippet_only_with_embed_url() {
        assert!(release("Band", "Album", None).embed_snippet().is_none());

        let snippet = release("Band", "Album", Some("https://bandcamp.com/EmbeddedPlayer/album=1/"))
            .embed_snippet()
            .unwrap();
        assert_eq!(snippet.player_url, "https://bandcamp.com/EmbeddedPlayer/album=1/");
        assert_eq!(snippet.album_url, "https://band.bandcamp.com/album/x");
        assert_eq!(snippet.band_name, "Band");
    }

    #[test]
    fn test_band_record_defaults_to_unknown() {
        let band = BandRecord::named("Name", "https://example.com/bands/Name/1");
        assert_eq!(band.country_of_origin, UNKNOWN);
        assert_eq!(band.status, UNKNOWN);
        assert_eq!(band.profile_url, "https://example.com/bands/Name/1");
    }
}
