use crate::{Result, RouletteError, SearchOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A found result together with when it was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedResult {
    pub found_at: DateTime<Utc>,
    pub outcome: SearchOutcome,
}

/// Holds the most recent search result for whoever displays it.
///
/// Owned by the caller: create it, `update` it after each successful search,
/// `clear` it when the result should no longer be shown. It can optionally be
/// persisted as JSON so the CLI can show the last album across runs. Files
/// live under the XDG data directory:
/// `~/.local/share/metal-roulette/last_result.json`
#[derive(Debug, Clone, Default)]
pub struct ResultCache {
    current: Option<CachedResult>,
}

impl ResultCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached result.
    pub fn update(&mut self, outcome: SearchOutcome) -> &CachedResult {
        self.current.insert(CachedResult {
            found_at: Utc::now(),
            outcome,
        })
    }

    pub fn current(&self) -> Option<&CachedResult> {
        self.current.as_ref()
    }

    /// The HTML snippet to display, if there is a result with a player.
    pub fn embed_html(&self) -> Option<String> {
        self.current
            .as_ref()
            .and_then(|cached| cached.outcome.embed.as_ref())
            .map(|embed| embed.to_html())
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Get the default cache file path using XDG directories.
    pub fn default_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir().ok_or_else(|| {
            RouletteError::Config("Cannot determine XDG data directory".to_string())
        })?;

        Ok(data_dir.join("metal-roulette").join("last_result.json"))
    }

    /// Load the cache from `path`. A missing file yields an empty cache.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No cached result at {}", path.display());
            return Ok(Self::new());
        }

        let json = fs::read_to_string(path)?;
        let cached: CachedResult = serde_json::from_str(&json)?;

        log::debug!("Cached result loaded from: {}", path.display());
        Ok(Self {
            current: Some(cached),
        })
    }

    /// Save the cache to `path`, or remove the file if the cache is empty.
    pub fn save(&self, path: &Path) -> Result<()> {
        let Some(cached) = &self.current else {
            return Self::remove(path);
        };

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, serde_json::to_string_pretty(cached)?)?;

        log::debug!("Cached result saved to: {}", path.display());
        Ok(())
    }

    /// Remove a persisted cache file, if any.
    pub fn remove(path: &Path) -> Result<()> {
        if path.exists() {
            fs::remove_file(path)?;
            log::debug!("Cached result removed: {}", path.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BandRecord, ReleaseInfo};

    fn outcome(embed_url: Option<&str>) -> SearchOutcome {
        let release = ReleaseInfo {
            url: "https://bathory.bandcamp.com/album/blood-fire-death".to_string(),
            band_name: "Bathory".to_string(),
            album_title: "Blood Fire Death".to_string(),
            tags: vec!["viking metal".to_string()],
            embed_url: embed_url.map(str::to_string),
        };
        SearchOutcome {
            band: BandRecord::named("Bathory", "https://www.metal-archives.com/bands/Bathory/184"),
            embed: release.embed_snippet(),
            release,
            attempts: 4,
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("metal-roulette-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_lifecycle() {
        let mut cache = ResultCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.embed_html(), None);

        cache.update(outcome(Some("https://bandcamp.com/EmbeddedPlayer/album=7/")));
        assert!(!cache.is_empty());
        assert!(cache
            .embed_html()
            .unwrap()
            .contains("src=\"https://bandcamp.com/EmbeddedPlayer/album=7/\""));

        cache.update(outcome(None));
        assert_eq!(cache.current().unwrap().outcome.embed, None);
        assert_eq!(cache.embed_html(), None);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("save_and_load.json");
        let mut cache = ResultCache::new();
        cache.update(outcome(Some("https://bandcamp.com/EmbeddedPlayer/album=7/")));

        cache.save(&path).unwrap();
        let loaded = ResultCache::load(&path).unwrap();
        assert_eq!(loaded.current(), cache.current());

        cache.clear();
        cache.save(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let loaded = ResultCache::load(&temp_path("does_not_exist.json")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_load_corrupt_file_is_json_error() {
        let path = temp_path("corrupt.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(ResultCache::load(&path), Err(RouletteError::Json(_))));
        ResultCache::remove(&path).unwrap();
    }
}
