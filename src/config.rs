use crate::classifier::{GenreClassifier, METAL_KEYWORDS};
use crate::{Result, RetryPolicy, RouletteError};
use std::time::Duration;

/// Default directory service (random band source).
pub const DEFAULT_DIRECTORY_URL: &str = "https://www.metal-archives.com";

/// Default marketplace service (album search and player).
pub const DEFAULT_MARKETPLACE_URL: &str = "https://bandcamp.com";

/// Configuration for a search run.
///
/// Defaults reproduce the classic behavior: Metal Archives as the band
/// source, Bandcamp as the marketplace, fixed 5s/2s delays, no cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouletteConfig {
    /// Base URL of the directory service
    pub directory_url: String,
    /// Base URL of the marketplace service
    pub marketplace_url: String,
    /// Delay/backoff/cap policy for the search loop
    pub retry: RetryPolicy,
    /// Tag substrings that count as metal
    pub genre_keywords: Vec<String>,
    /// Save every fetched page under `debug_responses/`
    pub debug_save_responses: bool,
}

impl Default for RouletteConfig {
    fn default() -> Self {
        Self {
            directory_url: DEFAULT_DIRECTORY_URL.to_string(),
            marketplace_url: DEFAULT_MARKETPLACE_URL.to_string(),
            retry: RetryPolicy::default(),
            genre_keywords: METAL_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            debug_save_responses: false,
        }
    }
}

impl RouletteConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with `METAL_ROULETTE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::default().with_vars(|name| std::env::var(name).ok())
    }

    /// Overlay settings from a variable lookup (environment, or a map in tests).
    pub fn with_vars<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("METAL_ROULETTE_DIRECTORY_URL") {
            self.directory_url = url;
        }
        if let Some(url) = lookup("METAL_ROULETTE_MARKETPLACE_URL") {
            self.marketplace_url = url;
        }
        if let Some(secs) = lookup("METAL_ROULETTE_FETCH_DELAY") {
            self.retry.fetch_failure_delay = parse_secs("METAL_ROULETTE_FETCH_DELAY", &secs)?;
        }
        if let Some(secs) = lookup("METAL_ROULETTE_RETRY_DELAY") {
            self.retry.retry_delay = parse_secs("METAL_ROULETTE_RETRY_DELAY", &secs)?;
        }
        if let Some(max) = lookup("METAL_ROULETTE_MAX_ATTEMPTS") {
            let max = max.trim().parse::<u32>().map_err(|_| {
                RouletteError::Config(format!("METAL_ROULETTE_MAX_ATTEMPTS: invalid number '{max}'"))
            })?;
            self.retry.max_attempts = (max > 0).then_some(max);
        }
        if let Some(keywords) = lookup("METAL_ROULETTE_GENRE_KEYWORDS") {
            self = self.with_genre_keywords(keywords.split(','))?;
        }
        if lookup("METAL_ROULETTE_DEBUG_SAVE_RESPONSES").is_some() {
            self.debug_save_responses = true;
        }
        Ok(self)
    }

    /// Set a custom retry policy
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the genre keywords; at least one non-blank keyword is required.
    pub fn with_genre_keywords<I, S>(mut self, keywords: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        if keywords.is_empty() {
            return Err(RouletteError::Config(
                "at least one genre keyword is required".to_string(),
            ));
        }
        self.genre_keywords = keywords;
        Ok(self)
    }

    /// The classifier described by [`genre_keywords`](Self::genre_keywords).
    pub fn classifier(&self) -> GenreClassifier {
        GenreClassifier::new(self.genre_keywords.iter().cloned())
    }
}

fn parse_secs(name: &str, value: &str) -> Result<Duration> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| RouletteError::Config(format!("{name}: invalid number of seconds '{value}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RouletteConfig::default();
        assert_eq!(config.directory_url, DEFAULT_DIRECTORY_URL);
        assert_eq!(config.marketplace_url, DEFAULT_MARKETPLACE_URL);
        assert_eq!(config.retry, RetryPolicy::default());
        assert_eq!(config.genre_keywords, vec!["metal", "grind", "death", "thrash"]);
        assert!(!config.debug_save_responses);
    }

    #[test]
    fn test_vars_override_defaults() {
        let config = RouletteConfig::default()
            .with_vars(lookup(&[
                ("METAL_ROULETTE_MARKETPLACE_URL", "http://localhost:8080"),
                ("METAL_ROULETTE_FETCH_DELAY", "10"),
                ("METAL_ROULETTE_RETRY_DELAY", " 1 "),
                ("METAL_ROULETTE_MAX_ATTEMPTS", "25"),
                ("METAL_ROULETTE_GENRE_KEYWORDS", "doom, sludge"),
                ("METAL_ROULETTE_DEBUG_SAVE_RESPONSES", "1"),
            ]))
            .unwrap();

        assert_eq!(config.directory_url, DEFAULT_DIRECTORY_URL);
        assert_eq!(config.marketplace_url, "http://localhost:8080");
        assert_eq!(config.retry.fetch_failure_delay, Duration::from_secs(10));
        assert_eq!(config.retry.retry_delay, Duration::from_secs(1));
        assert_eq!(config.retry.max_attempts, Some(25));
        assert_eq!(config.genre_keywords, vec!["doom", "sludge"]);
        assert!(config.debug_save_responses);
    }

    #[test]
    fn test_zero_max_attempts_means_unbounded() {
        let config = RouletteConfig::default()
            .with_vars(lookup(&[("METAL_ROULETTE_MAX_ATTEMPTS", "0")]))
            .unwrap();
        assert_eq!(config.retry.max_attempts, None);
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        let result = RouletteConfig::default()
            .with_vars(lookup(&[("METAL_ROULETTE_RETRY_DELAY", "soon")]));
        assert!(matches!(result, Err(RouletteError::Config(_))));

        let result = RouletteConfig::default()
            .with_vars(lookup(&[("METAL_ROULETTE_GENRE_KEYWORDS", " , ")]));
        assert!(matches!(result, Err(RouletteError::Config(_))));
    }

    #[test]
    fn test_classifier_uses_keywords() {
        let config = RouletteConfig::default().with_genre_keywords(["doom"]).unwrap();
        let classifier = config.classifier();
        assert!(classifier.matches(&["Funeral Doom".to_string()]));
        assert!(!classifier.matches(&["Thrash Metal".to_string()]));
    }
}
