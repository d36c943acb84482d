use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for the random metal album search.
///
/// The three lookup stages each have their own variant so a failed attempt
/// always carries the stage it failed at. The search loop treats all of them
/// the same way (wait and retry), but logs and events keep the distinction.
///
/// # Error Handling Examples
///
/// ```rust,no_run
/// use metal_roulette::{RouletteClient, RouletteClientImpl, RouletteError};
///
/// #[tokio::main]
/// async fn main() {
///     let client = RouletteClientImpl::new(Box::new(http_client::native::NativeClient::new()));
///
///     match client.search_album("Dark Funeral").await {
///         Ok(url) => println!("First album: {}", url),
///         Err(RouletteError::Search(msg)) => eprintln!("Search failed: {}", msg),
///         Err(e) => eprintln!("Other error: {}", e),
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum RouletteError {
    /// HTTP/network related errors.
    ///
    /// Raised by the transport layer before a lookup stage gets to look at
    /// the response. Lookup methods wrap these into their stage variant.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The random band page could not be fetched or had no band heading.
    #[error("Random band lookup failed: {0}")]
    Fetch(String),

    /// The marketplace search failed or returned no usable album result.
    #[error("Marketplace search failed: {0}")]
    Search(String),

    /// The release page could not be fetched or lacked band/album names.
    #[error("Release page extraction failed: {0}")]
    Extraction(String),

    /// The search was cancelled through its [`CancellationState`](crate::CancellationState).
    #[error("Search cancelled")]
    Cancelled,

    /// The configured attempt cap was reached without finding a metal album.
    #[error("No metal album found after {attempts} attempts")]
    AttemptsExhausted {
        /// Number of attempts made
        attempts: u32,
    },

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system I/O errors.
    ///
    /// This can occur when saving debug responses or the cached result.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization of the cached result failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The reason a single search attempt did not produce a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    /// The random band lookup failed.
    Fetch,
    /// The marketplace search failed.
    Search,
    /// The release page could not be extracted or had no tags.
    Extraction,
    /// The release was extracted but its tags are not metal.
    NotMetal,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FailureKind::Fetch => "fetch",
            FailureKind::Search => "search",
            FailureKind::Extraction => "extraction",
            FailureKind::NotMetal => "not metal",
        };
        f.write_str(name)
    }
}

impl RouletteError {
    /// The lookup stage this error belongs to, if it is a stage failure.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            RouletteError::Fetch(_) => Some(FailureKind::Fetch),
            RouletteError::Search(_) => Some(FailureKind::Search),
            RouletteError::Extraction(_) => Some(FailureKind::Extraction),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_errors_map_to_failure_kinds() {
        assert_eq!(
            RouletteError::Fetch("x".to_string()).failure_kind(),
            Some(FailureKind::Fetch)
        );
        assert_eq!(
            RouletteError::Search("x".to_string()).failure_kind(),
            Some(FailureKind::Search)
        );
        assert_eq!(
            RouletteError::Extraction("x".to_string()).failure_kind(),
            Some(FailureKind::Extraction)
        );
        assert_eq!(RouletteError::Cancelled.failure_kind(), None);
        assert_eq!(RouletteError::Http("x".to_string()).failure_kind(), None);
    }

    #[test]
    fn test_error_messages() {
        let err = RouletteError::AttemptsExhausted { attempts: 3 };
        assert_eq!(err.to_string(), "No metal album found after 3 attempts");
        assert_eq!(FailureKind::NotMetal.to_string(), "not metal");
    }
}
