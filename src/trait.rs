use crate::{BandRecord, ReleaseInfo, Result};
use async_trait::async_trait;

/// Trait for the three lookups the search loop composes.
///
/// The loop only talks to this trait, so it can be driven by the real
/// scraping client or by scripted fakes and mocks in tests.
///
/// # Mocking Support
///
/// When the `mock` feature is enabled, this crate provides `MockRouletteClient`
/// that implements this trait using the `mockall` library.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait(?Send)]
pub trait RouletteClient {
    /// Fetch a random band from the directory service.
    ///
    /// Fails with [`RouletteError::Fetch`](crate::RouletteError::Fetch).
    async fn random_band(&self) -> Result<BandRecord>;

    /// Search the marketplace for albums and return the first result's URL,
    /// without its tracking suffix.
    ///
    /// Fails with [`RouletteError::Search`](crate::RouletteError::Search).
    async fn search_album(&self, band_name: &str) -> Result<String>;

    /// Fetch a release page and extract its metadata.
    ///
    /// Fails with [`RouletteError::Extraction`](crate::RouletteError::Extraction).
    async fn release_info(&self, album_url: &str) -> Result<ReleaseInfo>;
}
