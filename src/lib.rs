//! # metal-roulette
//!
//! Finds a random metal album with an embeddable player by scraping two sites:
//! a random band is picked from Metal Archives, its first album is looked up on
//! Bandcamp, and the album's tags decide whether it is metal. If not, the whole
//! thing starts over with another band.
//!
//! ```rust,no_run
//! use metal_roulette::{RouletteClientImpl, SearchLoop};
//!
//! #[tokio::main]
//! async fn main() -> metal_roulette::Result<()> {
//!     let client = RouletteClientImpl::new(Box::new(http_client::native::NativeClient::new()));
//!     let outcome = SearchLoop::new(&client).run().await?;
//!
//!     println!("{} - {}", outcome.release.band_name, outcome.release.album_title);
//!     if let Some(embed) = outcome.embed {
//!         println!("{embed}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod cancel;
pub mod classifier;
pub mod client;
pub mod config;
pub mod embed;
pub mod error;
pub mod events;
pub mod headers;
pub mod parsing;
pub mod result_cache;
pub mod retry;
pub mod search_loop;
pub mod r#trait;
pub mod types;

pub use cancel::CancellationState;
pub use classifier::{is_metal_band, GenreClassifier};
pub use client::RouletteClientImpl;
pub use config::RouletteConfig;
pub use embed::EmbedSnippet;
pub use error::{FailureKind, RouletteError};
pub use events::{SearchEvent, SearchEventReceiver};
pub use parsing::RouletteParser;
pub use r#trait::RouletteClient;
pub use result_cache::{CachedResult, ResultCache};
pub use retry::RetryPolicy;
pub use search_loop::SearchLoop;
pub use types::{BandRecord, ReleaseInfo, SearchOutcome};

#[cfg(any(test, feature = "mock"))]
pub use r#trait::MockRouletteClient;

// Re-export scraper types for testing
pub use scraper::Html;

pub type Result<T> = std::result::Result<T, RouletteError>;
