//! # Search Events
//!
//! This module provides a broadcast channel system for emitting search loop
//! progress events that consumers (a CLI spinner, a UI, tests) can listen to.

use crate::FailureKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Events emitted by the search loop as it works through attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SearchEvent {
    /// A new attempt is starting.
    AttemptStarted {
        timestamp: DateTime<Utc>,
        /// The attempt number (1-based)
        attempt: u32,
    },
    /// The directory service picked a band for this attempt.
    BandPicked {
        timestamp: DateTime<Utc>,
        attempt: u32,
        /// The band name as listed by the directory
        band_name: String,
    },
    /// The attempt did not produce a match and the loop will wait before retrying.
    AttemptFailed {
        timestamp: DateTime<Utc>,
        attempt: u32,
        /// Stage at which the attempt stopped
        kind: FailureKind,
        /// Human-readable reason
        reason: String,
        /// Delay before the next attempt, in milliseconds (0 when giving up)
        delay_ms: u64,
    },
    /// A metal release was found; the loop is done.
    MatchFound {
        timestamp: DateTime<Utc>,
        attempt: u32,
        band_name: String,
        album_title: String,
        /// Whether the release page carried a player widget
        has_embed: bool,
    },
    /// The search was cancelled.
    Cancelled {
        timestamp: DateTime<Utc>,
        attempt: u32,
    },
    /// The attempt cap was reached.
    AttemptsExhausted {
        timestamp: DateTime<Utc>,
        attempts: u32,
    },
}

/// A handle for receiving search events.
///
/// # Examples
///
/// ```rust,no_run
/// use metal_roulette::{RouletteClientImpl, SearchEvent, SearchLoop};
/// use tokio::sync::broadcast::error::RecvError;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = RouletteClientImpl::new(Box::new(http_client::native::NativeClient::new()));
///     let search = SearchLoop::new(&client);
///     let mut events = search.subscribe();
///
///     tokio::spawn(async move {
///         loop {
///             match events.recv().await {
///                 Ok(SearchEvent::AttemptFailed { attempt, kind, reason, .. }) => {
///                     println!("Attempt {attempt} failed ({kind}): {reason}");
///                 }
///                 Ok(_) => {}
///                 Err(RecvError::Closed) => break,
///                 Err(RecvError::Lagged(skipped)) => println!("{skipped} events skipped"),
///             }
///         }
///     });
///
///     let outcome = search.run().await?;
///     println!("Found {} after {} attempts", outcome.release.album_title, outcome.attempts);
///     Ok(())
/// }
/// ```
pub type SearchEventReceiver = broadcast::Receiver<SearchEvent>;

/// A handle for sending search events.
pub type SearchEventSender = broadcast::Sender<SearchEvent>;

/// Creates a new broadcast channel for search events.
///
/// The channel has a capacity of 100 events.
pub fn create_search_channel() -> (SearchEventSender, SearchEventReceiver) {
    broadcast::channel(100)
}

/// Helper trait for emitting search events.
pub trait SearchEventEmitter {
    fn emit_attempt_started(&self, attempt: u32);

    fn emit_band_picked(&self, attempt: u32, band_name: &str);

    fn emit_attempt_failed(&self, attempt: u32, kind: FailureKind, reason: &str, delay_ms: u64);

    fn emit_match_found(&self, attempt: u32, band_name: &str, album_title: &str, has_embed: bool);

    fn emit_cancelled(&self, attempt: u32);

    fn emit_attempts_exhausted(&self, attempts: u32);
}

impl SearchEventEmitter for SearchEventSender {
    fn emit_attempt_started(&self, attempt: u32) {
        let _ = self.send(SearchEvent::AttemptStarted {
            timestamp: Utc::now(),
            attempt,
        }); // No receivers is fine
    }

    fn emit_band_picked(&self, attempt: u32, band_name: &str) {
        let _ = self.send(SearchEvent::BandPicked {
            timestamp: Utc::now(),
            attempt,
            band_name: band_name.to_string(),
        });
    }

    fn emit_attempt_failed(&self, attempt: u32, kind: FailureKind, reason: &str, delay_ms: u64) {
        let _ = self.send(SearchEvent::AttemptFailed {
            timestamp: Utc::now(),
            attempt,
            kind,
            reason: reason.to_string(),
            delay_ms,
        });
    }

    fn emit_match_found(&self, attempt: u32, band_name: &str, album_title: &str, has_embed: bool) {
        let _ = self.send(SearchEvent::MatchFound {
            timestamp: Utc::now(),
            attempt,
            band_name: band_name.to_string(),
            album_title: album_title.to_string(),
            has_embed,
        });
    }

    fn emit_cancelled(&self, attempt: u32) {
        let _ = self.send(SearchEvent::Cancelled {
            timestamp: Utc::now(),
            attempt,
        });
    }

    fn emit_attempts_exhausted(&self, attempts: u32) {
        let _ = self.send(SearchEvent::AttemptsExhausted {
            timestamp: Utc::now(),
            attempts,
        });
    }
}
