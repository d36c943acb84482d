//! The poll-until-match loop that ties the three lookups together.

use crate::cancel::{run_with_cancel, sleep_with_cancel};
use crate::classifier::GenreClassifier;
use crate::events::{create_search_channel, SearchEventEmitter, SearchEventReceiver, SearchEventSender};
use crate::{
    CancellationState, FailureKind, Result, RetryPolicy, RouletteClient, RouletteConfig,
    RouletteError, SearchOutcome,
};

/// Why a single attempt ended without a match.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AttemptFailure {
    kind: FailureKind,
    reason: String,
}

impl AttemptFailure {
    fn new(kind: FailureKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }

    fn stage(kind: FailureKind) -> impl FnOnce(RouletteError) -> Self {
        move |e| Self::new(kind, e.to_string())
    }
}

/// Searches for a random metal release until one is found.
///
/// Each attempt picks a random band from the directory, searches the
/// marketplace for its first album, extracts the release page and classifies
/// its tags. Any failed stage makes the loop wait (per [`RetryPolicy`]) and
/// start over with a new band. Without an attempt cap the loop only ends on a
/// match or through its [`CancellationState`].
///
/// # Examples
///
/// ```rust,no_run
/// use metal_roulette::{RetryPolicy, RouletteClientImpl, SearchLoop};
///
/// # tokio_test::block_on(async {
/// let client = RouletteClientImpl::new(Box::new(http_client::native::NativeClient::new()));
/// let search = SearchLoop::new(&client).with_retry_policy(RetryPolicy::default().with_max_attempts(20));
///
/// let outcome = search.run().await?;
/// if let Some(embed) = &outcome.embed {
///     println!("{}", embed.to_html());
/// }
/// # Ok::<(), metal_roulette::RouletteError>(())
/// # });
/// ```
pub struct SearchLoop<'a> {
    client: &'a dyn RouletteClient,
    policy: RetryPolicy,
    classifier: GenreClassifier,
    cancel: CancellationState,
    events: SearchEventSender,
}

impl<'a> SearchLoop<'a> {
    /// A loop with the default retry policy and metal keywords.
    pub fn new(client: &'a dyn RouletteClient) -> Self {
        let (events, _) = create_search_channel();
        Self {
            client,
            policy: RetryPolicy::default(),
            classifier: GenreClassifier::default(),
            cancel: CancellationState::new(),
            events,
        }
    }

    /// A loop using the retry policy and genre keywords from `config`.
    pub fn from_config(client: &'a dyn RouletteClient, config: &RouletteConfig) -> Self {
        Self::new(client)
            .with_retry_policy(config.retry.clone())
            .with_classifier(config.classifier())
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_classifier(mut self, classifier: GenreClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Use an externally owned cancellation state (e.g. one wired to Ctrl-C).
    pub fn with_cancellation(mut self, cancel: CancellationState) -> Self {
        self.cancel = cancel;
        self
    }

    /// A handle that cancels this loop.
    pub fn cancellation(&self) -> CancellationState {
        self.cancel.clone()
    }

    /// Subscribe to progress events.
    pub fn subscribe(&self) -> SearchEventReceiver {
        self.events.subscribe()
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run attempts until a metal release is found.
    ///
    /// Returns [`RouletteError::Cancelled`] if cancelled (also mid-request or
    /// mid-sleep) and [`RouletteError::AttemptsExhausted`] if the policy's
    /// attempt cap is hit. Stage failures are never returned; they are logged,
    /// emitted as events and retried.
    pub async fn run(&self) -> Result<SearchOutcome> {
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            self.events.emit_attempt_started(attempt);
            log::info!("Attempt {attempt}: searching for a metal band");

            let failure = match run_with_cancel(self.cancel.subscribe(), self.attempt(attempt)).await {
                Ok(Ok(outcome)) => {
                    self.events.emit_match_found(
                        attempt,
                        &outcome.release.band_name,
                        &outcome.release.album_title,
                        outcome.embed.is_some(),
                    );
                    return Ok(outcome);
                }
                Ok(Err(failure)) => failure,
                Err(e) => return Err(self.stopped(attempt, e)),
            };

            if self.policy.is_exhausted(attempt) {
                log::warn!(
                    "Attempt {attempt} failed ({}): {}. Giving up after {attempt} attempts",
                    failure.kind,
                    failure.reason
                );
                self.events
                    .emit_attempt_failed(attempt, failure.kind, &failure.reason, 0);
                self.events.emit_attempts_exhausted(attempt);
                return Err(RouletteError::AttemptsExhausted { attempts: attempt });
            }

            let delay = self.policy.delay_for(failure.kind, attempt);
            log::warn!(
                "Attempt {attempt} failed ({}): {}. Retrying in {delay:?}",
                failure.kind,
                failure.reason
            );
            self.events.emit_attempt_failed(
                attempt,
                failure.kind,
                &failure.reason,
                u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            );

            if let Err(e) = sleep_with_cancel(self.cancel.subscribe(), delay).await {
                return Err(self.stopped(attempt, e));
            }
        }
    }

    fn stopped(&self, attempt: u32, error: RouletteError) -> RouletteError {
        log::info!("Search cancelled during attempt {attempt}");
        self.events.emit_cancelled(attempt);
        error
    }

    /// One pass through lookup, search, extraction and classification.
    async fn attempt(&self, attempt: u32) -> std::result::Result<SearchOutcome, AttemptFailure> {
        let band = self
            .client
            .random_band()
            .await
            .map_err(AttemptFailure::stage(FailureKind::Fetch))?;
        log::info!("Attempt {attempt}: picked '{}'", band.name);
        self.events.emit_band_picked(attempt, &band.name);

        let album_url = self
            .client
            .search_album(&band.name)
            .await
            .map_err(AttemptFailure::stage(FailureKind::Search))?;

        let release = self
            .client
            .release_info(&album_url)
            .await
            .map_err(AttemptFailure::stage(FailureKind::Extraction))?;

        if !release.is_valid() {
            return Err(AttemptFailure::new(
                FailureKind::Extraction,
                format!("missing band or album name on {album_url}"),
            ));
        }
        if release.tags.is_empty() {
            return Err(AttemptFailure::new(
                FailureKind::Extraction,
                format!("no tags on {album_url}"),
            ));
        }

        match self.classifier.matching_tag(&release.tags) {
            Some(tag) => log::info!(
                "'{}' by {} is metal (tag '{tag}')",
                release.album_title,
                release.band_name
            ),
            None => {
                return Err(AttemptFailure::new(
                    FailureKind::NotMetal,
                    format!(
                        "'{}' by {} is tagged {:?}",
                        release.album_title, release.band_name, release.tags
                    ),
                ))
            }
        }

        let embed = release.embed_snippet();
        if embed.is_none() {
            log::warn!("{album_url} has no player metadata; returning the match without an embed");
        }

        Ok(SearchOutcome {
            band,
            release,
            embed,
            attempts: attempt,
        })
    }
}
