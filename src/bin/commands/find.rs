use super::utils::{print_band, print_release, write_html_page};
use metal_roulette::{
    CancellationState, ResultCache, RouletteClientImpl, RouletteConfig, SearchEvent, SearchLoop,
};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;

pub struct FindOptions {
    pub json: bool,
    pub html: Option<PathBuf>,
    pub cache: bool,
}

/// Apply command line retry settings on top of the environment config.
pub fn apply_overrides(
    config: &mut RouletteConfig,
    max_attempts: Option<u32>,
    fetch_delay: Option<u64>,
    retry_delay: Option<u64>,
    backoff: Option<u32>,
) {
    if let Some(max) = max_attempts {
        config.retry.max_attempts = (max > 0).then_some(max);
    }
    if let Some(secs) = fetch_delay {
        config.retry.fetch_failure_delay = Duration::from_secs(secs);
    }
    if let Some(secs) = retry_delay {
        config.retry.retry_delay = Duration::from_secs(secs);
    }
    if let Some(multiplier) = backoff {
        config.retry.backoff_multiplier = multiplier.max(1);
    }
}

/// Handle the find command: run the search loop until a metal album turns up
pub async fn handle_find_command(
    client: &RouletteClientImpl,
    config: &RouletteConfig,
    options: &FindOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let cancel = CancellationState::new();
    let search = SearchLoop::from_config(client, config).with_cancellation(cancel.clone());

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    if !options.json {
        let mut events = search.subscribe();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => print_progress(&event),
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                }
            }
        });
        eprintln!("🔎 Finding a metal album...");
    }

    let outcome = search.run().await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!();
        print_band(&outcome.band);
        println!();
        print_release(&outcome.release);
        println!("  Attempts: {}", outcome.attempts);
        println!();
        match &outcome.embed {
            Some(embed) => println!("{}", embed.to_html()),
            None => println!("⚠️  The album page has no player to embed"),
        }
    }

    if let Some(path) = &options.html {
        match &outcome.embed {
            Some(embed) => write_html_page(path, embed)?,
            None => eprintln!("⚠️  No player, not writing {}", path.display()),
        }
    }

    if options.cache {
        let mut cache = ResultCache::new();
        cache.update(outcome);
        match ResultCache::default_path() {
            Ok(path) => {
                if let Err(e) = cache.save(&path) {
                    eprintln!("⚠️  Warning: Failed to save result: {e}");
                }
            }
            Err(e) => eprintln!("⚠️  Warning: {e}"),
        }
    }

    Ok(())
}

fn print_progress(event: &SearchEvent) {
    match event {
        SearchEvent::BandPicked {
            attempt, band_name, ..
        } => eprintln!("🎲 Attempt {attempt}: {band_name}"),
        SearchEvent::AttemptFailed {
            kind,
            reason,
            delay_ms,
            ..
        } => eprintln!("   ✗ {kind}: {reason} (retrying in {:.1}s)", *delay_ms as f64 / 1000.0),
        SearchEvent::MatchFound {
            band_name,
            album_title,
            ..
        } => eprintln!("🤘 {album_title} by {band_name}"),
        SearchEvent::AttemptsExhausted { attempts, .. } => {
            eprintln!("💀 Giving up after {attempts} attempts")
        }
        SearchEvent::AttemptStarted { .. } | SearchEvent::Cancelled { .. } => {}
    }
}
