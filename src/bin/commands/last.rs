use super::utils::{print_band, print_release, write_html_page};
use metal_roulette::ResultCache;
use std::path::Path;

/// Handle the last command: show or clear the cached result
pub fn handle_last_command(
    clear: bool,
    html: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = ResultCache::default_path()?;

    if clear {
        ResultCache::remove(&path)?;
        println!("🧹 Cached result cleared");
        return Ok(());
    }

    let cache = ResultCache::load(&path)?;
    let Some(cached) = cache.current() else {
        println!("No album found yet. Run `metal-roulette find` first.");
        return Ok(());
    };

    println!(
        "🕒 Found {} after {} attempts\n",
        cached.found_at.format("%Y-%m-%d %H:%M:%S UTC"),
        cached.outcome.attempts
    );
    print_band(&cached.outcome.band);
    println!();
    print_release(&cached.outcome.release);

    match (&cached.outcome.embed, html) {
        (Some(embed), Some(path)) => write_html_page(path, embed)?,
        (Some(embed), None) => println!("\n{}", embed.to_html()),
        (None, _) => println!("\n⚠️  The album page has no player to embed"),
    }
    Ok(())
}
