pub mod find;
pub mod last;
pub mod lookup;
pub mod utils;

use clap::Subcommand;
use metal_roulette::{RouletteClientImpl, RouletteConfig};
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Find a random metal album with a player
    ///
    /// Picks random bands from Metal Archives, looks up their first album on
    /// Bandcamp and stops at the first one whose tags are metal. Runs until a
    /// match is found unless --max-attempts is given; Ctrl-C cancels.
    ///
    /// Usage examples:
    /// # Find an album and print the player snippet
    /// metal-roulette find
    ///
    /// # Give up after 20 attempts, write a page you can open in a browser
    /// metal-roulette find --max-attempts 20 --html album.html
    ///
    /// # Back off exponentially between attempts, print JSON
    /// metal-roulette find --backoff 2 --json
    Find {
        /// Stop after this many attempts (default: unbounded)
        #[arg(long)]
        max_attempts: Option<u32>,

        /// Seconds to wait after the random band lookup fails
        #[arg(long)]
        fetch_delay: Option<u64>,

        /// Seconds to wait after any other failed attempt
        #[arg(long)]
        retry_delay: Option<u64>,

        /// Multiply the delay by this factor after each failed attempt
        #[arg(long)]
        backoff: Option<u32>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Write a standalone HTML page with the player to this file
        #[arg(long)]
        html: Option<PathBuf>,

        /// Do not remember the result for `last`
        #[arg(long)]
        no_cache: bool,
    },

    /// Show a random band from Metal Archives
    Band {
        /// Print the band as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search Bandcamp for a band's first album
    ///
    /// Usage examples:
    /// metal-roulette search "Dark Funeral"
    Search {
        /// Band name
        name: String,
    },

    /// Extract band, album, tags and player from a Bandcamp album page
    ///
    /// Usage examples:
    /// metal-roulette release https://darkfuneral.bandcamp.com/album/where-shadows-forever-reign
    Release {
        /// Album page URL
        url: String,

        /// Print the release as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the last album found by `find`
    Last {
        /// Forget the cached result
        #[arg(long)]
        clear: bool,

        /// Write a standalone HTML page with the player to this file
        #[arg(long)]
        html: Option<PathBuf>,
    },
}

/// Execute the appropriate command handler based on the parsed command
pub async fn execute_command(
    command: Commands,
    client: &RouletteClientImpl,
    mut config: RouletteConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Find {
            max_attempts,
            fetch_delay,
            retry_delay,
            backoff,
            json,
            html,
            no_cache,
        } => {
            find::apply_overrides(&mut config, max_attempts, fetch_delay, retry_delay, backoff);
            let options = find::FindOptions {
                json,
                html,
                cache: !no_cache,
            };
            find::handle_find_command(client, &config, &options).await
        }

        Commands::Band { json } => lookup::handle_band_command(client, json).await,

        Commands::Search { name } => lookup::handle_search_command(client, &name).await,

        Commands::Release { url, json } => {
            lookup::handle_release_command(client, &config, &url, json).await
        }

        Commands::Last { clear, html } => last::handle_last_command(clear, html.as_deref()),
    }
}
