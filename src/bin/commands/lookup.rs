use super::utils::{print_band, print_release};
use metal_roulette::{RouletteClient, RouletteClientImpl, RouletteConfig};

/// Handle the band command: one random band lookup
pub async fn handle_band_command(
    client: &RouletteClientImpl,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let band = client.random_band().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&band)?);
    } else {
        print_band(&band);
    }
    Ok(())
}

/// Handle the search command: print the first album result for a band
pub async fn handle_search_command(
    client: &RouletteClientImpl,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let album_url = client.search_album(name).await?;
    println!("{album_url}");
    Ok(())
}

/// Handle the release command: extract and classify one album page
pub async fn handle_release_command(
    client: &RouletteClientImpl,
    config: &RouletteConfig,
    url: &str,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let release = client.release_info(url).await?;
    let classifier = config.classifier();

    if json {
        println!("{}", serde_json::to_string_pretty(&release)?);
        return Ok(());
    }

    print_release(&release);
    match classifier.matching_tag(&release.tags) {
        Some(tag) => println!("\n🤘 Metal (matched tag '{tag}')"),
        None if release.tags.is_empty() => println!("\n❔ No tags, cannot tell"),
        None => println!("\n🙅 Not metal"),
    }
    if let Some(embed) = release.embed_snippet() {
        println!("\n{}", embed.to_html());
    }
    Ok(())
}
