use metal_roulette::{BandRecord, EmbedSnippet, ReleaseInfo};
use std::fs;
use std::path::Path;

/// Print a directory band record
pub fn print_band(band: &BandRecord) {
    println!("🎸 {}", band.name);
    println!("  Country:  {}", band.country_of_origin);
    println!("  Location: {}", band.location);
    println!("  Genre:    {}", band.genre);
    println!("  Themes:   {}", band.lyrical_themes);
    println!("  Label:    {}", band.label);
    println!("  Status:   {}", band.status);
    println!("  Profile:  {}", band.profile_url);
}

/// Print a marketplace release
pub fn print_release(release: &ReleaseInfo) {
    println!("💿 {} by {}", release.album_title, release.band_name);
    println!("  URL:  {}", release.url);
    if release.tags.is_empty() {
        println!("  Tags: (none)");
    } else {
        println!("  Tags: {}", release.tags.join(", "));
    }
}

/// Write a standalone player page
pub fn write_html_page(path: &Path, embed: &EmbedSnippet) -> std::io::Result<()> {
    fs::write(path, embed.to_page())?;
    println!("💾 Player page written to {}", path.display());
    Ok(())
}
