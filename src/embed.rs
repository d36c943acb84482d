//! Embeddable player snippets for marketplace releases.

use serde::{Deserialize, Serialize};

/// Player options the marketplace puts in `og:video` by default.
pub const DEFAULT_PLAYER_OPTIONS: &str = "size-large/tracklist=true/artwork-small";

/// Player options for a minimal, transparent skin.
pub const MINIMAL_PLAYER_OPTIONS: &str =
    "linkcol=0f91ff/bgcol=333333/minimal=true/transparent=true";

/// Rewrite a player URL from the page metadata to use the minimal skin.
///
/// Only the fixed default options fragment is replaced; the rest of the URL
/// is left untouched.
///
/// ```rust
/// use metal_roulette::embed::minimal_player_url;
///
/// assert_eq!(
///     minimal_player_url("https://bandcamp.com/EmbeddedPlayer/v=2/album=1/size-large/tracklist=true/artwork-small/"),
///     "https://bandcamp.com/EmbeddedPlayer/v=2/album=1/linkcol=0f91ff/bgcol=333333/minimal=true/transparent=true/"
/// );
/// ```
pub fn minimal_player_url(player_url: &str) -> String {
    player_url.replace(DEFAULT_PLAYER_OPTIONS, MINIMAL_PLAYER_OPTIONS)
}

/// An `<iframe>` wrapping the marketplace player for one release.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmbedSnippet {
    /// Player widget URL
    pub player_url: String,
    /// Album page, linked as fallback content
    pub album_url: String,
    pub album_title: String,
    pub band_name: String,
}

impl EmbedSnippet {
    /// Render the HTML fragment.
    pub fn to_html(&self) -> String {
        format!(
            r#"<iframe style="border: 0; width: 100%; height: 100%;" src="{}" seamless><a href="{}">{} by {}</a></iframe>"#,
            escape_attribute(&self.player_url),
            escape_attribute(&self.album_url),
            escape_text(&self.album_title),
            escape_text(&self.band_name)
        )
    }

    /// Render a standalone page showing the player in a 450x450 frame.
    pub fn to_page(&self) -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{} by {}</title>\n</head>\n<body style=\"background: #333333;\">\n<div style=\"width: 450px; height: 450px;\">\n{}\n</div>\n</body>\n</html>\n",
            escape_text(&self.album_title),
            escape_text(&self.band_name),
            self.to_html()
        )
    }
}

impl std::fmt::Display for EmbedSnippet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_html())
    }
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

// Only quotes can break out of the attribute; URLs are otherwise kept verbatim.
fn escape_attribute(value: &str) -> String {
    value.replace('"', "&quot;")
}
