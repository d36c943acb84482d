//! HTML parsing utilities for directory and marketplace pages.
//!
//! This module contains the extraction logic for the three pages the search
//! loop looks at: the directory's random band page, the marketplace search
//! results, and a marketplace release page. These are pure functions that
//! take parsed HTML documents and return structured data. Both sites can
//! change their markup at any time; the selectors below are the whole contract.

use crate::embed::minimal_player_url;
use crate::types::UNKNOWN;
use crate::{BandRecord, ReleaseInfo, Result, RouletteError};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

/// Marker that starts the tracking suffix on marketplace search result links.
pub const TRACKING_MARKER: &str = "?from";

/// Strip the tracking suffix (everything from `?from`) from a result URL.
///
/// Stripping is idempotent: a URL without the marker is returned unchanged.
///
/// ```rust
/// use metal_roulette::parsing::strip_tracking_suffix;
///
/// assert_eq!(strip_tracking_suffix("http://x/a?from=search"), "http://x/a");
/// assert_eq!(strip_tracking_suffix("http://x/a"), "http://x/a");
/// ```
pub fn strip_tracking_suffix(url: &str) -> &str {
    match url.find(TRACKING_MARKER) {
        Some(index) => &url[..index],
        None => url,
    }
}

/// Parser for directory and marketplace pages.
///
/// Stateless; it exists so the client can hold one and tests can call the
/// parsing steps without any HTTP involved.
#[derive(Debug, Clone, Default)]
pub struct RouletteParser;

impl RouletteParser {
    /// Create a new parser instance.
    pub fn new() -> Self {
        Self
    }

    /// Parse the directory's band page into a [`BandRecord`].
    ///
    /// The `h1.band_name` heading is required; its absence means the page is
    /// not a band page (error page, captcha...) and yields [`RouletteError::Fetch`].
    /// Detail fields that cannot be found are set to `"Unknown"`.
    pub fn parse_band_page(&self, document: &Html, page_url: &str) -> Result<BandRecord> {
        let heading_selector = Selector::parse("h1.band_name").unwrap();
        let heading = document
            .select(&heading_selector)
            .next()
            .ok_or_else(|| RouletteError::Fetch("Band name heading not found".to_string()))?;

        let name = element_text(&heading);
        if name.is_empty() {
            return Err(RouletteError::Fetch("Band name heading is empty".to_string()));
        }

        let link_selector = Selector::parse("a[href]").unwrap();
        let profile_url = heading
            .select(&link_selector)
            .next()
            .and_then(|link| link.value().attr("href"))
            .map(str::to_string)
            .unwrap_or_else(|| page_url.to_string());

        let details = self.extract_band_details(document);
        log::debug!("Parsed band '{name}' with {} detail fields", details.len());

        let detail = |keys: &[&str]| {
            keys.iter()
                .find_map(|key| details.get(*key))
                .cloned()
                .unwrap_or_else(|| UNKNOWN.to_string())
        };

        Ok(BandRecord {
            name,
            country_of_origin: detail(&["country of origin"]),
            location: detail(&["location"]),
            genre: detail(&["genre"]),
            lyrical_themes: detail(&["themes", "lyrical themes"]),
            label: detail(&["current label", "last label"]),
            status: detail(&["status"]),
            profile_url,
        })
    }

    /// Collect `dt`/`dd` pairs from the two band stats lists.
    ///
    /// Keys are lower-cased with the trailing colon removed.
    fn extract_band_details(&self, document: &Html) -> HashMap<String, String> {
        let mut details = HashMap::new();
        let dt_selector = Selector::parse("dt").unwrap();
        let dd_selector = Selector::parse("dd").unwrap();

        for section in ["dl.float_left", "dl.float_right"] {
            let section_selector = Selector::parse(section).unwrap();
            let Some(list) = document.select(&section_selector).next() else {
                log::debug!("Band page has no {section} section");
                continue;
            };

            for (dt, dd) in list.select(&dt_selector).zip(list.select(&dd_selector)) {
                let key = element_text(&dt)
                    .trim_end_matches(':')
                    .trim()
                    .to_lowercase();
                let value = element_text(&dd);
                if !key.is_empty() && !value.is_empty() {
                    details.insert(key, value);
                }
            }
        }

        details
    }

    /// Find the first album result on a marketplace search page.
    ///
    /// Returns the result link with its tracking suffix stripped.
    pub fn parse_search_results(&self, document: &Html) -> Result<String> {
        let result_selector = Selector::parse("li.searchresult.data-search").unwrap();
        let link_selector = Selector::parse("a[href]").unwrap();

        let result = document
            .select(&result_selector)
            .next()
            .ok_or_else(|| RouletteError::Search("No search results found".to_string()))?;

        let href = result
            .select(&link_selector)
            .next()
            .and_then(|link| link.value().attr("href"))
            .ok_or_else(|| RouletteError::Search("Album URL not found".to_string()))?;

        let album_url = strip_tracking_suffix(href.trim());
        if album_url.is_empty() {
            return Err(RouletteError::Search("Album URL is empty".to_string()));
        }

        Ok(album_url.to_string())
    }

    /// Extract band, album, tags and player URL from a release page.
    ///
    /// Band and album names are all-or-nothing: if either is missing the
    /// whole extraction fails with [`RouletteError::Extraction`]. Missing
    /// tags or player metadata are not errors.
    pub fn parse_release_page(&self, document: &Html, url: &str) -> Result<ReleaseInfo> {
        let (band_name, album_title) = self.extract_band_and_album(document).ok_or_else(|| {
            RouletteError::Extraction("Could not extract band and/or album name".to_string())
        })?;

        let tags = self.extract_tags(document);
        if tags.is_empty() {
            log::info!("No tags found on {url}");
        }

        let embed_url = self.extract_embed_url(document);
        if embed_url.is_none() {
            log::debug!("No player metadata on {url}");
        }

        Ok(ReleaseInfo {
            url: url.to_string(),
            band_name,
            album_title,
            tags,
            embed_url,
        })
    }

    /// Read `(band, album)` from the release header.
    pub fn extract_band_and_album(&self, document: &Html) -> Option<(String, String)> {
        let album_selector = Selector::parse("h2.trackTitle").unwrap();
        let band_selector = Selector::parse(r#"h3[style="margin:0px;"]"#).unwrap();
        let link_selector = Selector::parse("a").unwrap();

        let album_title = document
            .select(&album_selector)
            .next()
            .map(|e| element_text(&e))
            .filter(|t| !t.is_empty())?;

        let band_name = document
            .select(&band_selector)
            .next()?
            .select(&link_selector)
            .next()
            .map(|e| element_text(&e))
            .filter(|t| !t.is_empty())?;

        Some((band_name, album_title))
    }

    /// Tag labels in page order.
    pub fn extract_tags(&self, document: &Html) -> Vec<String> {
        let tag_selector = Selector::parse("a.tag").unwrap();
        document
            .select(&tag_selector)
            .map(|e| element_text(&e))
            .collect()
    }

    /// Player URL from the `og:video` metadata, rewritten to the minimal skin.
    pub fn extract_embed_url(&self, document: &Html) -> Option<String> {
        let meta_selector = Selector::parse(r#"meta[property="og:video"]"#).unwrap();
        document
            .select(&meta_selector)
            .next()
            .and_then(|meta| meta.value().attr("content"))
            .map(|content| minimal_player_url(content.trim()))
    }
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELEASE_PAGE: &str = r#"
        <html><head>
          <meta property="og:video" content="https://bandcamp.com/EmbeddedPlayer/v=2/album=1234/size-large/tracklist=true/artwork-small/">
        </head><body>
          <div id="name-section">
            <h2 class="trackTitle">
                Where Shadows Forever Reign
            </h2>
            <h3 style="margin:0px;">by <span><a href="https://darkfuneral.bandcamp.com">Dark Funeral</a></span></h3>
          </div>
          <div class="tralbumData tralbum-tags">
            <a class="tag" href="/tag/black-metal">black metal</a>
            <a class="tag" href="/tag/metal">metal</a>
            <a class="tag" href="/tag/metal">metal</a>
            <a class="tag" href="/tag/sweden">Sweden</a>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_strip_tracking_suffix() {
        assert_eq!(strip_tracking_suffix("http://x/a?from=search"), "http://x/a");
        assert_eq!(
            strip_tracking_suffix("https://b.bandcamp.com/album/x?from=search&search_item_id=1"),
            "https://b.bandcamp.com/album/x"
        );
    }

    #[test]
    fn test_strip_tracking_suffix_is_idempotent() {
        let once = strip_tracking_suffix("http://x/a?from=search");
        assert_eq!(strip_tracking_suffix(once), once);
        assert_eq!(strip_tracking_suffix("http://x/a?id=3"), "http://x/a?id=3");
    }

    #[test]
    fn test_parse_release_page() {
        let parser = RouletteParser::new();
        let document = Html::parse_document(RELEASE_PAGE);
        let info = parser
            .parse_release_page(&document, "https://darkfuneral.bandcamp.com/album/x")
            .unwrap();

        assert_eq!(info.band_name, "Dark Funeral");
        assert_eq!(info.album_title, "Where Shadows Forever Reign");
        assert_eq!(info.tags, vec!["black metal", "metal", "metal", "Sweden"]);
        assert_eq!(
            info.embed_url.as_deref(),
            Some("https://bandcamp.com/EmbeddedPlayer/v=2/album=1234/linkcol=0f91ff/bgcol=333333/minimal=true/transparent=true/")
        );
    }

    #[test]
    fn test_missing_album_title_fails_whole_extraction() {
        let parser = RouletteParser::new();
        let html = RELEASE_PAGE.replace("h2 class=\"trackTitle\"", "h2 class=\"other\"");
        let document = Html::parse_document(&html);

        assert_eq!(parser.extract_band_and_album(&document), None);
        assert!(matches!(
            parser.parse_release_page(&document, "u"),
            Err(RouletteError::Extraction(_))
        ));
    }

    #[test]
    fn test_missing_band_link_fails_whole_extraction() {
        let parser = RouletteParser::new();
        let html = r#"<h2 class="trackTitle">Album</h2><h3 style="margin:0px;">by nobody</h3>"#;
        let document = Html::parse_document(html);
        assert_eq!(parser.extract_band_and_album(&document), None);
    }

    #[test]
    fn test_release_without_tags_or_player() {
        let parser = RouletteParser::new();
        let html = r#"<h2 class="trackTitle">Album</h2><h3 style="margin:0px;">by <a href="/">Band</a></h3>"#;
        let info = parser
            .parse_release_page(&Html::parse_document(html), "u")
            .unwrap();
        assert!(info.tags.is_empty());
        assert_eq!(info.embed_url, None);
    }

    #[test]
    fn test_parse_search_results_takes_first_result() {
        let parser = RouletteParser::new();
        let html = r#"
            <ul class="result-items">
              <li class="searchresult data-search">
                <div class="heading"><a href="https://first.bandcamp.com/album/one?from=search&amp;search_item_id=1">One</a></div>
              </li>
              <li class="searchresult data-search">
                <div class="heading"><a href="https://second.bandcamp.com/album/two?from=search">Two</a></div>
              </li>
            </ul>"#;
        let url = parser
            .parse_search_results(&Html::parse_document(html))
            .unwrap();
        assert_eq!(url, "https://first.bandcamp.com/album/one");
    }

    #[test]
    fn test_parse_search_results_errors() {
        let parser = RouletteParser::new();

        let empty = Html::parse_document("<ul class=\"result-items\"></ul>");
        match parser.parse_search_results(&empty) {
            Err(RouletteError::Search(msg)) => assert_eq!(msg, "No search results found"),
            other => panic!("Expected search error, got: {other:?}"),
        }

        let no_link = Html::parse_document(
            "<ul><li class=\"searchresult data-search\"><div>No link</div></li></ul>",
        );
        match parser.parse_search_results(&no_link) {
            Err(RouletteError::Search(msg)) => assert_eq!(msg, "Album URL not found"),
            other => panic!("Expected search error, got: {other:?}"),
        }
    }

    #[test]
    fn test_parse_band_page_requires_heading() {
        let parser = RouletteParser::new();
        let document = Html::parse_document("<html><body><h1>Error 403</h1></body></html>");
        assert!(matches!(
            parser.parse_band_page(&document, "https://www.metal-archives.com/band/random"),
            Err(RouletteError::Fetch(_))
        ));
    }

    #[test]
    fn test_parse_band_page_without_details() {
        let parser = RouletteParser::new();
        let document =
            Html::parse_document(r#"<h1 class="band_name">Sarcófago</h1>"#);
        let band = parser
            .parse_band_page(&document, "https://www.metal-archives.com/bands/Sarcofago/1")
            .unwrap();
        assert_eq!(band.name, "Sarcófago");
        assert_eq!(band.genre, UNKNOWN);
        assert_eq!(band.profile_url, "https://www.metal-archives.com/bands/Sarcofago/1");
    }
}
