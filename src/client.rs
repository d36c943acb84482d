use crate::headers::add_get_headers;
use crate::parsing::RouletteParser;
use crate::{BandRecord, ReleaseInfo, Result, RouletteClient, RouletteConfig, RouletteError};
use async_trait::async_trait;
use http_client::{HttpClient, Request};
use http_types::{Method, Url};
use scraper::Html;
use std::fs;
use std::path::Path;

/// Maximum number of redirects followed for one page.
const MAX_REDIRECTS: u32 = 5;

/// A fetched HTML page and the URL it was finally served from.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after following redirects
    pub url: String,
    pub body: String,
}

/// Scraping client for the directory and marketplace sites.
///
/// This client fetches pages through any [`HttpClient`] implementation and
/// hands them to [`RouletteParser`]. It holds no session state; every lookup
/// is one (or, with redirects, a few) independent GET requests.
///
/// # Examples
///
/// ```rust,no_run
/// use metal_roulette::{RouletteClient, RouletteClientImpl, Result};
///
/// #[tokio::main]
/// async fn main() -> Result<()> {
///     let http_client = http_client::native::NativeClient::new();
///     let client = RouletteClientImpl::new(Box::new(http_client));
///
///     let band = client.random_band().await?;
///     let album_url = client.search_album(&band.name).await?;
///     let release = client.release_info(&album_url).await?;
///     println!("{} - {} {:?}", release.band_name, release.album_title, release.tags);
///
///     Ok(())
/// }
/// ```
pub struct RouletteClientImpl {
    client: Box<dyn HttpClient>,
    directory_url: String,
    marketplace_url: String,
    debug_save_responses: bool,
    parser: RouletteParser,
}

impl RouletteClientImpl {
    /// Create a new client against the default directory and marketplace.
    pub fn new(client: Box<dyn HttpClient>) -> Self {
        Self::with_config(client, &RouletteConfig::default())
    }

    /// Create a client using the service URLs and debug settings of `config`.
    ///
    /// Custom base URLs are useful for testing against local fixtures.
    pub fn with_config(client: Box<dyn HttpClient>, config: &RouletteConfig) -> Self {
        Self {
            client,
            directory_url: config.directory_url.trim_end_matches('/').to_string(),
            marketplace_url: config.marketplace_url.trim_end_matches('/').to_string(),
            debug_save_responses: config.debug_save_responses,
            parser: RouletteParser::new(),
        }
    }

    /// URL of the directory's random band page.
    pub fn random_band_url(&self) -> String {
        format!("{}/band/random", self.directory_url)
    }

    /// Album search URL for a band name; spaces are sent as `+`.
    pub fn search_url(&self, band_name: &str) -> String {
        let query = urlencoding::encode(band_name.trim()).replace("%20", "+");
        format!("{}/search?q={query}&item_type=a", self.marketplace_url)
    }

    /// GET a page, following redirects, and return its body.
    ///
    /// Non-success statuses are reported as [`RouletteError::Http`].
    pub async fn get_page(&self, url: &str) -> Result<FetchedPage> {
        let mut current = Url::parse(url)
            .map_err(|e| RouletteError::Http(format!("Invalid URL '{url}': {e}")))?;
        let mut referer: Option<String> = None;

        for redirect_count in 0..=MAX_REDIRECTS {
            let mut request = Request::new(Method::Get, current.clone());
            add_get_headers(&mut request, referer.as_deref());

            log::debug!("GET {current}");
            let mut response = self
                .client
                .send(request)
                .await
                .map_err(|e| RouletteError::Http(e.to_string()))?;
            let status = response.status();

            if status.is_redirection() {
                let location = response
                    .header("Location")
                    .map(|values| values.as_str().to_string())
                    .ok_or_else(|| {
                        RouletteError::Http(format!("Redirect from {current} without Location"))
                    })?;
                let next = current
                    .join(&location)
                    .map_err(|e| RouletteError::Http(format!("Bad redirect '{location}': {e}")))?;
                log::debug!("Redirect {} of {MAX_REDIRECTS}: {current} -> {next}", redirect_count + 1);
                referer = Some(current.to_string());
                current = next;
                continue;
            }

            let body = response
                .body_string()
                .await
                .map_err(|e| RouletteError::Http(e.to_string()))?;

            if self.debug_save_responses {
                self.save_debug_response(current.as_str(), status.into(), &body);
            }

            if !status.is_success() {
                return Err(RouletteError::Http(format!(
                    "{current} returned status {}",
                    u16::from(status)
                )));
            }

            return Ok(FetchedPage {
                url: current.to_string(),
                body,
            });
        }

        Err(RouletteError::Http(format!("Too many redirects for {url}")))
    }

    /// Save response to debug directory (optional debug feature)
    fn save_debug_response(&self, url: &str, status_code: u16, body: &str) {
        if let Err(e) = self.try_save_debug_response(url, status_code, body) {
            log::warn!("Failed to save debug response: {e}");
        }
    }

    fn try_save_debug_response(&self, url: &str, status_code: u16, body: &str) -> Result<()> {
        let debug_dir = Path::new("debug_responses");
        fs::create_dir_all(debug_dir)?;

        let url_path = url
            .trim_start_matches("https://")
            .trim_start_matches("http://");
        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S_%3f");
        let safe_path = url_path.replace(['/', '?', '&', '=', '%', '+', ':'], "_");

        let file_path = debug_dir.join(format!("{timestamp}_{safe_path}_status{status_code}.html"));
        fs::write(&file_path, body)?;

        log::debug!("Saved debug response to {}", file_path.display());
        Ok(())
    }
}

#[async_trait(?Send)]
impl RouletteClient for RouletteClientImpl {
    async fn random_band(&self) -> Result<BandRecord> {
        let page = self
            .get_page(&self.random_band_url())
            .await
            .map_err(|e| RouletteError::Fetch(e.to_string()))?;

        let document = Html::parse_document(&page.body);
        let band = self.parser.parse_band_page(&document, &page.url)?;
        log::info!("Random band: {} ({}, {})", band.name, band.genre, band.country_of_origin);
        Ok(band)
    }

    async fn search_album(&self, band_name: &str) -> Result<String> {
        if band_name.trim().is_empty() {
            return Err(RouletteError::Search("Band name is empty".to_string()));
        }

        let page = self
            .get_page(&self.search_url(band_name))
            .await
            .map_err(|e| RouletteError::Search(format!("Unable to fetch search results: {e}")))?;

        let document = Html::parse_document(&page.body);
        let album_url = self.parser.parse_search_results(&document)?;
        log::info!("First album result for '{band_name}': {album_url}");
        Ok(album_url)
    }

    async fn release_info(&self, album_url: &str) -> Result<ReleaseInfo> {
        let page = self
            .get_page(album_url)
            .await
            .map_err(|e| RouletteError::Extraction(format!("Unable to fetch release page: {e}")))?;

        let document = Html::parse_document(&page.body);
        self.parser.parse_release_page(&document, album_url)
    }
}
