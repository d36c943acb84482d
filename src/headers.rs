use http_client::Request;

/// Common Chrome user agent string for all requests
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36";

/// Common Chrome headers for security info
const SEC_CH_UA: &str =
    "\"Not)A;Brand\";v=\"8\", \"Chromium\";v=\"138\", \"Google Chrome\";v=\"138\"";
const SEC_CH_UA_MOBILE: &str = "?0";
const SEC_CH_UA_PLATFORM: &str = "\"Linux\"";

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";

/// Add common browser headers to a request.
///
/// The directory service answers bare clients with an error page, so every
/// request looks like a regular browser navigation.
pub fn add_common_headers(request: &mut Request) {
    let _ = request.insert_header("User-Agent", USER_AGENT);
    let _ = request.insert_header("Accept-Language", "en-US,en;q=0.9");
    let _ = request.insert_header("DNT", "1");
    let _ = request.insert_header("Connection", "keep-alive");
    let _ = request.insert_header("sec-ch-ua", SEC_CH_UA);
    let _ = request.insert_header("sec-ch-ua-mobile", SEC_CH_UA_MOBILE);
    let _ = request.insert_header("sec-ch-ua-platform", SEC_CH_UA_PLATFORM);
}

/// Add headers for a page GET, optionally with the page we came from.
pub fn add_get_headers(request: &mut Request, referer_url: Option<&str>) {
    add_common_headers(request);
    let _ = request.insert_header("Accept", ACCEPT_HTML);
    let _ = request.insert_header("Upgrade-Insecure-Requests", "1");

    if let Some(referer) = referer_url {
        let _ = request.insert_header("Referer", referer);
    }
}
