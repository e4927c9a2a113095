// src/crawl/scope.rs
// =============================================================================
// Scope normalizer: turns raw hrefs into absolute URLs on the seed's host.
//
// For each href on a page:
// 1. Drop things that are not navigation (mailto:, tel:, javascript:, #top)
// 2. Resolve it against a base URL (the page, or the seed; see LinkBase)
// 3. Strip the #fragment, so /about and /about#team are the same page
// 4. Keep it only if its network location (host + port) equals the seed's
//
// Subdomains are a different network location: crawling https://example.com
// never follows links to https://blog.example.com.
// =============================================================================

use std::collections::HashSet;

use url::Url;

// host[:port] of a URL, the unit of scope.
//
// The url crate already drops default ports, so https://example.com:443/
// and https://example.com/ share a netloc.
pub fn netloc(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

// Resolves `hrefs` against `base` and keeps the ones inside `domain`
//
// Parameters:
//   base: URL relative links are resolved against
//   domain: netloc of the seed
//   hrefs: raw href attribute values
//
// Returns: deduplicated absolute URLs inside the domain
pub fn normalize<'a, I>(base: &Url, domain: &str, hrefs: I) -> HashSet<Url>
where
    I: IntoIterator<Item = &'a str>,
{
    hrefs
        .into_iter()
        .filter_map(|href| resolve_link(base, href))
        .filter(|url| netloc(url).as_deref() == Some(domain))
        .collect()
}

// Resolves a possibly-relative link to an absolute http(s) URL without fragment
fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    // Skip anchors and special protocols
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
        || href.starts_with("data:")
    {
        return None;
    }

    let mut url = base.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    url.set_fragment(None);
    Some(url)
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why compare host AND port?
//    - http://localhost:8080 and http://localhost:9090 can be different sites
//    - The output files are named after the netloc too, so one seed maps to
//      exactly one pair of files
//
// 2. Why a HashSet<Url> as the result?
//    - A page often links the same place several times (header, footer, body)
//    - The frontier still checks its own sets; this only trims the batch
// -----------------------------------------------------------------------------
