// src/crawl/fetch.rs
// =============================================================================
// Page fetcher: one GET per URL, with timeout, retries and backoff.
//
// Failure policy:
// - Retryable (timeouts, connection errors, 5xx, 429): retried up to
//   `max_retries` times, waiting 500ms, 1s, 2s ... between attempts
// - Terminal (other 4xx, redirect loops): returned immediately
//
// Either way the error comes back as a value. The frontier records it and
// carries on with the next URL; one bad page never ends the crawl.
// =============================================================================

use std::future::Future;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{redirect, Client};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

use crate::config::CrawlConfig;
use crate::error::FetchError;
use crate::extract::extract_hrefs;

const MAX_REDIRECTS: usize = 5;

// A successfully fetched page
#[derive(Debug, Clone)]
pub struct Page {
    /// Final URL after redirects, which can differ from the one requested
    pub url: Url,
    pub status: u16,
    /// Raw response body
    pub body: Vec<u8>,
    /// Body decoded as UTF-8, invalid sequences replaced
    pub text: String,
}

impl Page {
    pub fn new(url: Url, status: u16, body: Vec<u8>) -> Self {
        let text = String::from_utf8_lossy(&body).into_owned();
        Self {
            url,
            status,
            body,
            text,
        }
    }

    // Raw href values of every <a> on the page
    pub fn hrefs(&self) -> Vec<String> {
        extract_hrefs(&self.text)
    }
}

// Anything that can turn a URL into a Page.
//
// The crawler only talks to this trait so tests can swap in an in-memory site.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<Page, FetchError>;
}

// The real fetcher, backed by reqwest
pub struct HttpFetcher {
    client: Client,
    config: CrawlConfig,
    cancel: CancellationToken,
}

impl HttpFetcher {
    pub fn new(config: &CrawlConfig, cancel: CancellationToken) -> Result<Self, reqwest::Error> {
        // Fixed header set that looks like a desktop browser.
        // Some servers refuse or degrade responses for unknown clients.
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(config.timeout)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
            cancel,
        })
    }

    // A single attempt, no retries
    async fn fetch_once(&self, url: &Url) -> Result<Page, FetchError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        // Where redirects ended up; relative links on the page are relative to this
        let final_url = response.url().clone();

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        Ok(Page::new(final_url, status.as_u16(), body.to_vec()))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Page, FetchError> {
        debug!(%url, "GET");
        with_retries(&self.config, &self.cancel, || self.fetch_once(url)).await
    }
}

// Runs `op` until it succeeds, fails terminally, or runs out of retries
//
// Backoff sleeps race against `cancel`, so Ctrl-C never waits out a 30s delay.
pub async fn with_retries<T, F, Fut>(
    config: &CrawlConfig,
    cancel: &CancellationToken,
    mut op: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt: u32 = 0;

    loop {
        let error = match op().await {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };

        if !error.is_retryable() {
            return Err(error);
        }

        if attempt >= config.max_retries {
            return Err(FetchError::RetriesExhausted {
                attempts: attempt + 1,
                last: Box::new(error),
            });
        }

        attempt += 1;
        let delay = config.backoff_delay(attempt);
        warn!(%error, attempt, ?delay, "retrying after failure");

        tokio::select! {
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why is the backoff sleep inside tokio::select!?
//    - A retry can wait up to 30 seconds
//    - Racing the sleep against cancel.cancelled() lets Ctrl-C stop the wait
//      right away instead of after the delay
//
// 2. Why does Page keep the final URL instead of the requested one?
//    - reqwest follows redirects for us, so "/team" may really be "/team/"
//    - Relative links must be resolved against the page they live on, and the
//      frontier checks that a redirect did not leave the seed's host
//
// 3. Why a Fetcher trait?
//    - The frontier only needs "URL in, Page out"
//    - Tests plug in an in-memory site and never touch the network
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn fast_config(max_retries: u32) -> CrawlConfig {
        CrawlConfig {
            max_retries,
            backoff_base: Duration::from_millis(1),
            backoff_cap: Duration::from_millis(5),
            timeout: Duration::from_secs(5),
            ..CrawlConfig::default()
        }
    }

    #[tokio::test]
    async fn test_retry_recovers() {
        let calls = AtomicU32::new(0);
        let cancel = CancellationToken::new();

        let result = with_retries(&fast_config(5), &cancel, || async {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                Err(FetchError::Status { status: 503 })
            } else {
                Ok(n)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_terminal_error_is_not_retried() {
        let calls = AtomicU32::new(0);
        let cancel = CancellationToken::new();

        let result: Result<(), _> = with_retries(&fast_config(5), &cancel, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(FetchError::Status { status: 404 })
        })
        .await;

        assert!(matches!(result, Err(FetchError::Status { status: 404 })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let calls = AtomicU32::new(0);
        let cancel = CancellationToken::new();

        let result: Result<(), _> = with_retries(&fast_config(2), &cancel, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(FetchError::Timeout)
        })
        .await;

        assert!(matches!(
            result,
            Err(FetchError::RetriesExhausted { attempts: 3, .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_cancel_interrupts_backoff() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let config = CrawlConfig {
            backoff_base: Duration::from_secs(60),
            ..CrawlConfig::default()
        };

        let result: Result<(), _> =
            with_retries(&config, &cancel, || async { Err(FetchError::Timeout) }).await;

        assert!(matches!(result, Err(FetchError::Cancelled)));
    }

    #[tokio::test]
    async fn test_fetch_page_from_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/contact")
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body(r#"<a href="/about">About</a> mail: team@example.com"#)
            .create_async()
            .await;

        let fetcher = HttpFetcher::new(&fast_config(0), CancellationToken::new()).unwrap();
        let url = Url::parse(&format!("{}/contact", server.url())).unwrap();
        let page = fetcher.fetch(&url).await.unwrap();

        assert_eq!(page.status, 200);
        assert!(page.text.contains("team@example.com"));
        assert_eq!(page.hrefs(), vec!["/about"]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_sends_browser_user_agent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .match_header("user-agent", mockito::Matcher::Regex("Chrome/".to_string()))
            .with_status(200)
            .with_body("ok")
            .create_async()
            .await;

        let fetcher = HttpFetcher::new(&fast_config(0), CancellationToken::new()).unwrap();
        let url = Url::parse(&format!("{}/", server.url())).unwrap();
        fetcher.fetch(&url).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_is_retried_then_reported() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/flaky")
            .with_status(503)
            .expect(3)
            .create_async()
            .await;

        let fetcher = HttpFetcher::new(&fast_config(2), CancellationToken::new()).unwrap();
        let url = Url::parse(&format!("{}/flaky", server.url())).unwrap();
        let err = fetcher.fetch(&url).await.unwrap_err();

        assert!(matches!(err, FetchError::RetriesExhausted { attempts: 3, .. }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .expect(1)
            .create_async()
            .await;

        let fetcher = HttpFetcher::new(&fast_config(3), CancellationToken::new()).unwrap();
        let url = Url::parse(&format!("{}/missing", server.url())).unwrap();
        let err = fetcher.fetch(&url).await.unwrap_err();

        assert!(matches!(err, FetchError::Status { status: 404 }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_page_url_is_the_redirect_target() {
        let mut server = mockito::Server::new_async().await;
        let moved = server
            .mock("GET", "/team")
            .with_status(301)
            .with_header("location", &format!("{}/team/", server.url()))
            .create_async()
            .await;
        let target = server
            .mock("GET", "/team/")
            .with_status(200)
            .with_body(r#"<a href="people">People</a>"#)
            .create_async()
            .await;

        let fetcher = HttpFetcher::new(&fast_config(0), CancellationToken::new()).unwrap();
        let url = Url::parse(&format!("{}/team", server.url())).unwrap();
        let page = fetcher.fetch(&url).await.unwrap();

        assert_eq!(page.url.path(), "/team/");
        moved.assert_async().await;
        target.assert_async().await;
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily() {
        let url = Url::parse("https://example.com/").unwrap();
        let page = Page::new(url, 200, vec![b'h', b'i', 0xff, b'!']);
        assert_eq!(page.text, "hi\u{fffd}!");
    }
}
