// src/crawl/session.rs
// =============================================================================
// The frontier manager: one CrawlSession per seed website.
//
// How it works:
// 1. Start with the seed URL in the frontier
// 2. Take the next URL off the frontier and mark it processed
// 3. Fetch it (failures are recorded and skipped, never fatal). A redirect
//    that leaves the seed's host counts as a failure.
// 4. Resolve its links, keep the in-scope fetchable ones we have not seen
// 5. Extract addresses from the raw text, emit the new ones right away
// 6. Repeat until the frontier is empty (or the cancel token fires)
// 7. Hand the visited set to the sink
//
// Invariants, true between any two steps:
// - a URL is in at most one of `processed` / `unprocessed`
// - every queued URL has the seed's netloc
// - email_count() == found_emails.len(), and it never goes down
//
// All of this state lives in the session value. Two sessions never share
// anything, so running several seeds side by side is safe.
// =============================================================================

use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use super::events::CrawlObserver;
use super::fetch::{Fetcher, Page};
use super::{filter, scope};
use crate::config::LinkBase;
use crate::error::{CrawlError, FetchError};
use crate::extract::{extract_emails, normalize_email};
use crate::sink::ResultSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Frontier is non-empty
    Running,
    /// Frontier exhausted
    Done,
    /// Stopped early by the cancel token
    Cancelled,
}

// A URL that was taken off the frontier but could not be fetched
#[derive(Debug, Clone, Serialize)]
pub struct FailedUrl {
    pub url: String,
    pub reason: String,
}

// What a finished session reports
#[derive(Debug, Clone, Serialize)]
pub struct CrawlSummary {
    pub seed: String,
    pub domain: String,
    pub outcome: SessionState,
    pub pages_visited: usize,
    pub emails_found: usize,
    pub emails: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<FailedUrl>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<PathBuf>,
}

pub struct CrawlSession {
    seed: Url,
    domain: String,
    link_base: LinkBase,
    processed: HashSet<String>,
    // Frontier order (FIFO) plus a set for O(1) membership checks
    unprocessed: VecDeque<Url>,
    queued: HashSet<String>,
    found_emails: HashSet<String>,
    failed: Vec<FailedUrl>,
    state: SessionState,
}

impl CrawlSession {
    // Creates a session whose frontier holds only the seed
    //
    // The seed must be an absolute http(s) URL with a host.
    pub fn new(seed: &str, link_base: LinkBase) -> Result<Self, CrawlError> {
        let invalid = |reason: &str| CrawlError::InvalidSeed {
            url: seed.to_string(),
            reason: reason.to_string(),
        };

        let mut seed_url = Url::parse(seed.trim()).map_err(|e| invalid(&e.to_string()))?;
        if seed_url.scheme() != "http" && seed_url.scheme() != "https" {
            return Err(invalid("only http and https are supported"));
        }
        let domain = scope::netloc(&seed_url).ok_or_else(|| invalid("URL has no host"))?;
        seed_url.set_fragment(None);

        let mut queued = HashSet::new();
        queued.insert(seed_url.to_string());

        Ok(Self {
            unprocessed: VecDeque::from([seed_url.clone()]),
            seed: seed_url,
            domain,
            link_base,
            processed: HashSet::new(),
            queued,
            found_emails: HashSet::new(),
            failed: Vec::new(),
            state: SessionState::Running,
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn email_count(&self) -> usize {
        self.found_emails.len()
    }

    // Crawls until the frontier is empty or `cancel` fires, then finalizes
    //
    // Only sink failures end the session with an error. Fetch failures are
    // collected in the summary.
    pub async fn run(
        &mut self,
        fetcher: &dyn Fetcher,
        sink: &mut dyn ResultSink,
        observer: &dyn CrawlObserver,
        cancel: &CancellationToken,
    ) -> Result<CrawlSummary, CrawlError> {
        info!(seed = %self.seed, domain = %self.domain, "starting crawl");
        observer.on_session_started(&self.seed, &self.domain);

        while self.state == SessionState::Running {
            if cancel.is_cancelled() {
                info!(seed = %self.seed, "crawl cancelled");
                self.state = SessionState::Cancelled;
                break;
            }
            self.step(fetcher, sink, observer).await?;
        }

        self.finish(sink, observer)
    }

    // One crawl iteration: exactly one URL moves from unprocessed to processed
    pub async fn step(
        &mut self,
        fetcher: &dyn Fetcher,
        sink: &mut dyn ResultSink,
        observer: &dyn CrawlObserver,
    ) -> Result<SessionState, CrawlError> {
        let Some(url) = self.unprocessed.pop_front() else {
            self.state = SessionState::Done;
            return Ok(self.state);
        };

        // Marked processed before its links are read, so a page linking to
        // itself cannot put itself back on the frontier
        let key = url.to_string();
        self.queued.remove(&key);
        self.processed.insert(key.clone());

        observer.on_url_started(&url, self.unprocessed.len());

        let fetched = fetcher
            .fetch(&url)
            .await
            .and_then(|page| self.accept_redirect(&url, page));

        match fetched {
            Ok(page) => {
                debug!(%url, status = page.status, bytes = page.body.len(), "fetched");
                let added = self.enqueue_links(&page);
                debug!(%url, added, queued = self.unprocessed.len(), "links discovered");
                self.record_emails(&page, sink, observer)?;
            }
            Err(error) => {
                warn!(%url, %error, "skipping URL");
                observer.on_url_failed(&url, &error);
                self.failed.push(FailedUrl {
                    url: key,
                    reason: error.to_string(),
                });
            }
        }

        if self.unprocessed.is_empty() {
            self.state = SessionState::Done;
        }
        Ok(self.state)
    }

    // Checks where a redirected fetch ended up
    //
    // Off-site targets are rejected. An on-site target counts as processed too,
    // so a later link to it is not fetched a second time.
    fn accept_redirect(&mut self, requested: &Url, page: Page) -> Result<Page, FetchError> {
        if page.url == *requested {
            return Ok(page);
        }

        if scope::netloc(&page.url).as_deref() != Some(self.domain.as_str()) {
            return Err(FetchError::OutOfScopeRedirect {
                to: page.url.to_string(),
            });
        }

        let key = page.url.to_string();
        debug!(from = %requested, to = %key, "followed redirect");
        if self.queued.remove(&key) {
            self.unprocessed.retain(|queued| queued.as_str() != key);
        }
        self.processed.insert(key);
        Ok(page)
    }

    // Scope, then extension filter, then dedup against both sets
    fn enqueue_links(&mut self, page: &Page) -> usize {
        let base = match self.link_base {
            LinkBase::Page => &page.url,
            LinkBase::Seed => &self.seed,
        };
        let hrefs = page.hrefs();
        let mut links: Vec<Url> =
            scope::normalize(base, &self.domain, hrefs.iter().map(String::as_str))
                .into_iter()
                .collect();
        links.sort();

        let mut added = 0;
        for link in links {
            if !filter::is_fetchable(&link) {
                debug!(url = %link, "skipping non-HTML extension");
                continue;
            }

            let key = link.to_string();
            if self.processed.contains(&key) || self.queued.contains(&key) {
                continue;
            }

            self.queued.insert(key);
            self.unprocessed.push_back(link);
            added += 1;
        }
        added
    }

    // Emits addresses not seen earlier in this session.
    //
    // An address is only recorded as found after the sink accepted it.
    fn record_emails(
        &mut self,
        page: &Page,
        sink: &mut dyn ResultSink,
        observer: &dyn CrawlObserver,
    ) -> Result<(), CrawlError> {
        for raw in extract_emails(&page.text) {
            let email = normalize_email(&raw);
            if self.found_emails.contains(&email) {
                continue;
            }

            sink.emit_email(&email)?;
            self.found_emails.insert(email.clone());
            info!(url = %page.url, %email, count = self.found_emails.len(), "email found");
            observer.on_email_found(&email, self.found_emails.len());
        }
        Ok(())
    }

    fn finish(
        &mut self,
        sink: &mut dyn ResultSink,
        observer: &dyn CrawlObserver,
    ) -> Result<CrawlSummary, CrawlError> {
        let mut visited: Vec<String> = self.processed.iter().cloned().collect();
        visited.sort();
        sink.finalize(&visited)?;

        let mut emails: Vec<String> = self.found_emails.iter().cloned().collect();
        emails.sort();

        let summary = CrawlSummary {
            seed: self.seed.to_string(),
            domain: self.domain.clone(),
            outcome: self.state,
            pages_visited: self.processed.len(),
            emails_found: self.email_count(),
            emails,
            failed: self.failed.clone(),
            artifacts: sink.artifact_paths(),
        };

        info!(
            seed = %summary.seed,
            pages = summary.pages_visited,
            emails = summary.emails_found,
            failed = summary.failed.len(),
            "crawl finished"
        );
        observer.on_session_complete(&summary);
        Ok(summary)
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why a VecDeque AND a `queued` HashSet?
//    - The VecDeque gives FIFO order, so the crawl is breadth-first
//    - Checking "is this URL already waiting?" on a VecDeque is a linear scan
//    - The set answers that in O(1); the two are always updated together
//
// 2. Why mark a URL processed when it is popped, not after the fetch?
//    - A page that links to itself would otherwise be queued again
//    - A URL that fails is also done for this session; we never retry it later
//
// 3. Why check where a redirect ended up?
//    - "/team" -> "/team/" changes the base for relative links
//    - A redirect to another host would pull that site's addresses into
//      this domain's output, so it is recorded as a failure instead
// -----------------------------------------------------------------------------
