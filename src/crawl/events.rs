// src/crawl/events.rs
// =============================================================================
// Progress hooks.
//
// The crawler never prints anything itself. It reports what it is doing to a
// CrawlObserver and the caller decides what to show: main.rs prints console
// lines, tests record events, a UI could stream them.
//
// All methods have empty default bodies so an observer only implements what
// it cares about.
// =============================================================================

use url::Url;

use super::session::CrawlSummary;
use crate::error::FetchError;

pub trait CrawlObserver: Send + Sync {
    /// A session is about to take its first step
    fn on_session_started(&self, _seed: &Url, _domain: &str) {}

    /// A URL was taken off the frontier and is about to be fetched
    fn on_url_started(&self, _url: &Url, _queued: usize) {}

    /// A new address was admitted; `count` is the running total
    fn on_email_found(&self, _email: &str, _count: usize) {}

    /// A URL could not be fetched and was skipped
    fn on_url_failed(&self, _url: &Url, _error: &FetchError) {}

    /// The session ended (frontier exhausted or cancelled)
    fn on_session_complete(&self, _summary: &CrawlSummary) {}
}

// Observer that ignores everything
pub struct NoopObserver;

impl CrawlObserver for NoopObserver {}
