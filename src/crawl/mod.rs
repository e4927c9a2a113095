// src/crawl/mod.rs
// =============================================================================
// This module crawls one website and collects the addresses it publishes.
//
// Submodules:
// - filter: skips URLs whose extension cannot be an HTML page
// - scope: resolves hrefs and keeps the ones on the seed's host
// - fetch: HTTP GET with timeout, retries and backoff
// - events: progress hooks for whoever is driving the crawl
// - session: the frontier and the step loop tying everything together
// =============================================================================

mod events;
mod fetch;
mod filter;
mod scope;
mod session;

pub use events::{CrawlObserver, NoopObserver};
pub use fetch::HttpFetcher;
pub use session::{CrawlSession, CrawlSummary, SessionState};
