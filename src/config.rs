// src/config.rs
// =============================================================================
// Runtime settings for a crawl.
//
// Every knob has a default so library code (and tests) can build a config
// with `CrawlConfig::default()` and override just what they need. The CLI
// maps its flags onto this struct in main.rs.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

// Browser-identifying User-Agent sent with every request.
// Some sites answer bare HTTP clients with 403s or empty pages.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Ubuntu Chromium/78.0.3904.70 Chrome/78.0.3904.70 Safari/537.36";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_RETRIES: u32 = 5;
pub const DEFAULT_BACKOFF_BASE_MS: u64 = 500;
pub const DEFAULT_BACKOFF_CAP_SECS: u64 = 30;

// Which URL relative hrefs are resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkBase {
    /// Resolve against the URL of the page the link was found on
    #[default]
    Page,
    /// Resolve against the seed URL of the session, whatever page the link is on
    Seed,
}

// Settings shared by every session started from one command invocation
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Per-request timeout
    pub timeout: Duration,
    /// Extra attempts after the first one for retryable failures
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each further attempt
    pub backoff_base: Duration,
    /// Upper bound for a single backoff delay
    pub backoff_cap: Duration,
    pub user_agent: String,
    /// Directory the .csv / .txt artifacts are written into
    pub output_dir: PathBuf,
    pub link_base: LinkBase,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base: Duration::from_millis(DEFAULT_BACKOFF_BASE_MS),
            backoff_cap: Duration::from_secs(DEFAULT_BACKOFF_CAP_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            output_dir: PathBuf::from("."),
            link_base: LinkBase::default(),
        }
    }
}

impl CrawlConfig {
    // Delay to wait before retry number `attempt` (1-based).
    //
    // 500ms, 1s, 2s, 4s ... capped at `backoff_cap`
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let delay = self.backoff_base.saturating_mul(2u32.pow(exponent));
        delay.min(self.backoff_cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles() {
        let config = CrawlConfig::default();
        assert_eq!(config.backoff_delay(1), Duration::from_millis(500));
        assert_eq!(config.backoff_delay(2), Duration::from_millis(1000));
        assert_eq!(config.backoff_delay(3), Duration::from_millis(2000));
    }

    #[test]
    fn test_backoff_is_capped() {
        let config = CrawlConfig::default();
        assert_eq!(config.backoff_delay(20), Duration::from_secs(30));
        assert_eq!(config.backoff_delay(u32::MAX), Duration::from_secs(30));
    }
}
