// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - crawl: crawl one or more websites and collect their email addresses
// - extract: run the email extractor over a local file (or stdin)
// =============================================================================

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS};

#[derive(Parser, Debug)]
#[command(
    name = "email-crawler",
    version = "0.1.0",
    about = "Crawl a website and collect the email addresses it publishes",
    long_about = "email-crawler follows every link that stays on the seed's host, skips files \
                  that cannot be HTML pages, and writes each new address to <domain>.csv as soon \
                  as it is found. The list of visited pages goes to <domain>.txt at the end."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl websites and collect email addresses
    ///
    /// Example: email-crawler crawl https://example.com --output-dir leads/
    Crawl {
        /// Seed URLs, one session per URL (e.g., https://example.com)
        #[arg(required_unless_present = "seed_file")]
        seeds: Vec<String>,

        /// File with one seed URL per line (blank lines and # comments ignored)
        #[arg(long)]
        seed_file: Option<PathBuf>,

        /// Directory for the <domain>.csv and <domain>.txt files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// Per-request timeout in seconds
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
        timeout: u64,

        /// Retries for timeouts, connection errors and 5xx responses
        #[arg(long, default_value_t = DEFAULT_MAX_RETRIES)]
        retries: u32,

        /// Resolve relative links against the seed URL instead of the page they are on
        #[arg(long)]
        resolve_against_seed: bool,

        /// How many seeds to crawl at the same time
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
        parallel: u16,

        /// Print summaries as JSON instead of progress lines
        #[arg(long)]
        json: bool,
    },

    /// Print the email addresses found in a file
    ///
    /// Example: email-crawler extract saved-page.html
    Extract {
        /// File to scan; "-" reads from stdin
        #[arg(default_value = "-")]
        input: PathBuf,
    },
}

// Parses the contents of a --seed-file
//
// One URL per line. Leading/trailing whitespace is trimmed, blank lines
// and lines starting with '#' are skipped.
pub fn parse_seed_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why does `seeds` use required_unless_present?
//    - `crawl --seed-file sites.txt` with no positional URLs is valid
//    - `crawl` with neither is rejected by clap before main() sees it
//
// 2. Why a u16 value_parser with range(1..)?
//    - --parallel 0 would never crawl anything, so clap refuses it up front
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed_list() {
        let contents = "# leads for monday\nhttps://a.example\n\n  https://b.example/  \n#https://skip.example\n";
        assert_eq!(
            parse_seed_list(contents),
            vec!["https://a.example", "https://b.example/"]
        );
    }

    #[test]
    fn test_crawl_defaults() {
        let cli = Cli::try_parse_from(["email-crawler", "crawl", "https://example.com"]).unwrap();
        match cli.command {
            Commands::Crawl {
                seeds,
                timeout,
                retries,
                parallel,
                resolve_against_seed,
                ..
            } => {
                assert_eq!(seeds, vec!["https://example.com"]);
                assert_eq!(timeout, DEFAULT_TIMEOUT_SECS);
                assert_eq!(retries, DEFAULT_MAX_RETRIES);
                assert_eq!(parallel, 1);
                assert!(!resolve_against_seed);
            }
            _ => panic!("expected crawl"),
        }
    }

    #[test]
    fn test_crawl_needs_a_seed() {
        assert!(Cli::try_parse_from(["email-crawler", "crawl"]).is_err());
        assert!(Cli::try_parse_from(["email-crawler", "crawl", "--seed-file", "s.txt"]).is_ok());
    }

    #[test]
    fn test_parallel_must_be_positive() {
        let args = ["email-crawler", "crawl", "https://example.com", "--parallel", "0"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_timeout_must_be_positive() {
        let zero = ["email-crawler", "crawl", "https://example.com", "--timeout", "0"];
        assert!(Cli::try_parse_from(zero).is_err());

        let one = ["email-crawler", "crawl", "https://example.com", "--timeout", "1"];
        assert!(Cli::try_parse_from(one).is_ok());
    }
}
