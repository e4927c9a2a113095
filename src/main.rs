// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging and parse command-line arguments
// 2. Dispatch to the subcommand handler
// 3. Print progress and summaries
// 4. Exit with proper code (0 = success, 1 = a seed did not finish, 2 = error)
// =============================================================================

mod cli;
mod config;
mod crawl;
mod error;
mod extract;
mod sink;

use std::io::Read;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use url::Url;

use cli::{Cli, Commands};
use config::{CrawlConfig, LinkBase};
use crawl::{CrawlObserver, CrawlSession, CrawlSummary, HttpFetcher, NoopObserver, SessionState};
use error::FetchError;
use sink::FileSink;

#[tokio::main]
async fn main() {
    init_tracing();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Diagnostics go to stderr so stdout stays clean for --json.
// RUST_LOG overrides the default level (e.g. RUST_LOG=email_crawler=debug).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("email_crawler=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl {
            seeds,
            seed_file,
            output_dir,
            timeout,
            retries,
            resolve_against_seed,
            parallel,
            json,
        } => {
            let mut all_seeds = seeds;
            if let Some(path) = seed_file {
                let contents = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read seed file {}", path.display()))?;
                all_seeds.extend(cli::parse_seed_list(&contents));
            }

            let config = CrawlConfig {
                timeout: Duration::from_secs(timeout),
                max_retries: retries,
                output_dir,
                link_base: if resolve_against_seed {
                    LinkBase::Seed
                } else {
                    LinkBase::Page
                },
                ..CrawlConfig::default()
            };

            handle_crawl(all_seeds, config, usize::from(parallel), json).await
        }
        Commands::Extract { input } => handle_extract(&input),
    }
}

// Handles the 'crawl' subcommand
//
// Each seed gets its own session (its own frontier, its own output files).
// Up to `parallel` sessions run at once; a session that fails to start or
// fails to write its output does not stop the others.
async fn handle_crawl(
    seeds: Vec<String>,
    config: CrawlConfig,
    parallel: usize,
    json: bool,
) -> Result<i32> {
    if seeds.is_empty() {
        println!("⚠️  No seed URLs to crawl");
        return Ok(0);
    }

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            config.output_dir.display()
        )
    })?;

    // Ctrl-C stops every session at the top of its next step; visited URLs
    // are still written out.
    let cancel = CancellationToken::new();
    let ctrl_c_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\n🛑 Interrupted, finishing up...");
            ctrl_c_token.cancel();
        }
    });

    let fetcher = HttpFetcher::new(&config, cancel.clone())
        .context("failed to create HTTP client")?;
    let observer: &dyn CrawlObserver = if json { &NoopObserver } else { &ConsoleObserver };

    let results: Vec<(String, Result<CrawlSummary>)> = stream::iter(seeds)
        .map(|seed| {
            let config = &config;
            let fetcher = &fetcher;
            let cancel = &cancel;
            async move {
                let result = crawl_seed(&seed, config, fetcher, observer, cancel).await;
                (seed, result)
            }
        })
        .buffer_unordered(parallel)
        .collect()
        .await;

    let mut summaries = Vec::new();
    let mut all_completed = true;
    for (seed, result) in results {
        match result {
            Ok(summary) => {
                all_completed &= summary.outcome == SessionState::Done;
                summaries.push(summary);
            }
            Err(e) => {
                all_completed = false;
                eprintln!("❌ {}: {:#}", seed, e);
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        print_totals(&summaries);
    }

    Ok(if all_completed { 0 } else { 1 })
}

// Runs one session end to end: validate the seed, crawl, write the files
async fn crawl_seed(
    seed: &str,
    config: &CrawlConfig,
    fetcher: &HttpFetcher,
    observer: &dyn CrawlObserver,
    cancel: &CancellationToken,
) -> Result<CrawlSummary> {
    let mut session = CrawlSession::new(seed, config.link_base)?;
    let mut sink = FileSink::new(&config.output_dir, session.domain());

    let summary = session
        .run(fetcher, &mut sink, observer, cancel)
        .await
        .with_context(|| format!("crawl of {} stopped", seed))?;
    Ok(summary)
}

// Handles the 'extract' subcommand
fn handle_extract(input: &Path) -> Result<i32> {
    let mut text = String::new();
    if input == Path::new("-") {
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
    } else {
        let bytes = std::fs::read(input)
            .with_context(|| format!("failed to read {}", input.display()))?;
        text = String::from_utf8_lossy(&bytes).into_owned();
    }

    for email in extract::extract_emails(&text) {
        println!("{}", email);
    }
    Ok(0)
}

// Prints progress lines as the crawl goes
struct ConsoleObserver;

impl CrawlObserver for ConsoleObserver {
    fn on_session_started(&self, seed: &Url, domain: &str) {
        println!("🔍 Crawling {} (domain {})", seed, domain);
    }

    fn on_url_started(&self, url: &Url, queued: usize) {
        println!("  Crawling [{} queued]: {}", queued, url);
    }

    fn on_email_found(&self, email: &str, count: usize) {
        println!("  📧 {} Email found: {}", count, email);
    }

    fn on_url_failed(&self, url: &Url, error: &FetchError) {
        println!("  ⚠️  Skipped {}: {}", url, error);
    }

    fn on_session_complete(&self, summary: &CrawlSummary) {
        let status = match summary.outcome {
            SessionState::Cancelled => "🛑 Crawl cancelled",
            _ => "✅ End of crawling",
        };
        println!("{} for {}", status, summary.seed);
        println!("   Total URLs visited: {}", summary.pages_visited);
        println!("   Total emails found: {}", summary.emails_found);
        if !summary.failed.is_empty() {
            println!("   Skipped URLs: {}", summary.failed.len());
        }
        for path in &summary.artifacts {
            println!("   Wrote {}", path.display());
        }
        println!();
    }
}

// Prints a table with one row per seed
fn print_totals(summaries: &[CrawlSummary]) {
    if summaries.is_empty() {
        return;
    }

    println!("{:<50} {:<10} {:<8} {:<8}", "SEED", "OUTCOME", "PAGES", "EMAILS");
    println!("{}", "=".repeat(78));

    for summary in summaries {
        let seed_display = if summary.seed.len() > 47 {
            format!("{}...", &summary.seed[..47])
        } else {
            summary.seed.clone()
        };
        let outcome = match summary.outcome {
            SessionState::Done => "done",
            SessionState::Cancelled => "cancelled",
            SessionState::Running => "running",
        };
        println!(
            "{:<50} {:<10} {:<8} {:<8}",
            seed_display, outcome, summary.pages_visited, summary.emails_found
        );
    }

    let pages: usize = summaries.iter().map(|s| s.pages_visited).sum();
    let emails: usize = summaries.iter().map(|s| s.emails_found).sum();

    println!();
    println!("📊 Summary:");
    println!("   🌐 Sites: {}", summaries.len());
    println!("   📄 Pages visited: {}", pages);
    println!("   📧 Emails found: {}", emails);
}
