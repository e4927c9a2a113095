// src/sink/file.rs
// =============================================================================
// File-backed sink.
//
// For a seed on www.example.com it writes, under the output directory:
//   www_example_com.csv  one address per row, no header, appended as found
//   www_example_com.txt  every visited URL, written once at the end
//
// Every write is retried once. A second failure is returned to the frontier,
// which ends the session: losing found addresses silently is worse than
// stopping.
// =============================================================================

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

use super::ResultSink;
use crate::error::SinkError;

pub struct FileSink {
    emails_path: PathBuf,
    visited_path: PathBuf,
}

impl FileSink {
    pub fn new(output_dir: &Path, domain: &str) -> Self {
        let slug = domain_slug(domain);
        Self {
            emails_path: output_dir.join(format!("{}.csv", slug)),
            visited_path: output_dir.join(format!("{}.txt", slug)),
        }
    }

    pub fn emails_path(&self) -> &Path {
        &self.emails_path
    }

    pub fn visited_path(&self) -> &Path {
        &self.visited_path
    }
}

// File-name-safe form of a domain: every non-alphanumeric character becomes '_'
//
// Examples:
//   "www.example.com"  -> "www_example_com"
//   "localhost:8080"   -> "localhost_8080"
pub fn domain_slug(domain: &str) -> String {
    domain
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn append_line(path: &Path, line: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", line)?;
    file.flush()
}

fn write_with_retry<F>(path: &Path, mut op: F) -> Result<(), SinkError>
where
    F: FnMut() -> io::Result<()>,
{
    op().or_else(|first| {
        warn!(path = %path.display(), error = %first, "write failed, retrying once");
        op()
    })
    .map_err(|source| SinkError {
        path: path.to_path_buf(),
        source,
    })
}

impl ResultSink for FileSink {
    fn emit_email(&mut self, address: &str) -> Result<(), SinkError> {
        let path = &self.emails_path;
        write_with_retry(path, || append_line(path, address))
    }

    fn finalize(&mut self, processed_urls: &[String]) -> Result<(), SinkError> {
        let mut contents = processed_urls.join("\n");
        if !contents.is_empty() {
            contents.push('\n');
        }
        let path = &self.visited_path;
        write_with_retry(path, || fs::write(path, &contents))
    }

    // The .csv only exists once an address was found
    fn artifact_paths(&self) -> Vec<PathBuf> {
        [&self.emails_path, &self.visited_path]
            .into_iter()
            .filter(|path| path.exists())
            .cloned()
            .collect()
    }
}
