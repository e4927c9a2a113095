// src/sink/mod.rs
// =============================================================================
// Result sinks: where discovered emails and visited URLs end up.
//
// The frontier calls:
// - emit_email() once per new address, as soon as it is found
// - finalize() exactly once, when the session ends
//
// A sink only ever sees values; it cannot reach back into session state.
// =============================================================================

mod file;
#[cfg(test)]
mod memory;

use std::path::PathBuf;

use crate::error::SinkError;

pub use file::FileSink;
#[cfg(test)]
pub use memory::MemorySink;

pub trait ResultSink: Send {
    fn emit_email(&mut self, address: &str) -> Result<(), SinkError>;

    fn finalize(&mut self, processed_urls: &[String]) -> Result<(), SinkError>;

    // Files this sink writes, for the end-of-run summary
    fn artifact_paths(&self) -> Vec<PathBuf> {
        Vec::new()
    }
}
