// In-memory sink for frontier tests

use super::ResultSink;
use crate::error::SinkError;

#[derive(Debug, Default)]
pub struct MemorySink {
    pub emails: Vec<String>,
    pub visited: Option<Vec<String>>,
    pub finalize_calls: usize,
}

impl ResultSink for MemorySink {
    fn emit_email(&mut self, address: &str) -> Result<(), SinkError> {
        self.emails.push(address.to_string());
        Ok(())
    }

    fn finalize(&mut self, processed_urls: &[String]) -> Result<(), SinkError> {
        self.visited = Some(processed_urls.to_vec());
        self.finalize_calls += 1;
        Ok(())
    }
}
