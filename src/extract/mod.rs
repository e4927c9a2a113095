// src/extract/mod.rs
// =============================================================================
// Pure extraction over fetched page content.
//
// Submodules:
// - emails: address-shaped tokens in raw text, minus image-name false positives,
//   and the canonical form used for dedup
// - links: raw href values of <a> tags
//
// Neither keeps state between calls.
// =============================================================================

mod emails;
mod links;

pub use emails::{extract_emails, normalize_email};
pub use links::extract_hrefs;
