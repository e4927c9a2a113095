// src/extract/emails.rs
// =============================================================================
// This module finds email addresses in raw page text.
//
// The grammar is deliberately loose:
//   local part   [A-Za-z0-9_.+-]+
//   '@'
//   first label  [A-Za-z0-9-]+
//   '.'
//   the rest     [A-Za-z0-9.-]+
//
// It over-matches on purpose. The one false-positive class we suppress is
// asset file names that contain an '@' (retina images like
// "gFJS3amhZEg_z39D5EErVg@2x.png" are common on CDNs).
//
// The extractor has no memory between calls. Deciding whether an address is
// new for the session is the frontier's job (see crawl/session.rs).
// =============================================================================

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[a-z0-9_.+-]+@[a-z0-9-]+\.[a-z0-9.-]+").unwrap()
});

// Suffixes that mark a match as an image file name rather than an address.
// Compared case-sensitively and without requiring a dot.
const IMAGE_SUFFIXES: [&str; 3] = ["jpg", "jpeg", "png"];

// Extracts every address-shaped token from `text`
//
// Returns a sorted set, so the same address appearing twice on a page
// comes back once and output order is stable.
//
// Example:
//   "Contact: sales@example.com or img@example.com.png"
//   -> {"sales@example.com"}
pub fn extract_emails(text: &str) -> BTreeSet<String> {
    EMAIL_REGEX
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|candidate| !is_image_name(candidate))
        .map(str::to_string)
        .collect()
}

// Canonical form used to decide whether two matches are the same address
//
// Domains are case-insensitive, local parts are not (RFC 5321), so only the
// part after the last '@' is lowercased.
//
// Example:
//   "Sales@Example.COM" -> "Sales@example.com"
pub fn normalize_email(address: &str) -> String {
    match address.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_ascii_lowercase()),
        None => address.to_string(),
    }
}

fn is_image_name(candidate: &str) -> bool {
    IMAGE_SUFFIXES
        .iter()
        .any(|suffix| candidate.ends_with(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases_domain_only() {
        assert_eq!(normalize_email("Sales@Example.COM"), "Sales@example.com");
        assert_eq!(normalize_email("sales@example.com"), "sales@example.com");
        assert_eq!(normalize_email("no-at-sign"), "no-at-sign");
    }
    #[test]
    fn test_finds_plain_address() {
        let emails = extract_emails("Write to info@example.com today");
        assert_eq!(emails.into_iter().collect::<Vec<_>>(), vec!["info@example.com"]);
    }

    #[test]
    fn test_suppresses_image_names() {
        let emails = extract_emails("Contact: sales@example.com or img_sales@example.com.png");
        assert_eq!(emails.len(), 1);
        assert!(emails.contains("sales@example.com"));
    }

    #[test]
    fn test_suppresses_retina_asset() {
        let text = r#"<img src="/cdn/gFJS3amhZEg_z39D5EErVg@2x.png"> <img src="a@b.photo.jpeg">"#;
        assert!(extract_emails(text).is_empty());
    }

    #[test]
    fn test_suffix_check_needs_no_dot() {
        // "abc123@cdn.png" and "x@host.mypng" both end in "png"
        assert!(extract_emails("abc123@cdn.png x@host.mypng").is_empty());
    }

    #[test]
    fn test_suffix_check_is_case_sensitive() {
        let emails = extract_emails("logo@cdn.example.PNG");
        assert!(emails.contains("logo@cdn.example.PNG"));
    }

    #[test]
    fn test_duplicates_collapse() {
        let html = r#"<a>a@b.com</a> <a>a@b.com</a>"#;
        let emails = extract_emails(html);
        assert_eq!(emails.len(), 1);
    }

    #[test]
    fn test_multi_label_domains_and_plus_tags() {
        let emails = extract_emails("first.last+news@mail.example.co.uk");
        assert!(emails.contains("first.last+news@mail.example.co.uk"));
    }

    #[test]
    fn test_mailto_href_is_matched() {
        let emails = extract_emails(r#"<a href="mailto:hello@example.org">mail us</a>"#);
        assert!(emails.contains("hello@example.org"));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let text = "one@example.com, two@example.net and one@example.com";
        assert_eq!(extract_emails(text), extract_emails(text));
    }

    #[test]
    fn test_requires_a_dot_after_at() {
        assert!(extract_emails("user@localhost and @handle").is_empty());
    }
}
