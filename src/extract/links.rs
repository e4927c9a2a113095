// src/extract/links.rs
// =============================================================================
// This module pulls raw href values out of an HTML page.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM, recovering from broken markup the way browsers do
// - Supports CSS selectors for finding elements
//
// Nothing is resolved or filtered here. Turning hrefs into absolute, in-scope
// URLs is the job of crawl/scope.rs.
// =============================================================================

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

// "a[href]" means "all <a> tags that have an href attribute"
static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

// Returns the href of every anchor on the page, in document order
//
// Malformed HTML never fails: html5ever always produces a tree, so the worst
// case is an empty Vec.
//
// Example:
//   html = "<a href='/docs'>Docs</a><a>no href</a>"
//   result = ["/docs"]
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
        .collect()
}
