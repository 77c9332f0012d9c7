// src/checker/html.rs
// =============================================================================
// This module is the HTML link-extraction capability of the crawler.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// We also use the `url` crate to resolve relative references against the
// page's own URL, the same way a browser would.
//
// Targets harvested: every <a href> and every <img src>. Anything that does
// not resolve to an http(s) URL (mailto:, javascript:, data:, broken hrefs)
// is silently skipped - per the crawl policy those are not errors.
// =============================================================================

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

// Extracts all link targets from HTML content
//
// Parameters:
//   html: the HTML content to parse (borrowed as &str)
//   base_url: the URL of the page itself (for resolving relative links)
//
// Returns: absolute http(s) URLs, deduplicated within this page, in
// first-seen document order. The frontier dedups globally anyway; the local
// dedup just avoids admitting the same target dozens of times for pages
// with repeated navigation links.
//
// Example:
//   html = "<a href='/docs'>Docs</a>"
//   base_url = "https://example.com"
//   result = ["https://example.com/docs"]
pub fn extract_links(html: &str, base_url: &str) -> Vec<String> {
    let mut links = Vec::new();
    let mut seen = HashSet::new();

    // Parse the HTML into a document
    let document = Html::parse_document(html);

    // Selector::parse returns Result, so we use .unwrap() which panics on
    // error. This is OK here because our selectors are constants and known
    // to be valid.
    let anchors = Selector::parse("a[href]").unwrap();
    let images = Selector::parse("img[src]").unwrap();

    // Parse the base URL once
    let base = match Url::parse(base_url) {
        Ok(url) => url,
        Err(_) => {
            // If the base URL is invalid we can't resolve anything
            eprintln!("linksweep: warning: invalid base URL: {}", base_url);
            return links;
        }
    };

    let targets = document
        .select(&anchors)
        .filter_map(|element| element.value().attr("href"))
        .chain(
            document
                .select(&images)
                .filter_map(|element| element.value().attr("src")),
        );

    for target in targets {
        if let Some(absolute) = resolve_url(&base, target) {
            if is_checkable_link(&absolute) && seen.insert(absolute.clone()) {
                links.push(absolute);
            }
        }
    }

    links
}

// Resolves a possibly-relative reference to an absolute URL
//
// Examples:
//   base = "https://example.com/page"
//   href = "/docs" -> Some("https://example.com/docs")
//   href = "../other" -> Some("https://example.com/other")
//   href = "https://other.com" -> Some("https://other.com/")
fn resolve_url(base: &Url, href: &str) -> Option<String> {
    // Url::join handles both cases: an absolute href replaces the base,
    // a relative one is resolved against it
    match base.join(href) {
        Ok(url) => Some(url.to_string()),
        Err(_) => None, // unparseable reference, skip it
    }
}

// Only http(s) targets are worth checking. This filters out mailto:,
// tel:, javascript:, data: and file: references in one place.
fn is_checkable_link(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_absolute_link() {
        let html = r#"<a href="https://www.rust-lang.org">Rust</a>"#;
        let links = extract_links(html, "https://example.com");
        assert_eq!(links, vec!["https://www.rust-lang.org/"]);
    }

    #[test]
    fn test_resolve_relative_link() {
        let html = r#"<a href="/docs">Docs</a>"#;
        let links = extract_links(html, "https://example.com/page");
        assert_eq!(links, vec!["https://example.com/docs"]);
    }

    #[test]
    fn test_extract_image_target() {
        let html = r#"<img src="/logo.png" alt="logo">"#;
        let links = extract_links(html, "https://example.com/page");
        assert_eq!(links, vec!["https://example.com/logo.png"]);
    }

    #[test]
    fn test_skip_mailto_and_javascript() {
        let html = r#"
            <a href="mailto:test@example.com">Email</a>
            <a href="javascript:void(0)">Click</a>
            <a href="tel:+1234567890">Call</a>
        "#;
        let links = extract_links(html, "https://example.com");
        assert!(links.is_empty());
    }

    #[test]
    fn test_page_local_dedup_keeps_first_seen_order() {
        let html = r#"
            <a href="/b">B</a>
            <a href="/a">A</a>
            <a href="/b">B again</a>
        "#;
        let links = extract_links(html, "https://example.com");
        assert_eq!(
            links,
            vec!["https://example.com/b", "https://example.com/a"]
        );
    }

    #[test]
    fn test_multiple_links() {
        let html = r#"
            <a href="https://rust-lang.org">Rust</a>
            <a href="/docs">Docs</a>
            <a href="../about">About</a>
        "#;
        let links = extract_links(html, "https://example.com/page/");
        assert_eq!(links.len(), 3);
    }

    #[test]
    fn test_invalid_base_url_yields_nothing() {
        let html = r#"<a href="/docs">Docs</a>"#;
        let links = extract_links(html, "not a url");
        assert!(links.is_empty());
    }
}
