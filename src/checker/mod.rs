// src/checker/mod.rs
// =============================================================================
// This module contains the two external collaborators the crawl engine
// delegates to:
//
// Submodules:
// - http: makes HTTP requests and classifies what came back (or what failed)
// - html: extracts link targets from HTML pages
//
// The crawl engine itself (src/crawl/) never touches reqwest or scraper
// directly - it only sees the narrow interfaces exported here, which keeps
// the producer/consumer machinery testable without a network.
// =============================================================================

// Declare submodules (tells Rust to include these files)
mod html;
mod http;

// Re-export public items from submodules
// This lets users write `checker::extract_links()` instead of
// `checker::html::extract_links()`
pub use html::extract_links;
pub use http::{CheckError, CheckedResponse, HttpChecker};
