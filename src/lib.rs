// src/lib.rs
// =============================================================================
// Library root for linksweep, a concurrent dead link checker.
//
// The binary (src/main.rs) is a thin wrapper: it parses the CLI and calls
// into this library. Keeping the engine in a library lets the integration
// tests in tests/ drive a whole crawl without spawning the binary.
//
// Module map:
// - cli:     command-line parsing (clap derive)
// - checker: the two external collaborators - HTTP checking and HTML
//            link extraction
// - crawl:   the crawl engine - tasks, worker pool, frontier, driver
// - output:  status line writing with configurable newline bytes
// =============================================================================

pub mod cli;
pub mod checker;
pub mod crawl;
pub mod output;

// Re-export the types a caller of the engine needs, so users can write
// `linksweep::CrawlOptions` instead of digging through submodules
pub use checker::{CheckError, HttpChecker};
pub use cli::Cli;
pub use crawl::{
    run_crawl, CrawlError, CrawlOptions, CrawlReport, Decision, ExternalPolicy, Frontier,
    InternalPolicy, PrintMode, Task, TaskRecord, TaskStatus, WorkerPool,
};
pub use output::{NewlineMode, StatusWriter};
