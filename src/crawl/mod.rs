// src/crawl/mod.rs
// =============================================================================
// This module is the crawl engine - the part of linksweep with actual
// engineering risk in it.
//
// Submodules, leaves first:
// - task:     one unit of work - check one URL, maybe harvest its links
// - pool:     fixed-size worker pool consuming tasks from an inbox channel
//             and pushing completed tasks to an outbox channel
// - frontier: the deduplicated set of seen URLs plus the follow/check/ignore
//             policy - decides whether a discovered link becomes a task
// - driver:   the control loop tying it together - seed, drain, feed back,
//             terminate when nothing is pending
//
// Ownership discipline: only the driver touches the frontier, only workers
// perform network calls, and tasks travel between them by message passing.
// There is no shared mutable state outside the two channels.
// =============================================================================

mod driver;
mod frontier;
mod pool;
mod task;

// Re-export public items from submodules
pub use driver::{run_crawl, CrawlError, CrawlOptions, CrawlReport, PrintMode, TaskRecord};
pub use frontier::{Decision, ExternalPolicy, Frontier, InternalPolicy};
pub use pool::WorkerPool;
pub use task::{Task, TaskStatus};
