// src/crawl/driver.rs
// =============================================================================
// The Crawl Driver: the control loop that owns the run.
//
// State machine: Seeding -> Draining -> Done.
// - Seeding: parse the seed, build the frontier (seed pre-inserted), start
//   the worker pool, submit one task for the seed (which always follows)
// - Draining: pull completed tasks in finish order; report failures to
//   stderr, emit status lines per the print mode, push every discovered
//   link through the frontier and submit whatever it admits. The loop exits
//   when the pool's pending count is back to zero - which can only be
//   decided here, because the task set grows while it drains.
// - Done: hand back a CrawlReport with the per-task records and statistics
//
// The driver is the sole writer to the frontier and the sole reader of
// completed tasks; workers only ever see a fully-specified Task and return
// a fully-specified result.
// =============================================================================

use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::checker::{CheckError, HttpChecker};
use crate::crawl::frontier::{Decision, ExternalPolicy, Frontier, InternalPolicy};
use crate::crawl::pool::WorkerPool;
use crate::crawl::task::{Task, TaskStatus};
use crate::output::StatusWriter;

/// Which completed tasks get a status line on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintMode {
    /// Every completed task (--print-all)
    All,
    /// Only dead links: status >= 400 (the default)
    FailuresOnly,
    /// No status lines at all (--json collects records instead)
    Silent,
}

/// Run-level configuration for one crawl.
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// The seed URL to crawl from
    pub seed: String,
    /// Worker count, must be >= 1
    pub threads: usize,
    /// Per-request timeout; None means wait forever
    pub timeout: Option<Duration>,
    pub internal: InternalPolicy,
    pub external: ExternalPolicy,
    pub follow_redirects: bool,
    pub print: PrintMode,
}

/// Ways a crawl can fail as a whole. Per-link failures are not here - they
/// are isolated, reported as they happen, and only flip the exit status.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid seed URL '{url}': {source}")]
    InvalidSeed {
        url: String,
        source: url::ParseError,
    },

    #[error("seed URL '{url}' is not http or https")]
    UnsupportedScheme { url: String },

    #[error("at least one worker thread is required")]
    NoWorkers,

    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    /// The seed itself could not be fetched - fatal, nothing was crawled
    #[error("unable to connect to {url}: {source}")]
    Startup { url: String, source: CheckError },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// One completed task, as recorded in the report (and in --json output).
//
// The flattened status merges the "result" tag and its fields into the
// record, so a record serializes as one flat JSON object.
#[derive(Debug, Clone, Serialize)]
pub struct TaskRecord {
    pub url: String,
    pub external: bool,
    #[serde(flatten)]
    pub status: TaskStatus,
}

impl TaskRecord {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, TaskStatus::Failed { .. })
    }
}

/// What a finished crawl produced.
#[derive(Debug)]
pub struct CrawlReport {
    /// Every drained task, in finish order
    pub records: Vec<TaskRecord>,
    /// Internal links visited (the seed counts as internal)
    pub internal_links: usize,
    /// External links visited
    pub external_links: usize,
    /// Requests that failed (timeouts and network errors)
    pub failures: usize,
    /// Wall-clock duration of the whole run
    pub elapsed: Duration,
}

impl CrawlReport {
    fn new() -> Self {
        Self {
            records: Vec::new(),
            internal_links: 0,
            external_links: 0,
            failures: 0,
            elapsed: Duration::ZERO,
        }
    }
}

// Runs a whole crawl.
//
// Status lines go to `out` as tasks finish; failure diagnostics go to
// stderr. The writer is generic so tests can drain into a Vec<u8>.
pub async fn run_crawl<W: Write>(
    opts: &CrawlOptions,
    out: &mut StatusWriter<W>,
) -> Result<CrawlReport, CrawlError> {
    // -- Seeding --------------------------------------------------------

    if opts.threads == 0 {
        return Err(CrawlError::NoWorkers);
    }

    let seed = Url::parse(&opts.seed).map_err(|source| CrawlError::InvalidSeed {
        url: opts.seed.clone(),
        source,
    })?;

    if seed.scheme() != "http" && seed.scheme() != "https" {
        return Err(CrawlError::UnsupportedScheme {
            url: opts.seed.clone(),
        });
    }

    let checker = Arc::new(
        HttpChecker::new(opts.timeout, opts.follow_redirects).map_err(CrawlError::Client)?,
    );

    let started = Instant::now();

    // The frontier pre-inserts the seed, so no page can re-admit it
    let mut frontier = Frontier::new(&seed, opts.internal, opts.external);
    let mut pool = WorkerPool::start(opts.threads, checker);

    // The seed task always follows - a crawl that can't read its own root
    // page would check nothing at all
    let seed_canonical = canonical_seed(&seed);
    pool.add_task(Task::new(seed_canonical, true, false));

    // -- Draining -------------------------------------------------------

    let mut report = CrawlReport::new();

    while let Some(task) = pool.next_completed().await {
        match &task.status {
            TaskStatus::Failed { error } => {
                // The first completion is always the seed (it was the only
                // task); if it failed, the whole run failed to start
                if report.records.is_empty() {
                    return Err(CrawlError::Startup {
                        url: task.url,
                        source: error.clone(),
                    });
                }

                // Concise message for timeouts (common); otherwise the
                // underlying network error message
                match error {
                    CheckError::Timeout => {
                        eprintln!("linksweep: error: {} - timeout.", task.url);
                    }
                    CheckError::Network { message } => {
                        eprintln!("linksweep: error: {} - {}.", task.url, message);
                    }
                }
                report.failures += 1;
            }
            TaskStatus::Completed { code, .. } => {
                let emit = match opts.print {
                    PrintMode::All => true,
                    PrintMode::FailuresOnly => *code >= 400,
                    PrintMode::Silent => false,
                };
                if emit {
                    out.line(&format!("{}: {}", code, task.url))?;
                }
            }
            // Workers always set a terminal status before handing a task
            // back; a Pending task cannot come out of the outbox
            TaskStatus::Pending => {}
        }

        if task.external {
            report.external_links += 1;
        } else {
            report.internal_links += 1;
        }

        // Feed discovered links back through the frontier; each admitted
        // link becomes a new task while we are still draining
        for link in &task.discovered {
            match frontier.admit(link) {
                Decision::Rejected => {}
                Decision::Internal { url, follow } => {
                    pool.add_task(Task::new(url, follow, false));
                }
                Decision::External { url, follow } => {
                    pool.add_task(Task::new(url, follow, true));
                }
            }
        }

        report.records.push(TaskRecord {
            url: task.url,
            external: task.external,
            status: task.status,
        });
    }

    // -- Done -----------------------------------------------------------

    report.elapsed = started.elapsed();
    Ok(report)
}

// The seed enters the pool in the same canonical form the frontier stores,
// fragment stripped, so the status line and the seen-set entry agree.
fn canonical_seed(seed: &Url) -> String {
    let mut url = seed.clone();
    url.set_fragment(None);
    url.to_string()
}
