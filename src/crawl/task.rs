// src/crawl/task.rs
// =============================================================================
// A Task is one unit of crawl work: check a single URL and, when the task
// should be followed, harvest further link targets from its body.
//
// Lifecycle and ownership:
// - Created by the driver when the frontier admits a URL
// - Moved into the worker pool, exclusively owned by one worker while it
//   executes, then handed back to the driver through the outbox
// - Once `status` leaves Pending it is never written again
//
// execute() captures every failure into the status - a timeout classifies
// distinctly from other network errors, and no panic escapes. The worker
// loop relies on that: a task that could blow up would take a worker with
// it and the pending count would never drain.
// =============================================================================

use serde::Serialize;

use crate::checker::{extract_links, CheckError, HttpChecker};

// The result of executing a task.
//
// The serde tagging matches the --json output format: each record carries a
// "result" discriminant plus the variant's fields.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not executed yet
    Pending,
    /// The request completed and produced a status code
    Completed {
        code: u16,
        #[serde(skip_serializing_if = "Option::is_none")]
        content_type: Option<String>,
    },
    /// The request itself failed (timeout, connection refused, DNS, ...)
    Failed { error: CheckError },
}

/// One link-check-and-optionally-extract unit of work.
#[derive(Debug, Clone)]
pub struct Task {
    /// The canonical URL to check
    pub url: String,
    /// Whether to extract further links from the body
    pub follow: bool,
    /// Whether the URL is on a different network location than the seed.
    /// Stamped by the driver at admit time; the worker never needs it, the
    /// end-of-run statistics do.
    pub external: bool,
    /// Filled in by execute()
    pub status: TaskStatus,
    /// Absolute link targets harvested from the body; empty unless the task
    /// followed an HTML page with a non-error status
    pub discovered: Vec<String>,
}

impl Task {
    pub fn new(url: String, follow: bool, external: bool) -> Self {
        Self {
            url,
            follow,
            external,
            status: TaskStatus::Pending,
            discovered: Vec::new(),
        }
    }

    // Executes the task against the shared HTTP checker.
    //
    // A check-only task issues a HEAD request. A follow task issues a GET,
    // and the checker only reads the body when the status is < 400 and the
    // content type is HTML - exactly the cases where extraction happens, so
    // a follow task pointed at a PDF or a 404 costs no more than a check.
    pub async fn execute(&mut self, checker: &HttpChecker) {
        match checker.check(&self.url, self.follow).await {
            Ok(response) => {
                if let Some(body) = &response.body {
                    self.discovered = extract_links(body, &self.url);
                }
                self.status = TaskStatus::Completed {
                    code: response.status,
                    content_type: response.content_type,
                };
            }
            Err(error) => {
                self.status = TaskStatus::Failed { error };
            }
        }
    }

    /// True once the request failed (as opposed to completing with any
    /// status code - a 404 is a completed task, not a failed one)
    pub fn is_failed(&self) -> bool {
        matches!(self.status, TaskStatus::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_failed_task_has_empty_discovered_links() {
        // Grab a free port with nothing listening on it
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let checker = HttpChecker::new(Some(Duration::from_secs(5)), false).unwrap();
        let mut task = Task::new(format!("http://127.0.0.1:{}/", port), true, false);
        task.execute(&checker).await;

        assert!(task.is_failed());
        assert!(task.discovered.is_empty());
    }

    #[test]
    fn test_new_task_is_pending() {
        let task = Task::new("http://example.com/".to_string(), false, true);
        assert!(matches!(task.status, TaskStatus::Pending));
        assert!(!task.is_failed());
        assert!(task.external);
    }
}
