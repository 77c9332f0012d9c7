// src/crawl/pool.rs
// =============================================================================
// The Worker Pool: a fixed number of long-lived workers consuming tasks
// from a shared inbox channel and pushing completed tasks to an outbox.
//
// Shape of the machinery:
// - inbox:  unbounded mpsc channel, driver -> workers. The receiver sits
//   behind an async Mutex so every worker can wait on it; whichever worker
//   grabs the lock when a task arrives takes the task and releases the
//   lock, so dequeueing is serialized but execution is not.
// - outbox: unbounded mpsc channel, workers -> driver.
// - pending: tasks submitted minus tasks drained. Only the driver-side
//   handle touches it, so it is a plain counter, not an atomic.
//
// Both channels are unbounded on purpose: the frontier can grow faster
// than it drains, and a bounded inbox would let the driver deadlock
// against its own workers.
//
// Waiting for a completed task is a genuine blocking recv().await - no
// polling loop, no sleep interval.
//
// Shutdown is implicit: workers run forever and are never joined. When the
// pool handle drops, the inbox sender drops with it, recv() returns None
// and each worker task winds down; at process exit they are simply
// abandoned. Workers hold no exclusive resources, so that is safe.
// =============================================================================

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use crate::checker::HttpChecker;
use crate::crawl::task::Task;

/// Driver-side handle to the pool of workers.
pub struct WorkerPool {
    inbox_tx: mpsc::UnboundedSender<Task>,
    outbox_rx: mpsc::UnboundedReceiver<Task>,
    pending: usize,
}

impl WorkerPool {
    // Starts `workers` workers sharing one HTTP checker.
    //
    // Must be called from within a tokio runtime (it spawns). The caller is
    // responsible for validating workers >= 1; a pool with zero workers
    // would accept tasks and never complete them.
    pub fn start(workers: usize, checker: Arc<HttpChecker>) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel::<Task>();
        let (outbox_tx, outbox_rx) = mpsc::unbounded_channel::<Task>();

        let inbox_rx = Arc::new(Mutex::new(inbox_rx));

        for _ in 0..workers {
            let inbox_rx = Arc::clone(&inbox_rx);
            let outbox_tx = outbox_tx.clone();
            let checker = Arc::clone(&checker);

            tokio::spawn(async move {
                loop {
                    // Take one task. The lock is held while waiting, which
                    // means idle workers queue up behind it; the first in
                    // line wakes, takes the task and releases the lock.
                    let task = inbox_rx.lock().await.recv().await;

                    let Some(mut task) = task else {
                        // Channel closed: the pool handle was dropped
                        break;
                    };

                    task.execute(&checker).await;

                    if outbox_tx.send(task).is_err() {
                        // Driver is gone, nothing left to report to
                        break;
                    }
                }
            });
        }

        Self {
            inbox_tx,
            outbox_rx,
            pending: 0,
        }
    }

    // Submits a task. May be called at any time, including while the driver
    // is mid-drain - the workers are already running and will pick it up.
    pub fn add_task(&mut self, task: Task) {
        self.pending += 1;
        if self.inbox_tx.send(task).is_err() {
            // Only possible if every worker already exited, which only
            // happens when the runtime is shutting down. Undo the count so
            // the drain loop cannot wait for a task nobody will execute.
            self.pending -= 1;
        }
    }

    // Yields the next completed task, in pure finish order, or None once
    // every submitted task has been drained.
    //
    // The None contract is what terminates the crawl: "done" means the
    // pending counter is back to zero, not that some static task list was
    // exhausted - new tasks may have been added the whole time.
    pub async fn next_completed(&mut self) -> Option<Task> {
        if self.pending == 0 {
            return None;
        }

        // recv() cannot return None here: we hold inbox_tx, so workers
        // never see a closed inbox and never drop their outbox senders
        let task = self.outbox_rx.recv().await?;
        self.pending -= 1;
        Some(task)
    }

    /// Tasks submitted but not yet drained
    pub fn pending(&self) -> usize {
        self.pending
    }
}
