// src/crawl/frontier.rs
// =============================================================================
// The frontier: pending crawl tasks plus the set of URLs already claimed.
//
// How it works:
// - enqueue() claims a URL in the visited set and pushes it onto the queue
// - next_task() hands out tasks, parking the worker while the queue is
//   empty but other workers may still produce more
// - task_done() is called after every task; when the queue is empty and no
//   task is in flight, the run is over and every parked worker is woken
//
// Locks:
// - `queue` guards the task queue AND the in-flight counter together. The
//   termination check reads both, so they must change atomically: a task
//   leaving the queue becomes "active" under the same lock.
// - `visited` is a separate lock so deduplication never waits on dispatch.
// Neither lock is ever held across an .await.
// =============================================================================

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{LockResult, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

/// A page waiting to be crawled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub url: String,
    /// 1 for the seed, parent depth + 1 for discovered links
    pub depth: usize,
}

#[derive(Default)]
struct QueueState {
    tasks: VecDeque<Task>,
    /// Tasks handed out and not yet finished
    active: usize,
}

pub struct Frontier {
    max_depth: usize,
    queue: Mutex<QueueState>,
    visited: Mutex<HashSet<String>>,
    finished: AtomicBool,
    wakeup: Notify,
}

impl Frontier {
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            queue: Mutex::new(QueueState::default()),
            visited: Mutex::new(HashSet::new()),
            finished: AtomicBool::new(false),
            wakeup: Notify::new(),
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    // Adds a task unless it is too deep or its URL was already claimed.
    //
    // Returns true if the task was queued. URLs are compared as exact
    // strings; exactly one caller can win a given URL.
    pub fn enqueue(&self, task: Task) -> bool {
        if task.depth > self.max_depth {
            return false;
        }
        // HashSet::insert is the check-and-insert: false if already present
        if !recover(self.visited.lock()).insert(task.url.clone()) {
            return false;
        }

        recover(self.queue.lock()).tasks.push_back(task);
        self.wakeup.notify_one();
        true
    }

    // Waits for the next task. Returns None once the run is finished.
    //
    // A returned task counts as active until task_done() is called.
    pub async fn next_task(&self) -> Option<Task> {
        loop {
            // Register for wakeups *before* looking, so an enqueue or a
            // finish that happens in between is not missed
            let notified = self.wakeup.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.is_finished() {
                return None;
            }
            {
                let mut queue = recover(self.queue.lock());
                if let Some(task) = queue.tasks.pop_front() {
                    queue.active += 1;
                    return Some(task);
                }
            }

            notified.await;
        }
    }

    /// Marks one task as finished and checks for global completion
    pub fn task_done(&self) {
        let mut queue = recover(self.queue.lock());
        queue.active = queue.active.saturating_sub(1);
        self.finish_if_idle(&queue);
    }

    // Declares the run finished if nothing is queued or in flight. Needed
    // once at startup in case nothing was ever queued.
    pub fn check_idle(&self) {
        let queue = recover(self.queue.lock());
        self.finish_if_idle(&queue);
    }

    fn finish_if_idle(&self, queue: &QueueState) {
        if queue.tasks.is_empty() && queue.active == 0 {
            self.finished.store(true, Ordering::SeqCst);
            self.wakeup.notify_waiters();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    /// Number of distinct URLs claimed so far
    pub fn visited_count(&self) -> usize {
        recover(self.visited.lock()).len()
    }

    #[cfg(test)]
    fn queued(&self) -> usize {
        recover(self.queue.lock()).tasks.len()
    }
}

// A worker that panicked mid-task must not wedge the others, so a poisoned
// lock is taken over as-is; the guarded data is always left consistent.
fn recover<'a, T: ?Sized>(result: LockResult<MutexGuard<'a, T>>) -> MutexGuard<'a, T> {
    result.unwrap_or_else(PoisonError::into_inner)
}
