// src/crawl/worker.rs
// =============================================================================
// One crawl worker: take a task, process it, repeat until the run ends.
//
// Processing a task:
// 1. Fetch the page (following redirects)
// 2. Index it through the shared IndexWriter
// 3. If we're not at max depth, resolve every <a href> against the page
//    URL and queue the http(s) ones one level deeper
//
// Errors stop at the task boundary: a failed fetch is logged and the task is
// dropped; a failed index write is logged and link discovery still runs.
// Nothing a single page does can take the pool down.
// =============================================================================

use super::frontier::{Frontier, Task};
use crate::error::{CrawlError, Result};
use crate::index::IndexWriter;
use crate::text::extract_links;
use crate::web::{fetch, parse_absolute, resolve_relative, Transport};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Counters updated by every worker during a run
#[derive(Debug, Default)]
pub(crate) struct CrawlStats {
    pub pages_indexed: AtomicUsize,
    pub tasks_failed: AtomicUsize,
    pub index_failures: AtomicUsize,
    pub links_enqueued: AtomicUsize,
}

/// Everything the workers of one run share
pub(crate) struct CrawlRun {
    pub frontier: Frontier,
    pub transport: Arc<dyn Transport>,
    pub writer: IndexWriter,
    pub stats: CrawlStats,
}

// Marks the task finished when dropped, even if processing panicked
struct TaskGuard<'a>(&'a Frontier);

impl Drop for TaskGuard<'_> {
    fn drop(&mut self) {
        self.0.task_done();
    }
}

pub(crate) async fn run_worker(id: usize, run: Arc<CrawlRun>) {
    while let Some(task) = run.frontier.next_task().await {
        let _done = TaskGuard(&run.frontier);
        info!(worker = id, depth = task.depth, url = %task.url, "crawling");

        match process_task(&run, &task).await {
            Ok(children) => debug!(url = %task.url, children, "task complete"),
            Err(e) => {
                run.stats.tasks_failed.fetch_add(1, Ordering::Relaxed);
                warn!(url = %task.url, depth = task.depth, error = %e, "task failed");
            }
        }
    }
    debug!(worker = id, "worker exiting");
}

// Returns how many new tasks this page added to the frontier
async fn process_task(run: &CrawlRun, task: &Task) -> Result<usize> {
    let body = fetch(run.transport.as_ref(), &task.url).await?;

    let links = if task.depth < run.frontier.max_depth() {
        extract_links(&body)
    } else {
        Vec::new()
    };

    index_page(run, &task.url, body).await;

    let mut enqueued = 0;
    for href in links {
        let Some(url) = resolve_relative(&task.url, &href) else {
            continue;
        };
        if parse_absolute(&url).is_err() {
            debug!(%url, "skipping non-http link");
            continue;
        }
        let child = Task {
            url,
            depth: task.depth + 1,
        };
        if run.frontier.enqueue(child) {
            enqueued += 1;
        }
    }

    run.stats.links_enqueued.fetch_add(enqueued, Ordering::Relaxed);
    Ok(enqueued)
}

// SQLite work is blocking, so it runs on the blocking pool rather than on
// a runtime thread
async fn index_page(run: &CrawlRun, url: &str, body: String) {
    let writer = run.writer.clone();
    let owned_url = url.to_string();
    let result = tokio::task::spawn_blocking(move || writer.index_document(&owned_url, &body))
        .await
        .unwrap_or_else(|e| Err(CrawlError::Store(format!("index task failed: {e}"))));

    match result {
        Ok(_) => {
            run.stats.pages_indexed.fetch_add(1, Ordering::Relaxed);
        }
        Err(e) => {
            run.stats.index_failures.fetch_add(1, Ordering::Relaxed);
            warn!(%url, error = %e, "indexing failed");
        }
    }
}
