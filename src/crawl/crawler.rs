// src/crawl/crawler.rs
// =============================================================================
// This module runs a whole crawl: seed the frontier, start the worker pool,
// wait for it to drain, and report what happened.
//
// How it works:
// 1. Validate the seed URL and queue it at depth 1
// 2. Spawn N workers on the tokio runtime, all sharing one CrawlRun
// 3. Each worker loops until the frontier declares the run finished
//    (nothing queued, nothing in flight)
// 4. Collect the counters into a CrawlReport
//
// There is no cancellation: a run always goes to natural completion.
// =============================================================================

use super::frontier::{Frontier, Task};
use super::worker::{run_worker, CrawlRun, CrawlStats};
use crate::error::Result;
use crate::index::IndexWriter;
use crate::web::{parse_absolute, Transport};
use futures::future::join_all;
use serde::Serialize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Summary of a finished crawl
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub seed_url: String,
    pub max_depth: usize,
    pub workers: usize,
    /// Distinct URLs that were queued (and therefore processed)
    pub urls_visited: usize,
    pub pages_indexed: usize,
    /// Tasks dropped because the page could not be fetched
    pub tasks_failed: usize,
    /// Pages fetched but not written to the index
    pub index_failures: usize,
    pub links_enqueued: usize,
    pub elapsed_secs: f64,
}

pub struct Crawler {
    transport: Arc<dyn Transport>,
    writer: IndexWriter,
}

impl Crawler {
    pub fn new(transport: Arc<dyn Transport>, writer: IndexWriter) -> Self {
        Self { transport, writer }
    }

    // Crawls from `seed_url` with `workers` parallel workers and returns
    // once every reachable page within `max_depth` has been processed.
    //
    // Only an invalid seed URL is an error; per-page failures are counted
    // in the report.
    pub async fn start(&self, seed_url: &str, max_depth: usize, workers: usize) -> Result<CrawlReport> {
        parse_absolute(seed_url)?;
        let workers = workers.max(1);

        let run = Arc::new(CrawlRun {
            frontier: Frontier::new(max_depth),
            transport: self.transport.clone(),
            writer: self.writer.clone(),
            stats: CrawlStats::default(),
        });

        run.frontier.enqueue(Task {
            url: seed_url.to_string(),
            depth: 1,
        });
        run.frontier.check_idle();

        info!(seed = seed_url, max_depth, workers, "starting crawl");
        let started = Instant::now();

        let handles: Vec<_> = (0..workers)
            .map(|id| tokio::spawn(run_worker(id, run.clone())))
            .collect();
        for result in join_all(handles).await {
            if let Err(e) = result {
                error!(error = %e, "crawl worker panicked");
            }
        }

        let stats = &run.stats;
        let report = CrawlReport {
            seed_url: seed_url.to_string(),
            max_depth,
            workers,
            urls_visited: run.frontier.visited_count(),
            pages_indexed: stats.pages_indexed.load(Ordering::Relaxed),
            tasks_failed: stats.tasks_failed.load(Ordering::Relaxed),
            index_failures: stats.index_failures.load(Ordering::Relaxed),
            links_enqueued: stats.links_enqueued.load(Ordering::Relaxed),
            elapsed_secs: started.elapsed().as_secs_f64(),
        };
        info!(
            pages = report.pages_indexed,
            failed = report.tasks_failed,
            "crawl finished"
        );
        Ok(report)
    }
}
