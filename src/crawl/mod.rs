// src/crawl/mod.rs
// =============================================================================
// This module handles crawling.
//
// Features:
// - A shared frontier (task queue + visited set) with exact-URL dedup
// - A pool of parallel workers draining it
// - Depth limit: the seed is depth 1, each link followed adds one
// - Completion detection: the run ends when nothing is queued or in flight
//
// Rust concepts:
// - Arc: one CrawlRun shared by every worker
// - Mutex + Notify: parking idle workers until there is work (or no more)
// =============================================================================

mod crawler;
mod frontier;
mod worker;

// Re-export the crawl entry point
pub use crawler::{CrawlReport, Crawler};
