// src/index/store.rs
// =============================================================================
// The storage contract the index writer and the search ranker rely on.
//
// Three kinds of rows live behind it:
// - documents: one per URL, holding the latest fetched body
// - words: one per distinct term, with a stable id
// - frequencies: (document, word) -> count
//
// Implementations are not expected to be usable from several threads at
// once; every caller goes through a StoreHandle, which serializes access
// with a single mutex.
//
// begin/commit/rollback group several calls into one unit: a document is
// rewritten completely or not at all.
// =============================================================================

use crate::error::{CrawlError, Result};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

pub type DocumentId = i64;
pub type WordId = i64;

/// Most results a search ever returns
pub const MAX_RESULTS: usize = 10;

/// One ranked search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub url: String,
    /// Sum of the matched terms' counts in this document
    pub relevance: i64,
}

pub trait Store: Send {
    /// Inserts the document, or replaces the content of an existing one
    fn upsert_document(&mut self, url: &str, content: &str) -> Result<DocumentId>;

    /// Every stored document as (id, content)
    fn all_documents(&self) -> Result<Vec<(DocumentId, String)>>;

    /// Deletes every frequency row of a document
    fn clear_frequencies(&mut self, document_id: DocumentId) -> Result<()>;

    /// Returns the id of `term`, creating the word on first sight
    fn upsert_word(&mut self, term: &str) -> Result<WordId>;

    /// Sets (not adds to) the count for a (document, word) pair
    fn upsert_frequency(&mut self, document_id: DocumentId, word_id: WordId, count: u32)
        -> Result<()>;

    // Documents containing every one of `terms`, ranked by the sum of the
    // terms' counts (highest first, ties by URL ascending), at most
    // MAX_RESULTS of them.
    fn search_by_terms(&self, terms: &[String]) -> Result<Vec<SearchHit>>;

    fn document_count(&self) -> Result<usize>;

    fn begin(&mut self) -> Result<()>;

    fn commit(&mut self) -> Result<()>;

    /// Discards everything since begin()
    fn rollback(&mut self) -> Result<()>;
}

/// The one shared, lock-protected store every worker writes through
pub type StoreHandle = Arc<Mutex<dyn Store>>;

pub fn lock(store: &StoreHandle) -> Result<MutexGuard<'_, dyn Store + 'static>> {
    store
        .lock()
        .map_err(|_| CrawlError::Store("store lock poisoned".to_string()))
}
