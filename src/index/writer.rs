// src/index/writer.rs
// =============================================================================
// This module writes pages into the index.
//
// Re-indexing is a full replace, never a merge:
// 1. Upsert the document (new content replaces old)
// 2. Delete all of its frequency rows
// 3. Write one row per term of the fresh tokenization
//
// So after any number of (re)indexings, a document's rows are exactly the
// tokenization of its current content.
//
// The store lock is held for the whole rewrite of one document, so two
// workers can never interleave their rows for the same URL. Each rewrite is
// also one store transaction: if any step fails, the document keeps its
// previous content and rows.
// =============================================================================

use super::store::{lock, DocumentId, Store, StoreHandle};
use crate::error::Result;
use crate::text::{strip_markup, tokenize};
use tracing::{debug, warn};

#[derive(Clone)]
pub struct IndexWriter {
    store: StoreHandle,
}

impl IndexWriter {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    /// Stores `content` under `url` and rewrites its term counts
    pub fn index_document(&self, url: &str, content: &str) -> Result<DocumentId> {
        let mut store = lock(&self.store)?;
        let (document_id, terms) = in_transaction(&mut *store, |store| {
            let document_id = store.upsert_document(url, content)?;
            let terms = write_terms(store, document_id, content)?;
            Ok((document_id, terms))
        })?;
        debug!(url, document_id, terms, "indexed document");
        Ok(document_id)
    }

    // Rebuilds the frequency rows of every stored document from its
    // stored content. Returns how many documents were processed.
    //
    // Stops at the first failure; documents rewritten before it stay
    // rewritten, the failing one is left untouched.
    pub fn reindex_all(&self) -> Result<usize> {
        let mut store = lock(&self.store)?;
        let documents = store.all_documents()?;
        for (document_id, content) in &documents {
            let terms = in_transaction(&mut *store, |store| {
                write_terms(store, *document_id, content)
            })?;
            debug!(document_id, terms, "re-indexed document");
        }
        Ok(documents.len())
    }
}

// Runs `f` between begin() and commit(), rolling back if any step fails
fn in_transaction<T>(
    store: &mut dyn Store,
    f: impl FnOnce(&mut dyn Store) -> Result<T>,
) -> Result<T> {
    store.begin()?;
    let result = f(&mut *store).and_then(|value| store.commit().map(|_| value));
    if result.is_err() {
        if let Err(e) = store.rollback() {
            warn!(error = %e, "rollback failed");
        }
    }
    result
}

// Clear-then-rewrite for one document; returns the number of distinct terms
fn write_terms(store: &mut dyn Store, document_id: DocumentId, content: &str) -> Result<usize> {
    store.clear_frequencies(document_id)?;

    let counts = tokenize(&strip_markup(content));
    for (term, count) in &counts {
        let word_id = store.upsert_word(term)?;
        store.upsert_frequency(document_id, word_id, *count)?;
    }
    Ok(counts.len())
}
