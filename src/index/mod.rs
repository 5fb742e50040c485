// src/index/mod.rs
// =============================================================================
// The inverted index: storage, the write path and the read path.
//
// Submodules:
// - store: the Store trait and the shared, lock-protected handle
// - sqlite: the rusqlite implementation of Store
// - writer: idempotent (re)indexing of documents
// - search: AND-ranked multi-term search
// =============================================================================

mod search;
mod sqlite;
mod store;
mod writer;

pub use search::SearchRanker;
pub use sqlite::SqliteStore;
pub use store::{lock, SearchHit, StoreHandle};
pub use writer::IndexWriter;
