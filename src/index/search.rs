// src/index/search.rs
// =============================================================================
// The read path: raw query text in, ranked URLs out.
//
// Only documents containing every query term match (AND semantics); a
// document's relevance is the sum of its counts for those terms.
// =============================================================================

use super::store::{lock, SearchHit, StoreHandle, MAX_RESULTS};
use crate::error::Result;
use crate::text::query_terms;

#[derive(Clone)]
pub struct SearchRanker {
    store: StoreHandle,
}

impl SearchRanker {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    pub fn search(&self, raw_query: &str) -> Result<Vec<SearchHit>> {
        let terms = query_terms(raw_query);
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let mut hits = lock(&self.store)?.search_by_terms(&terms)?;
        hits.truncate(MAX_RESULTS);
        Ok(hits)
    }
}
