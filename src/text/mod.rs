// src/text/mod.rs
// =============================================================================
// Text processing: from raw HTML to terms, and from HTML to links.
//
// Submodules:
// - html: tag stripping and <a href> extraction (pattern matching, no DOM)
// - tokenize: term scanning and counting
// =============================================================================

mod html;
mod tokenize;

pub use html::{extract_links, strip_markup};
pub use tokenize::{query_terms, tokenize, MAX_QUERY_TERMS};
