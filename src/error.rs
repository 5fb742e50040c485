// src/error.rs
// =============================================================================
// Error types shared by the crawler, the index and the search path.
//
// There are exactly four ways the core can fail:
// - InvalidUrl: a URL we cannot parse, or one with a scheme we don't fetch
// - TooManyRedirects: a fetch bounced through more than 5 redirects
// - Network: the transport could not complete a request
// - Store: the index database rejected an operation
//
// The application layer (main.rs) wraps these in anyhow::Error; the web
// server turns them into a generic error page.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlError {
    /// URL is unparseable or uses a scheme other than http/https
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Redirect chain longer than the fetch policy allows
    #[error("too many redirects ({0} hops)")]
    TooManyRedirects(usize),

    /// The transport failed (DNS, connect, TLS, timeout, ...)
    #[error("network error: {0}")]
    Network(String),

    /// The storage engine failed
    #[error("store error: {0}")]
    Store(String),
}

impl From<reqwest::Error> for CrawlError {
    fn from(e: reqwest::Error) -> Self {
        CrawlError::Network(e.to_string())
    }
}

impl From<rusqlite::Error> for CrawlError {
    fn from(e: rusqlite::Error) -> Self {
        CrawlError::Store(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CrawlError>;
