// src/web/mod.rs
// =============================================================================
// Everything that talks to the web.
//
// Submodules:
// - resolve: URL parsing and href resolution
// - transport: a single non-redirecting GET (reqwest)
// - fetch: redirect-following page fetch built on the two above
// =============================================================================

mod fetch;
mod resolve;
mod transport;

pub use fetch::fetch;
pub use resolve::{parse_absolute, resolve_relative};
pub use transport::{HttpTransport, Transport, DEFAULT_USER_AGENT};

#[cfg(test)]
pub(crate) use fetch::tests::MockTransport;
