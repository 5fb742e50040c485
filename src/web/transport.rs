// src/web/transport.rs
// =============================================================================
// This module moves bytes: one GET request, one response, no redirects.
//
// Key functionality:
// - Transport trait: the seam between the fetch policy and the network
// - HttpTransport: the real implementation on top of reqwest
//
// reqwest would happily follow redirects for us, but the fetch policy owns
// redirect handling (it needs to count hops and resolve Location headers
// itself), so the client is built with redirect::Policy::none().
// =============================================================================

use crate::error::{CrawlError, Result};
use async_trait::async_trait;
use reqwest::{header, redirect, Client};
use std::time::Duration;

/// Default User-Agent sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!("wordcrawl/", env!("CARGO_PKG_VERSION"));

/// What came back from a single request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    /// The Location header, if the server sent one
    pub location: Option<String>,
    pub body: String,
}

impl RawResponse {
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }
}

// Anything that can perform a single GET without following redirects.
//
// Send + Sync because one transport is shared by every crawl worker.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<RawResponse>;
}

/// reqwest-backed transport with TLS certificate verification on
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(redirect::Policy::none())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<RawResponse> {
        let response = self.client.get(url).send().await.map_err(categorize_error)?;

        let status = response.status().as_u16();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.map_err(categorize_error)?;

        Ok(RawResponse {
            status,
            location,
            body,
        })
    }
}

// Turns a reqwest error into a short, readable network error
fn categorize_error(error: reqwest::Error) -> CrawlError {
    let message = if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        error.to_string()
    };
    CrawlError::Network(message)
}
