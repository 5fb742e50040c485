// src/web/fetch.rs
// =============================================================================
// This module fetches a page body, following redirects by hand.
//
// How it works:
// 1. Validate the current URL (http/https only)
// 2. Ask the transport for it
// 3. On a 3xx with a Location header, resolve the target against the
//    current URL and go around again
// 4. Anything else is final: return the body
//
// The hop counter lives in the loop, so a redirect cycle costs at most
// MAX_REDIRECTS + 1 requests and never grows the stack.
// =============================================================================

use super::resolve::{parse_absolute, resolve_relative};
use super::transport::Transport;
use crate::error::{CrawlError, Result};
use tracing::debug;

/// Redirect hops allowed before giving up
pub const MAX_REDIRECTS: usize = 5;

pub async fn fetch(transport: &dyn Transport, url: &str) -> Result<String> {
    let mut current = url.to_string();
    let mut hops = 0;

    loop {
        parse_absolute(&current)?;
        let response = transport.get(&current).await?;

        // A 3xx without a Location header has nowhere to go; treat it as final
        let location = match (response.is_redirect(), response.location) {
            (true, Some(location)) => location,
            _ => return Ok(response.body),
        };

        hops += 1;
        if hops > MAX_REDIRECTS {
            return Err(CrawlError::TooManyRedirects(hops));
        }

        let next = resolve_relative(&current, &location)
            .ok_or_else(|| CrawlError::InvalidUrl(location.clone()))?;
        debug!(from = %current, to = %next, hop = hops, "following redirect");
        current = next;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::web::transport::RawResponse;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    // In-memory transport: a fixed table of URL -> response, plus a log of
    // every URL requested
    #[derive(Default)]
    pub(crate) struct MockTransport {
        pages: HashMap<String, RawResponse>,
        pub(crate) requests: Mutex<Vec<String>>,
    }

    impl MockTransport {
        pub(crate) fn page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(
                url.to_string(),
                RawResponse {
                    status: 200,
                    location: None,
                    body: body.to_string(),
                },
            );
            self
        }

        pub(crate) fn redirect(mut self, url: &str, location: &str) -> Self {
            self.pages.insert(
                url.to_string(),
                RawResponse {
                    status: 302,
                    location: Some(location.to_string()),
                    body: String::new(),
                },
            );
            self
        }

        pub(crate) fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn get(&self, url: &str) -> Result<RawResponse> {
            self.requests.lock().unwrap().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| CrawlError::Network(format!("no route to {url}")))
        }
    }

    // http://a.com/0 -> /1 -> ... -> /n, with /n returning "final"
    fn redirect_chain(n: usize) -> MockTransport {
        let mut transport = MockTransport::default();
        for i in 0..n {
            transport = transport.redirect(&format!("http://a.com/{i}"), &format!("/{}", i + 1));
        }
        transport.page(&format!("http://a.com/{n}"), "final")
    }

    #[tokio::test]
    async fn test_plain_page() {
        let transport = MockTransport::default().page("http://a.com/", "body");
        assert_eq!(fetch(&transport, "http://a.com/").await.unwrap(), "body");
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_five_redirects_then_success() {
        let transport = redirect_chain(5);
        let body = fetch(&transport, "http://a.com/0").await.unwrap();
        assert_eq!(body, "final");
        assert_eq!(transport.request_count(), 6);
    }

    #[tokio::test]
    async fn test_six_redirects_is_too_many() {
        let transport = redirect_chain(6);
        let result = fetch(&transport, "http://a.com/0").await;
        assert!(matches!(result, Err(CrawlError::TooManyRedirects(6))));
        // the sixth target is never requested
        assert_eq!(transport.request_count(), 6);
    }

    #[tokio::test]
    async fn test_redirect_loop_is_bounded() {
        let transport = MockTransport::default()
            .redirect("http://a.com/a", "/b")
            .redirect("http://a.com/b", "/a");
        let result = fetch(&transport, "http://a.com/a").await;
        assert!(matches!(result, Err(CrawlError::TooManyRedirects(_))));
    }

    #[tokio::test]
    async fn test_relative_location_is_resolved() {
        let transport = MockTransport::default()
            .redirect("http://a.com/docs/old", "new.html")
            .page("http://a.com/docs/new.html", "moved");
        assert_eq!(fetch(&transport, "http://a.com/docs/old").await.unwrap(), "moved");
    }

    #[tokio::test]
    async fn test_unresolvable_location_is_invalid_url() {
        let transport = MockTransport::default().redirect("http://a.com/", "javascript:void(0)");
        let result = fetch(&transport, "http://a.com/").await;
        assert!(matches!(result, Err(CrawlError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_redirect_to_other_scheme_is_invalid_url() {
        let transport = MockTransport::default().redirect("http://a.com/", "ftp://a.com/file");
        let result = fetch(&transport, "http://a.com/").await;
        assert!(matches!(result, Err(CrawlError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_invalid_start_url_never_hits_network() {
        let transport = MockTransport::default();
        let result = fetch(&transport, "/just/a/path").await;
        assert!(matches!(result, Err(CrawlError::InvalidUrl(_))));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_is_propagated() {
        let transport = MockTransport::default();
        let result = fetch(&transport, "http://nowhere.test/").await;
        assert!(matches!(result, Err(CrawlError::Network(_))));
    }
}
