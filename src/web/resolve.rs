// src/web/resolve.rs
// =============================================================================
// This module parses absolute URLs and resolves hrefs against a page URL.
//
// Resolution is deliberately simple string surgery, not full RFC 3986:
// - "#..." fragments are dropped
// - javascript: and mailto: links are rejected
// - hrefs with their own scheme are returned untouched
// - "//host/path" inherits the page's scheme
// - "/path" is joined to the page's origin
// - anything else is joined to the page's directory
//
// The `url` crate does the heavy lifting for absolute URLs (host syntax,
// ports, percent-encoding); we only add the http/https restriction and the
// split into the pieces the fetcher needs.
// =============================================================================

use crate::error::{CrawlError, Result};
use url::Url;

/// An absolute http(s) URL split into the parts a request needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    /// Always starts with '/'
    pub path: String,
    pub query: Option<String>,
}

impl ParsedUrl {
    /// "scheme://host" with ":port" only when it isn't the scheme default
    pub fn origin(&self) -> String {
        if self.port == default_port(&self.scheme) {
            format!("{}://{}", self.scheme, self.host)
        } else {
            format!("{}://{}:{}", self.scheme, self.host, self.port)
        }
    }

    /// The directory part of the path, up to and including the last '/'
    fn directory(&self) -> &str {
        match self.path.rfind('/') {
            Some(i) => &self.path[..=i],
            None => "/",
        }
    }
}

/// Default port for a supported scheme
pub fn default_port(scheme: &str) -> u16 {
    if scheme == "https" {
        443
    } else {
        80
    }
}

// Parses "scheme://host[:port][path][?query]" where scheme is http or https.
//
// Returns CrawlError::InvalidUrl for anything else, including relative
// references and URLs without a host.
pub fn parse_absolute(raw: &str) -> Result<ParsedUrl> {
    let invalid = || CrawlError::InvalidUrl(raw.to_string());

    // Url::parse is lenient about "http:example.com"; we require the "//"
    let (scheme, _) = raw.split_once("://").ok_or_else(invalid)?;
    let scheme = scheme.to_ascii_lowercase();
    if scheme != "http" && scheme != "https" {
        return Err(invalid());
    }

    let url = Url::parse(raw).map_err(|_| invalid())?;
    let host = match url.host_str() {
        Some(h) if !h.is_empty() => h.to_string(),
        _ => return Err(invalid()),
    };
    let port = url.port_or_known_default().unwrap_or_else(|| default_port(&scheme));

    let path = if url.path().is_empty() {
        "/".to_string()
    } else {
        url.path().to_string()
    };

    Ok(ParsedUrl {
        scheme,
        host,
        port,
        path,
        query: url.query().map(str::to_string),
    })
}

// Resolves an href found on `base_url` into an absolute URL.
//
// Returns None when the link should be dropped: rejected schemes, an
// empty href (pure "#fragment" links point back at the same page), or a
// base URL we can't parse. A Some(...) result is not guaranteed to be
// fetchable; hrefs that carry their own scheme (ftp:, tel:, ...) pass
// through unchanged and are filtered by the caller with parse_absolute.
//
// Examples with base = "http://a.com/x/y":
//   "z.html"       -> "http://a.com/x/z.html"
//   "/z"           -> "http://a.com/z"
//   "//cdn.com/a"  -> "http://cdn.com/a"
//   "javascript:1" -> None
pub fn resolve_relative(base_url: &str, href: &str) -> Option<String> {
    let href = href.trim();
    let href = match href.find('#') {
        Some(i) => &href[..i],
        None => href,
    };

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:") || lower.starts_with("mailto:") {
        return None;
    }
    if href.is_empty() {
        return None;
    }

    if has_scheme(href) {
        return Some(href.to_string());
    }

    let base = parse_absolute(base_url).ok()?;

    if href.starts_with("//") {
        return Some(format!("{}:{}", base.scheme, href));
    }
    if href.starts_with('/') {
        return Some(format!("{}{}", base.origin(), href));
    }
    Some(format!("{}{}{}", base.origin(), base.directory(), href))
}

// RFC 3986 scheme: ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ) ":"
fn has_scheme(href: &str) -> bool {
    let Some(colon) = href.find(':') else {
        return false;
    };
    let scheme = &href[..colon];
    let mut chars = scheme.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
