// src/text/html.rs
// =============================================================================
// This module does the two things we need from HTML, and nothing more:
// - strip_markup: blank out every "<...>" so only text is left
// - extract_links: pull href values out of <a> tags
//
// This is NOT an HTML parser. A tag is simply everything from '<' to the
// next '>'; there is no notion of nesting, comments, scripts or entities.
// That is good enough for word counting and link discovery, and it never
// fails on broken markup.
//
// Rust concepts:
// - &str slicing with byte offsets from find()
// - Iterators: split_once, char_indices
// =============================================================================

// Replaces every "<...>" span with a single space.
//
// A '<' with no closing '>' after it is left as text.
//
// Example:
//   "<p>Hello<br>world</p>" -> " Hello world "
pub fn strip_markup(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(open) = rest.find('<') {
        let Some(close) = rest[open..].find('>') else {
            break;
        };
        out.push_str(&rest[..open]);
        out.push(' ');
        rest = &rest[open + close + 1..];
    }

    out.push_str(rest);
    out
}

// Extracts href values from every <a ...> tag, in document order.
//
// Values are returned raw (not resolved); the crawler resolves them
// against the page URL.
//
// Example:
//   r#"<a href="/docs">Docs</a> <A HREF='x.html'>"# -> ["/docs", "x.html"]
pub fn extract_links(html: &str) -> Vec<String> {
    let mut links = Vec::new();
    let mut rest = html;

    while let Some(open) = rest.find('<') {
        let Some(close) = rest[open..].find('>') else {
            break;
        };
        let tag = &rest[open + 1..open + close];
        if let Some(href) = anchor_href(tag) {
            links.push(href.to_string());
        }
        rest = &rest[open + close + 1..];
    }

    links
}

// Given the inside of a tag (between '<' and '>'), returns the href value
// if this is an <a> tag that has one
fn anchor_href(tag: &str) -> Option<&str> {
    let mut chars = tag.chars();
    if !matches!(chars.next(), Some('a' | 'A')) {
        return None;
    }
    // "<a" must be followed by whitespace, otherwise it's <abbr>, <area>, ...
    if !chars.next().is_some_and(|c| c.is_ascii_whitespace()) {
        return None;
    }

    let attrs = &tag[1..];
    let lower = attrs.to_ascii_lowercase();
    let mut search_from = 0;

    while let Some(pos) = lower[search_from..].find("href") {
        let start = search_from + pos;
        search_from = start + 4;

        // must be a whole attribute name, not e.g. "data-href"
        let preceded_by_space = attrs[..start]
            .chars()
            .last()
            .is_some_and(|c| c.is_ascii_whitespace());
        if !preceded_by_space {
            continue;
        }

        let after = attrs[start + 4..].trim_start();
        let Some(value) = after.strip_prefix('=') else {
            continue;
        };
        return Some(attribute_value(value.trim_start()));
    }

    None
}

// Reads a quoted or bare attribute value from the start of `s`
fn attribute_value(s: &str) -> &str {
    match s.chars().next() {
        Some(quote @ ('"' | '\'')) => {
            let inner = &s[1..];
            match inner.find(quote) {
                Some(end) => &inner[..end],
                None => inner,
            }
        }
        _ => {
            let end = s
                .char_indices()
                .find(|(_, c)| c.is_ascii_whitespace())
                .map(|(i, _)| i)
                .unwrap_or(s.len());
            &s[..end]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_simple_tags() {
        assert_eq!(strip_markup("<p>Hello<br>world</p>"), " Hello world ");
    }

    #[test]
    fn test_strip_is_not_greedy() {
        assert_eq!(strip_markup("a<b>c<d>e"), "a c e");
    }

    #[test]
    fn test_strip_is_not_nesting_aware() {
        // the first '>' ends the tag, the rest is text
        assert_eq!(strip_markup("<a title='x>y'>link</a>"), " y'>link ");
    }

    #[test]
    fn test_strip_keeps_unclosed_tag() {
        assert_eq!(strip_markup("price < 10"), "price < 10");
    }

    #[test]
    fn test_strip_plain_text_unchanged() {
        assert_eq!(strip_markup("no markup here"), "no markup here");
    }

    #[test]
    fn test_extract_double_and_single_quoted() {
        let html = r#"<a href="/docs">Docs</a> <A HREF='x.html'>X</A>"#;
        assert_eq!(extract_links(html), vec!["/docs", "x.html"]);
    }

    #[test]
    fn test_extract_unquoted() {
        let html = r#"<a class=nav href=page.html target=_blank>P</a>"#;
        assert_eq!(extract_links(html), vec!["page.html"]);
    }

    #[test]
    fn test_extract_with_spaces_around_equals() {
        let html = r#"<a  href = "spaced.html">S</a>"#;
        assert_eq!(extract_links(html), vec!["spaced.html"]);
    }

    #[test]
    fn test_extract_ignores_other_tags() {
        let html = r#"<link href="style.css"><abbr href="no"><area href="map">
                      <img src="a.png"><a name="anchor">"#;
        assert!(extract_links(html).is_empty());
    }

    #[test]
    fn test_extract_ignores_data_href() {
        let html = r#"<a data-href="no.html" href="yes.html">"#;
        assert_eq!(extract_links(html), vec!["yes.html"]);
    }

    #[test]
    fn test_extract_multiple_links() {
        let html = r#"
            <a href="https://rust-lang.org">Rust</a>
            <a href="/docs">Docs</a>
            <a href="../about">About</a>
        "#;
        assert_eq!(
            extract_links(html),
            vec!["https://rust-lang.org", "/docs", "../about"]
        );
    }
}
