// src/server/pages.rs
// =============================================================================
// The HTML pages of the search UI. Plain string building; every piece of
// user-controlled text goes through html_escape first.
// =============================================================================

use crate::index::SearchHit;
use crate::text::MAX_QUERY_TERMS;

pub fn search_form() -> String {
    format!(
        "<!doctype html><html><head><meta charset='utf-8'><title>Search</title></head><body>\
         <h1>Search</h1>\
         <form method='POST' action='/search'>\
         <input type='text' name='q' placeholder='Enter up to {MAX_QUERY_TERMS} words' autofocus />\
         <button type='submit'>Search</button>\
         </form>\
         </body></html>"
    )
}

pub fn results(query: &str, hits: &[SearchHit]) -> String {
    let mut body = format!(
        "<!doctype html><html><head><meta charset='utf-8'><title>Results</title></head><body>\
         <h1>Search results</h1>\
         <p>Query: <b>{}</b></p>\
         <a href='/'>Back</a>",
        html_escape(query)
    );

    if hits.is_empty() {
        body.push_str("<p>No results found.</p>");
    } else {
        body.push_str("<ol>");
        for hit in hits {
            let url = html_escape(&hit.url);
            body.push_str(&format!(
                "<li><a href='{url}'>{url}</a> (score: {})</li>",
                hit.relevance
            ));
        }
        body.push_str("</ol>");
    }

    body.push_str("</body></html>");
    body
}

pub fn error_page() -> String {
    "<!doctype html><html><head><meta charset='utf-8'><title>Error</title></head><body>\
     <h1>Something went wrong</h1>\
     <a href='/'>Back</a>\
     </body></html>"
        .to_string()
}

pub fn not_found() -> String {
    "<!doctype html><html><head><meta charset='utf-8'><title>Not Found</title></head><body>\
     <h1>404 Not Found</h1>\
     <a href='/'>Back</a>\
     </body></html>"
        .to_string()
}

pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
