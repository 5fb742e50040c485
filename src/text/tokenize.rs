// src/text/tokenize.rs
// =============================================================================
// This module turns text into terms.
//
// A term is a run of ASCII letters and digits, lowercased, between
// MIN_TERM_LEN and MAX_TERM_LEN characters long. Everything else (spaces,
// punctuation, non-ASCII characters) separates runs. Runs outside the
// length bounds are dropped whole, never split or truncated.
//
// The same scanner feeds both sides of the system:
// - tokenize(): term -> count, used when indexing a page
// - query_terms(): the first few distinct terms of a search query
// =============================================================================

use std::collections::BTreeMap;

pub const MIN_TERM_LEN: usize = 3;
pub const MAX_TERM_LEN: usize = 32;

/// Distinct terms a search query may use
pub const MAX_QUERY_TERMS: usize = 4;

/// Iterator over the valid terms of a text, in order of appearance
pub struct Terms<'a> {
    chars: std::str::Chars<'a>,
}

impl<'a> Terms<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { chars: text.chars() }
    }
}

impl Iterator for Terms<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let mut run = String::new();
        loop {
            match self.chars.next() {
                Some(c) if c.is_ascii_alphanumeric() => run.push(c.to_ascii_lowercase()),
                Some(_) => {
                    if is_valid_term(&run) {
                        return Some(run);
                    }
                    run.clear();
                }
                None => {
                    return is_valid_term(&run).then_some(run);
                }
            }
        }
    }
}

fn is_valid_term(run: &str) -> bool {
    (MIN_TERM_LEN..=MAX_TERM_LEN).contains(&run.len())
}

// Counts every valid term in `text`.
//
// A BTreeMap keeps the output ordered, so writing it to the store always
// happens in the same order for the same content.
pub fn tokenize(text: &str) -> BTreeMap<String, u32> {
    let mut counts = BTreeMap::new();
    for term in Terms::new(text) {
        *counts.entry(term).or_insert(0) += 1;
    }
    counts
}

// Parses a search query: the first MAX_QUERY_TERMS valid terms, then
// sorted and deduplicated.
//
// Example:
//   "Cat, dog! a CAT" -> ["cat", "dog"]
pub fn query_terms(query: &str) -> Vec<String> {
    let mut terms: Vec<String> = Terms::new(query).take(MAX_QUERY_TERMS).collect();
    terms.sort();
    terms.dedup();
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_lowercases() {
        let counts = tokenize("The cat saw the CAT. Cat!");
        assert_eq!(counts.get("cat"), Some(&3));
        assert_eq!(counts.get("the"), Some(&2));
        assert_eq!(counts.get("saw"), Some(&1));
        assert_eq!(counts.len(), 3);
    }

    #[test]
    fn test_short_runs_are_dropped() {
        let counts = tokenize("a an of to go");
        assert!(counts.is_empty());
    }

    #[test]
    fn test_length_bounds_are_inclusive() {
        let exactly_32 = "x".repeat(32);
        let text = format!("abc {} {}", exactly_32, "y".repeat(33));
        let counts = tokenize(&text);
        assert_eq!(counts.get("abc"), Some(&1));
        assert_eq!(counts.get(&exactly_32), Some(&1));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_long_run_is_not_split() {
        // 40 letters: not one term, and not a 32 + 8 pair either
        let counts = tokenize(&"abcd".repeat(10));
        assert!(counts.is_empty());
    }

    #[test]
    fn test_punctuation_and_digits() {
        let counts = tokenize("rust-lang 2024 e-mail abc123");
        assert_eq!(counts.get("rust"), Some(&1));
        assert_eq!(counts.get("lang"), Some(&1));
        assert_eq!(counts.get("2024"), Some(&1));
        assert_eq!(counts.get("mail"), Some(&1));
        assert_eq!(counts.get("abc123"), Some(&1));
        assert_eq!(counts.len(), 5);
    }

    #[test]
    fn test_non_ascii_separates_runs() {
        let counts = tokenize("caféteria naïve");
        assert_eq!(counts.get("caf"), Some(&1));
        assert_eq!(counts.get("teria"), Some(&1));
        assert!(!counts.contains_key("na"));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_trailing_run_is_committed() {
        let counts = tokenize("ends with word");
        assert_eq!(counts.get("word"), Some(&1));
    }

    #[test]
    fn test_every_term_is_bounded_lowercase_alphanumeric() {
        let text = "Mixed CASE, symbols #$%, ünïcödé, 1234567890123456789012345678901234, ok123 \
                    <tag attr=\"v\"> ALLCAPS tail";
        for term in tokenize(text).keys() {
            assert!((MIN_TERM_LEN..=MAX_TERM_LEN).contains(&term.len()), "{term}");
            assert!(
                term.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()),
                "{term}"
            );
        }
    }

    #[test]
    fn test_tokenize_is_deterministic() {
        let text = "one two three two three three";
        assert_eq!(tokenize(text), tokenize(text));
    }

    #[test]
    fn test_query_terms_sorted_and_deduplicated() {
        assert_eq!(query_terms("Dog cat DOG"), vec!["cat", "dog"]);
    }

    #[test]
    fn test_query_terms_capped_before_dedup() {
        // the first four valid terms are dog, cat, dog, cat; "zebra" is fifth
        assert_eq!(query_terms("dog cat dog cat zebra"), vec!["cat", "dog"]);
    }

    #[test]
    fn test_query_terms_skip_invalid_runs() {
        // "a" and "of" don't count towards the cap
        assert_eq!(
            query_terms("a one of two three four five"),
            vec!["four", "one", "three", "two"]
        );
    }

    #[test]
    fn test_query_terms_empty() {
        assert!(query_terms("").is_empty());
        assert!(query_terms("a b c !!").is_empty());
    }
}
