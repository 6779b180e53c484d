//! Literal extraction of contact details with regular expressions.
//!
//! Results keep first-seen order and drop repeats.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid regex")
});

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").expect("valid regex")
});

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"{}|\\^`\[\]]+"#).expect("valid regex"));

/// Sentence punctuation that ends prose rather than the URL.
const URL_TRAILING: &[char] = &['.', ',', ';', ':', '!', '?', ')', '\'', '"'];

pub fn extract_emails(text: &str) -> Vec<String> {
    unique(EMAIL_RE.find_iter(text).map(|m| m.as_str()))
}

pub fn extract_phones(text: &str) -> Vec<String> {
    unique(PHONE_RE.find_iter(text).map(|m| m.as_str().trim()))
}

pub fn extract_urls(text: &str) -> Vec<String> {
    unique(
        URL_RE
            .find_iter(text)
            .map(|m| m.as_str().trim_end_matches(URL_TRAILING)),
    )
}

fn unique<'a>(found: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    found
        .filter(|s| !s.is_empty() && seen.insert(*s))
        .map(str::to_string)
        .collect()
}
