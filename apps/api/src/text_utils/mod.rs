//! Pure text helpers: cleaning, chunking, literal extraction and simple
//! statistics. Nothing here touches the network.

pub mod chunking;
pub mod handlers;
pub mod keywords;
pub mod patterns;
pub mod readability;

pub use chunking::{chunk_text, ChunkError, Chunks};
pub use keywords::find_keywords;
pub use patterns::{extract_emails, extract_phones, extract_urls};
pub use readability::{readability_score, ReadabilityReport};

/// Collapses every whitespace run to a single space and trims the ends.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Shortens `text` to at most `max_chars` characters, ending in `suffix`
/// when something was cut. If the suffix alone does not fit, the text is
/// cut hard without it.
pub fn truncate_text(text: &str, max_chars: usize, suffix: &str) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let suffix_chars = suffix.chars().count();
    if suffix_chars >= max_chars {
        return text.chars().take(max_chars).collect();
    }

    let kept: String = text.chars().take(max_chars - suffix_chars).collect();
    format!("{}{suffix}", kept.trim_end())
}

/// Keeps ASCII letters and digits, plus whitespace when `keep_spaces` is set.
pub fn remove_special_characters(text: &str, keep_spaces: bool) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric() || (keep_spaces && c.is_whitespace()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  Hello \n\t  world  \r\n"), "Hello world");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10, "..."), "short");
        assert_eq!(truncate_text("The quick brown fox", 12, "..."), "The quick...");
        assert_eq!(truncate_text("abcdef", 2, "..."), "ab");
        assert!(truncate_text("ünïcödé text here", 8, "…").chars().count() <= 8);
    }

    #[test]
    fn test_remove_special_characters() {
        assert_eq!(
            remove_special_characters("Hello, World! #2024", true),
            "Hello World 2024"
        );
        assert_eq!(
            remove_special_characters("Hello, World! #2024", false),
            "HelloWorld2024"
        );
    }
}
