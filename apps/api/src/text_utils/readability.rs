//! Flesch reading ease with a vowel-group syllable estimate.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadabilityReport {
    pub word_count: usize,
    pub sentence_count: usize,
    pub avg_words_per_sentence: f64,
    pub avg_syllables_per_word: f64,
    /// Flesch reading ease; 0 for text without words or sentences.
    pub reading_ease: f64,
    pub reading_level: &'static str,
}

pub fn readability_score(text: &str) -> ReadabilityReport {
    let sentence_count = text
        .split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .count();

    let words: Vec<&str> = text.split_whitespace().collect();
    let word_count = words.len();
    let syllable_count: usize = words.iter().map(|w| count_syllables(w)).sum();

    let avg_words_per_sentence = word_count as f64 / sentence_count.max(1) as f64;
    let avg_syllables_per_word = syllable_count as f64 / word_count.max(1) as f64;

    let reading_ease = if sentence_count > 0 && word_count > 0 {
        206.835 - 1.015 * avg_words_per_sentence - 84.6 * avg_syllables_per_word
    } else {
        0.0
    };

    ReadabilityReport {
        word_count,
        sentence_count,
        avg_words_per_sentence: round2(avg_words_per_sentence),
        avg_syllables_per_word: round2(avg_syllables_per_word),
        reading_ease: round2(reading_ease),
        reading_level: reading_level(reading_ease),
    }
}

/// Counts vowel groups (`y` included), minus a trailing silent `e`, with a
/// floor of one.
pub fn count_syllables(word: &str) -> usize {
    let word = word.to_lowercase();
    let mut count = 0_usize;
    let mut previous_was_vowel = false;

    for c in word.chars() {
        let is_vowel = matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
        if is_vowel && !previous_was_vowel {
            count += 1;
        }
        previous_was_vowel = is_vowel;
    }

    if word.ends_with('e') {
        count = count.saturating_sub(1);
    }

    count.max(1)
}

pub fn reading_level(reading_ease: f64) -> &'static str {
    match reading_ease {
        e if e >= 90.0 => "Very Easy (5th grade)",
        e if e >= 80.0 => "Easy (6th grade)",
        e if e >= 70.0 => "Fairly Easy (7th grade)",
        e if e >= 60.0 => "Standard (8th-9th grade)",
        e if e >= 50.0 => "Fairly Difficult (10th-12th grade)",
        e if e >= 30.0 => "Difficult (College)",
        _ => "Very Difficult (College graduate)",
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
