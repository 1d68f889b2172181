//! Deterministic flashcard generation used in simulated mode.
//!
//! Each sentence long enough to carry meaning becomes a fill-in-the-blank
//! card whose answer is its final word. No network, no randomness.

use ingest_core::{ExtractedCard, ExtractionOptions};

pub const DEFAULT_MAX_CARDS: usize = 10;

const MIN_WORDS: usize = 4;
const MIN_ANSWER_CHARS: usize = 3;

pub fn generate(text: &str, options: &ExtractionOptions) -> Vec<ExtractedCard> {
    let max_cards = options.max_cards.unwrap_or(DEFAULT_MAX_CARDS);
    let focus = options
        .focus
        .as_deref()
        .map(|f| f.trim().to_lowercase())
        .filter(|f| !f.is_empty());

    sentences(text)
        .filter(|s| match &focus {
            Some(focus) => s.to_lowercase().contains(focus.as_str()),
            None => true,
        })
        .filter_map(blank_out_last_word)
        .take(max_cards)
        .collect()
}

fn sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive(['.', '!', '?', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn blank_out_last_word(sentence: &str) -> Option<ExtractedCard> {
    let body = sentence.trim_end_matches(['.', '!', '?']);
    let words: Vec<&str> = body.split_whitespace().collect();
    if words.len() < MIN_WORDS {
        return None;
    }

    let (last, rest) = words.split_last()?;
    let answer = last.trim_matches(|c: char| !c.is_alphanumeric());
    if answer.chars().count() < MIN_ANSWER_CHARS {
        return None;
    }

    Some(ExtractedCard::new(
        format!("Fill in the blank: {} ____", rest.join(" ")),
        answer,
    ))
}
