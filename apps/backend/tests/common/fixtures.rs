//! Test fixtures and factory functions for creating test data.

use ingest_core::ExtractedCard;
use serde_json::json;

pub const ARTICLE_URL: &str = "https://en.wikipedia.org/wiki/Rust_(programming_language)";

pub const ARTICLE_TEXT: &str = "Rust is a general-purpose programming language. \
    It emphasizes performance, type safety and concurrency.";

/// Cards the stub extraction service hands back.
pub fn extracted_cards(num_cards: usize) -> Vec<ExtractedCard> {
    (0..num_cards)
        .map(|i| ExtractedCard::new(format!("Question {}?", i + 1), format!("Answer {}.", i + 1)))
        .collect()
}

/// Generate structured (JSON) file content with a specified number of cards.
///
/// # Arguments
/// * `num_cards` - Number of cards to generate
/// * `with_ids` - Whether to include explicit ids
pub fn sample_json_content(num_cards: usize, with_ids: bool) -> String {
    let cards: Vec<serde_json::Value> = (0..num_cards)
        .map(|i| {
            if with_ids {
                json!({ "id": format!("card-{}", i + 1), "question": format!("Question {}?", i + 1), "answer": format!("Answer {}.", i + 1) })
            } else {
                json!({ "question": format!("Question {}?", i + 1), "answer": format!("Answer {}.", i + 1) })
            }
        })
        .collect();
    json!({ "cards": cards }).to_string()
}

/// Generate CSV content with a `Question,Answer` header.
pub fn sample_csv_content(num_cards: usize) -> String {
    let mut out = String::from("Question,Answer\n");
    for i in 0..num_cards {
        out.push_str(&format!("\"Question {}?\",\"Answer {}.\"\n", i + 1, i + 1));
    }
    out
}

/// Create a submit request body.
pub fn submit_request(input: &str, is_url_mode: bool) -> serde_json::Value {
    json!({ "input": input, "is_url_mode": is_url_mode })
}

/// Create an import request body.
pub fn import_request(file_name: &str, content: &str) -> serde_json::Value {
    json!({ "file_name": file_name, "content": content })
}

/// Create a collection body for export requests.
pub fn collection_body(cards: &[(&str, &str)]) -> serde_json::Value {
    let cards: Vec<serde_json::Value> = cards
        .iter()
        .enumerate()
        .map(|(i, (q, a))| json!({ "id": format!("c{}", i + 1), "question": q, "answer": a }))
        .collect();
    json!({
        "title": "Exported",
        "source": "text-input",
        "createdAt": "2024-01-01T00:00:00Z",
        "cards": cards
    })
}
