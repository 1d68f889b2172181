//! Write collections back out in the formats the importers accept.

use crate::error::{IngestError, Result};
use crate::types::Collection;

/// Pretty JSON object with `title`, `source`, `createdAt` and `cards`.
pub fn to_structured(collection: &Collection) -> Result<String> {
    serde_json::to_string_pretty(collection).map_err(|e| IngestError::Unexpected(e.to_string()))
}

/// Delimited text with a `Question`/`Answer` header.
pub fn to_tabular(collection: &Collection, delimiter: char) -> String {
    let mut out = String::new();
    write_row(&mut out, &["Question", "Answer"], delimiter);
    for card in &collection.cards {
        write_row(&mut out, &[card.question.as_str(), card.answer.as_str()], delimiter);
    }
    out
}

fn write_row(out: &mut String, row: &[&str], delimiter: char) {
    for (idx, cell) in row.iter().enumerate() {
        if idx > 0 {
            out.push(delimiter);
        }
        if needs_quotes(cell, delimiter) {
            out.push('"');
            out.push_str(&cell.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(cell);
        }
    }
    out.push('\n');
}

fn needs_quotes(field: &str, delimiter: char) -> bool {
    field.contains(delimiter) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::{structured, tabular};
    use crate::types::Card;
    use pretty_assertions::assert_eq;

    fn sample() -> Collection {
        let cards = vec![
            Card {
                id: "generated-1".into(),
                question: "What is Rust?".into(),
                answer: "A language, mostly \"safe\".".into(),
            },
            Card {
                id: "generated-2".into(),
                question: "Who maintains Cargo?".into(),
                answer: "The Cargo team".into(),
            },
        ];
        Collection::new("Rust".into(), "https://en.wikipedia.org/wiki/Rust".into(), cards).unwrap()
    }

    fn contents(collection: &Collection) -> Vec<(String, String)> {
        collection
            .cards
            .iter()
            .map(|c| (c.question.clone(), c.answer.clone()))
            .collect()
    }

    #[test]
    fn structured_round_trip_keeps_cards_and_metadata() {
        let original = sample();
        let json = to_structured(&original).unwrap();
        let reimported = structured::parse(&json, "rust.json").unwrap();
        assert_eq!(contents(&reimported), contents(&original));
        assert_eq!(reimported.title, original.title);
        assert_eq!(reimported.source, original.source);
    }

    #[test]
    fn tabular_round_trip_keeps_cards() {
        let original = sample();
        let csv = to_tabular(&original, ',');
        let reimported = tabular::parse(&csv, "rust.csv").unwrap();
        assert_eq!(contents(&reimported), contents(&original));
    }

    #[test]
    fn tabular_round_trip_keeps_multiline_cards() {
        let cards = vec![
            Card {
                id: "generated-1".into(),
                question: "Line one\nline two?".into(),
                answer: "Yes".into(),
            },
            Card {
                id: "generated-2".into(),
                question: "Second".into(),
                answer: "tab\tand \"quote\"".into(),
            },
        ];
        let original = Collection::new("Multi".into(), "text-input".into(), cards).unwrap();

        for (delimiter, file) in [(',', "multi.csv"), ('\t', "multi.tsv")] {
            let text = to_tabular(&original, delimiter);
            let reimported = tabular::parse(&text, file).unwrap();
            assert_eq!(contents(&reimported), contents(&original));
        }
    }

    #[test]
    fn tabular_quotes_only_when_needed() {
        let csv = to_tabular(&sample(), ',');
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Question,Answer");
        assert_eq!(lines[1], "What is Rust?,\"A language, mostly \"\"safe\"\".\"");
        assert_eq!(lines[2], "Who maintains Cargo?,The Cargo team");
    }
}
